use serde::{Deserialize, Serialize};

pub mod fixture;

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Grow by `padding` on every side.
    pub fn expanded(&self, padding: f32) -> Rect {
        Rect {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + 2.0 * padding,
            height: self.height + 2.0 * padding,
        }
    }

    /// Intersection with `bounds`; zero-sized when disjoint.
    pub fn clamped_to(&self, bounds: Rect) -> Rect {
        let x = self.x.max(bounds.x);
        let y = self.y.max(bounds.y);
        let right = self.right().min(bounds.right());
        let bottom = self.bottom().min(bounds.bottom());
        Rect {
            x,
            y,
            width: (right - x).max(0.0),
            height: (bottom - y).max(0.0),
        }
    }
}

/// Everything the engine may do to the host UI. The runner depends only
/// on this contract, never on how a concrete surface is rendered.
///
/// Mutating calls return whether the selector matched anything; a miss is
/// the caller's cue to warn and continue, never to fail the run.
pub trait UiSurface {
    /// Current navigation path (route).
    fn current_path(&self) -> String;

    fn navigate_to(&mut self, path: &str);

    /// Bounding geometry of the first element matching `selector`,
    /// or None when nothing matches on the current route.
    fn query(&self, selector: &str) -> Option<Rect>;

    /// Synthetic activation.
    fn click(&mut self, selector: &str) -> bool;

    /// Framework-aware value set plus input notification.
    fn set_value(&mut self, selector: &str, value: &str) -> bool;

    /// Set a selection control's value plus change notification.
    fn select_option(&mut self, selector: &str, value: &str) -> bool;

    fn viewport(&self) -> Rect;
}
