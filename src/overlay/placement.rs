use crate::definition::scenario::PopoverSide;
use crate::host::Rect;

/// Gap between the anchor (spotlight) rectangle and the popover.
pub const POPOVER_GAP: f32 = 12.0;

/// Default popover dimensions when the presentation layer has not
/// measured itself yet.
pub const POPOVER_WIDTH: f32 = 320.0;
pub const POPOVER_HEIGHT: f32 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopoverLayout {
    pub rect: Rect,
    /// Side actually used after collision handling
    pub side: PopoverSide,
}

/// Position a popover of `width` x `height` against `anchor` inside
/// `viewport`: try the preferred side, flip to the opposite side if the
/// preferred one overflows on the anchoring axis, then shift the result
/// within viewport bounds on the cross axis.
///
/// With no anchor (target never resolved) the popover centers in the
/// viewport so the step text stays readable over the dim.
pub fn place_popover(
    anchor: Option<Rect>,
    preferred: PopoverSide,
    width: f32,
    height: f32,
    viewport: Rect,
) -> PopoverLayout {
    let Some(anchor) = anchor else {
        return PopoverLayout {
            rect: Rect::new(
                viewport.x + (viewport.width - width) / 2.0,
                viewport.y + (viewport.height - height) / 2.0,
                width,
                height,
            ),
            side: preferred,
        };
    };

    let mut side = preferred;
    if overflows(candidate(anchor, side, width, height), side, viewport) {
        let flipped = side.opposite();
        if !overflows(candidate(anchor, flipped, width, height), flipped, viewport) {
            side = flipped;
        }
    }

    let mut rect = candidate(anchor, side, width, height);

    // Shift within viewport bounds on the cross axis.
    match side {
        PopoverSide::Top | PopoverSide::Bottom => {
            rect.x = rect
                .x
                .min(viewport.right() - rect.width)
                .max(viewport.x);
        }
        PopoverSide::Left | PopoverSide::Right => {
            rect.y = rect
                .y
                .min(viewport.bottom() - rect.height)
                .max(viewport.y);
        }
    }

    PopoverLayout { rect, side }
}

/// Popover rect on the given side, centered against the anchor.
fn candidate(anchor: Rect, side: PopoverSide, width: f32, height: f32) -> Rect {
    match side {
        PopoverSide::Top => Rect::new(
            anchor.center_x() - width / 2.0,
            anchor.y - POPOVER_GAP - height,
            width,
            height,
        ),
        PopoverSide::Bottom => Rect::new(
            anchor.center_x() - width / 2.0,
            anchor.bottom() + POPOVER_GAP,
            width,
            height,
        ),
        PopoverSide::Left => Rect::new(
            anchor.x - POPOVER_GAP - width,
            anchor.center_y() - height / 2.0,
            width,
            height,
        ),
        PopoverSide::Right => Rect::new(
            anchor.right() + POPOVER_GAP,
            anchor.center_y() - height / 2.0,
            width,
            height,
        ),
    }
}

/// Overflow test on the anchoring axis only; cross-axis overflow is
/// handled by shifting, not flipping.
fn overflows(rect: Rect, side: PopoverSide, viewport: Rect) -> bool {
    match side {
        PopoverSide::Top => rect.y < viewport.y,
        PopoverSide::Bottom => rect.bottom() > viewport.bottom(),
        PopoverSide::Left => rect.x < viewport.x,
        PopoverSide::Right => rect.right() > viewport.right(),
    }
}
