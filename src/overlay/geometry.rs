use crate::host::Rect;

/// Fixed padding around the spotlighted element.
pub const SPOTLIGHT_PADDING: f32 = 8.0;

/// Cutout rectangle for the spotlight, or None when no target resolved
/// (the overlay then renders a full-viewport dim without a cutout).
pub fn spotlight_cutout(target: Option<Rect>, viewport: Rect) -> Option<Rect> {
    target.map(|rect| rect.expanded(SPOTLIGHT_PADDING).clamped_to(viewport))
}
