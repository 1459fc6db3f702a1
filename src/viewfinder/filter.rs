//! Viewfinder containment check
//!
//! The camera analysis frame usually covers more of the scene than the
//! on-screen scan rectangle suggests. A detection is kept only when its bounding
//! box, mapped from frame pixels into overlay-view pixels, touches the overlay
//! rectangle.

use crate::models::{PixelRect, Rect};

/// Decide whether a detection lies inside the visible viewfinder.
///
/// Each axis is scaled independently (`view / frame`); no letterbox or aspect
/// correction is applied. Touching edges count as intersecting.
///
/// Rejects (returns `false`) when the overlay is unset, a frame dimension is
/// zero, or a view dimension is non-positive or not finite.
pub fn accept(
    detection: &PixelRect,
    frame_width: u32,
    frame_height: u32,
    overlay: Option<&Rect>,
    view_width: f32,
    view_height: f32,
) -> bool {
    let Some(overlay) = overlay else {
        return false;
    };
    if frame_width == 0 || frame_height == 0 {
        return false;
    }
    if !valid_extent(view_width) || !valid_extent(view_height) {
        return false;
    }

    let scale_x = view_width / frame_width as f32;
    let scale_y = view_height / frame_height as f32;

    detection.to_rect().scaled(scale_x, scale_y).intersects(overlay)
}

fn valid_extent(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
