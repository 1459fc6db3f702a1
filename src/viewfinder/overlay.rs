//! Fixed, centered viewfinder rectangle drawn over the camera preview
//!
//! The rectangle is a square whose side is a fraction (70% by default) of the
//! shorter side of the display surface. It is recomputed whenever the surface
//! changes size and is otherwise constant.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::RwLock;

use super::filter;
use crate::config;
use crate::models::{PixelRect, Rect};

/// Corner radius of the drawn viewfinder, in view pixels
pub const CORNER_RADIUS: f32 = 20.0;
/// Border stroke width, in view pixels
pub const STROKE_WIDTH: f32 = 4.0;
/// Alpha of the dimmed area outside the viewfinder
pub const SHADE_ALPHA: u8 = 128;

/// Viewfinder state owned by the layout side
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    fraction: f32,
    view_width: u32,
    view_height: u32,
    rect: Option<Rect>,
}

impl Overlay {
    /// Overlay with the configured fraction and no surface yet
    pub fn new() -> Self {
        Self::with_fraction(config::overlay_fraction())
    }

    /// Overlay with an explicit fraction, clamped to `(0, 1]`
    ///
    /// Non-finite or non-positive values fall back to the default.
    pub fn with_fraction(fraction: f32) -> Self {
        let fraction = if fraction.is_finite() && fraction > 0.0 {
            fraction.min(1.0)
        } else {
            config::DEFAULT_OVERLAY_FRACTION
        };
        Self {
            fraction,
            view_width: 0,
            view_height: 0,
            rect: None,
        }
    }

    /// Recompute the rectangle for a new surface size
    ///
    /// A zero-sized surface clears the rectangle.
    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        self.view_width = width;
        self.view_height = height;
        self.rect = if width == 0 || height == 0 {
            None
        } else {
            let (w, h) = (width as f32, height as f32);
            let side = w.min(h) * self.fraction;
            let left = (w - side) / 2.0;
            let top = (h - side) / 2.0;
            Some(Rect::new(left, top, left + side, top + side))
        };
        log::debug!(
            "viewfinder resized to {}x{}: {:?}",
            width,
            height,
            self.rect
        );
    }

    /// Current rectangle, `None` until the first non-empty layout
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Fraction of the shorter side the rectangle spans
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Surface width
    pub fn view_width(&self) -> f32 {
        self.view_width as f32
    }

    /// Surface height
    pub fn view_height(&self) -> f32 {
        self.view_height as f32
    }

    /// Copy of everything the filter needs for one frame
    pub fn geometry(&self) -> ViewfinderGeometry {
        ViewfinderGeometry {
            rect: self.rect,
            view_width: self.view_width(),
            view_height: self.view_height(),
        }
    }

    /// Render the viewfinder mask at the current surface size.
    ///
    /// Outside the rounded rectangle is semi-transparent black, inside is
    /// fully transparent, and the outline is an opaque white stroke. Before
    /// the first layout the image is fully transparent.
    pub fn render_mask(&self) -> RgbaImage {
        let mut mask = RgbaImage::new(self.view_width, self.view_height);
        let Some(rect) = self.rect else {
            return mask;
        };

        let radius = CORNER_RADIUS.min(rect.width() / 2.0).min(rect.height() / 2.0);
        let half_stroke = STROKE_WIDTH / 2.0;

        for (x, y, px) in mask.enumerate_pixels_mut() {
            let d = rounded_rect_distance(&rect, radius, x as f32 + 0.5, y as f32 + 0.5);
            *px = if d.abs() <= half_stroke {
                Rgba([255, 255, 255, 255])
            } else if d < 0.0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([0, 0, 0, SHADE_ALPHA])
            };
        }

        mask
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed distance from a point to a rounded rectangle outline (negative inside)
fn rounded_rect_distance(rect: &Rect, radius: f32, x: f32, y: f32) -> f32 {
    let cx = (rect.left + rect.right) / 2.0;
    let cy = (rect.top + rect.bottom) / 2.0;
    let hx = rect.width() / 2.0 - radius;
    let hy = rect.height() / 2.0 - radius;

    let qx = (x - cx).abs() - hx;
    let qy = (y - cy).abs() - hy;
    let ox = qx.max(0.0);
    let oy = qy.max(0.0);

    (ox * ox + oy * oy).sqrt() + qx.max(qy).min(0.0) - radius
}

/// Per-frame snapshot of the viewfinder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewfinderGeometry {
    /// Overlay rectangle, if laid out
    pub rect: Option<Rect>,
    /// Surface width
    pub view_width: f32,
    /// Surface height
    pub view_height: f32,
}

impl ViewfinderGeometry {
    /// Run the containment check against this snapshot
    pub fn accept(&self, detection: &PixelRect, frame_width: u32, frame_height: u32) -> bool {
        filter::accept(
            detection,
            frame_width,
            frame_height,
            self.rect.as_ref(),
            self.view_width,
            self.view_height,
        )
    }
}

/// Overlay shared between the layout side (writer) and the analysis thread (reader)
///
/// Readers take one snapshot per frame. A resize landing mid-analysis is only
/// seen by the next frame.
#[derive(Debug, Clone, Default)]
pub struct SharedOverlay {
    inner: Arc<RwLock<Overlay>>,
}

impl SharedOverlay {
    /// Share an overlay
    pub fn new(overlay: Overlay) -> Self {
        Self {
            inner: Arc::new(RwLock::new(overlay)),
        }
    }

    /// Recompute the rectangle for a new surface size
    pub fn resize(&self, width: u32, height: u32) {
        self.inner.write().on_size_changed(width, height);
    }

    /// Snapshot for one frame's analysis
    pub fn geometry(&self) -> ViewfinderGeometry {
        self.inner.read().geometry()
    }

    /// Current rectangle
    pub fn rect(&self) -> Option<Rect> {
        self.inner.read().rect()
    }

    /// Render the mask at the current size
    pub fn render_mask(&self) -> RgbaImage {
        self.inner.read().render_mask()
    }
}
