/// Axis-aligned rectangle in overlay-view coordinates (floating point)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl Rect {
    /// Create a new rectangle from its edges
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Scale each axis independently (left/right by `scale_x`, top/bottom by `scale_y`)
    pub fn scaled(&self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            left: self.left * scale_x,
            top: self.top * scale_y,
            right: self.right * scale_x,
            bottom: self.bottom * scale_y,
        }
    }

    /// Boundary-inclusive intersection test.
    ///
    /// Two rectangles intersect unless one lies entirely left, right, above or
    /// below the other. Shared edges count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

/// Axis-aligned rectangle in frame pixel coordinates, as reported by a decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge
    pub right: i32,
    /// Bottom edge
    pub bottom: i32,
}

impl PixelRect {
    /// Create a new pixel rectangle from its edges
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Axis-aligned hull of a set of corner points.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_corners(corners: &[(i32, i32)]) -> Option<Self> {
        let (&(x0, y0), rest) = corners.split_first()?;
        let mut rect = Self::new(x0, y0, x0, y0);
        for &(x, y) in rest {
            rect.left = rect.left.min(x);
            rect.top = rect.top.min(y);
            rect.right = rect.right.max(x);
            rect.bottom = rect.bottom.max(y);
        }
        Some(rect)
    }

    /// Width in pixels (zero for degenerate boxes)
    pub fn width(&self) -> u32 {
        if self.right > self.left {
            self.right.abs_diff(self.left)
        } else {
            0
        }
    }

    /// Height in pixels (zero for degenerate boxes)
    pub fn height(&self) -> u32 {
        if self.bottom > self.top {
            self.bottom.abs_diff(self.top)
        } else {
            0
        }
    }

    /// Convert to a floating point rectangle in the same space
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.left as f32,
            self.top as f32,
            self.right as f32,
            self.bottom as f32,
        )
    }
}
