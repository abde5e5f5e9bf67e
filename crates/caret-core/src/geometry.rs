#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle on the terminal grid.
///
/// Uses terminal coordinates (0-indexed, origin at top-left). Widget areas,
/// scissor regions, and named screen regions are all expressed as `Rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// A single cell at `(x, y)`.
    #[inline]
    pub const fn cell(x: u16, y: u16) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Clamp a point into the rectangle.
    ///
    /// An empty rectangle clamps everything to its origin.
    pub fn clamp_point(&self, x: u16, y: u16) -> (u16, u16) {
        if self.is_empty() {
            return self.origin();
        }
        // right()/bottom() saturate at u16::MAX, so the last cell can sit
        // before the origin arithmetic would suggest.
        let last_x = (self.right() - 1).max(self.x);
        let last_y = (self.bottom() - 1).max(self.y);
        (x.clamp(self.x, last_x), y.clamp(self.y, last_y))
    }

    /// Overlap of two rectangles, or `None` when they are disjoint.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        (x < right && y < bottom).then(|| Rect::new(x, y, right - x, bottom - y))
    }

    /// Overlap of two rectangles; empty when they are disjoint.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Shrink by the given margins, saturating at zero size.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x.saturating_add(margin.left),
            y: self.y.saturating_add(margin.top),
            width: self.width.saturating_sub(margin.horizontal_sum()),
            height: self.height.saturating_sub(margin.vertical_sum()),
        }
    }
}

/// Per-edge margins, used for border insets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: u16) -> Self {
        Self::new(val, val, val, val)
    }

    /// Create new sides with specific values.
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}
