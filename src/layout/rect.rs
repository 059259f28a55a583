//! Rect and Edges: integer geometry for resolved layouts.

/// A rectangle defined by position and size.
///
/// This is the resolved layout of a node: integer cells, never negative.
/// Positions produced by the layout pass are relative to the parent's
/// border box.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate (column) of the top-left corner.
    pub x: u16,
    /// Y coordinate (row) of the top-left corner.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Get the area (number of cells).
    #[inline]
    pub const fn area(&self) -> u32 {
        (self.width as u32) * (self.height as u32)
    }

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle (half-open on both axes).
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle intersects with another.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Shrink the rectangle by per-side insets, clamping at zero size.
    #[inline]
    #[must_use]
    pub const fn inset(&self, edges: Edges) -> Self {
        let horizontal = edges.horizontal();
        let vertical = edges.vertical();
        Self::new(
            self.x.saturating_add(edges.left),
            self.y.saturating_add(edges.top),
            self.width.saturating_sub(horizontal),
            self.height.saturating_sub(vertical),
        )
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Per-side thickness: padding, or the cells taken by a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Edges {
    /// Top side.
    pub top: u16,
    /// Right side.
    pub right: u16,
    /// Bottom side.
    pub bottom: u16,
    /// Left side.
    pub left: u16,
}

impl Edges {
    /// No thickness on any side.
    pub const ZERO: Self = Self::all(0);

    /// Create edges in CSS order: top, right, bottom, left.
    #[inline]
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same thickness on every side.
    #[inline]
    pub const fn all(value: u16) -> Self {
        Self::new(value, value, value, value)
    }

    /// Left plus right.
    #[inline]
    pub const fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Top plus bottom.
    #[inline]
    pub const fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

impl std::ops::Add for Edges {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.top.saturating_add(rhs.top),
            self.right.saturating_add(rhs.right),
            self.bottom.saturating_add(rhs.bottom),
            self.left.saturating_add(rhs.left),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(2, 3, 10, 4);
        assert_eq!(r.right(), 12);
        assert_eq!(r.bottom(), 7);
        assert_eq!(r.area(), 40);
    }

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(0, 0, 2, 2);
        assert!(r.contains(0, 0));
        assert!(r.contains(1, 1));
        assert!(!r.contains(2, 1));
        assert!(!r.contains(1, 2));
        assert!(!Rect::ZERO.contains(0, 0));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 4, 4);
        assert!(a.intersects(&Rect::new(3, 3, 2, 2)));
        assert!(!a.intersects(&Rect::new(4, 0, 2, 2)));
    }

    #[test]
    fn test_inset_clamps() {
        let r = Rect::new(0, 0, 20, 10);
        assert_eq!(r.inset(Edges::all(2)), Rect::new(2, 2, 16, 6));
        assert_eq!(r.inset(Edges::all(20)).width, 0);
    }

    #[test]
    fn test_edges_add() {
        let sum = Edges::all(1) + Edges::new(2, 0, 0, 3);
        assert_eq!(sum, Edges::new(3, 1, 1, 4));
        assert_eq!(sum.horizontal(), 5);
        assert_eq!(sum.vertical(), 4);
    }
}
