//! Geometry in widget-local, logical pixels.
//!
//! Rectangles are half-open: a point on the right or bottom edge lies
//! outside, so adjacent rows and sections never both claim a point.

/// A position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Grows each dimension to at least the matching one of `minimum`.
    pub fn at_least(self, minimum: Size) -> Size {
        Size::new(
            self.width.max(minimum.width),
            self.height.max(minimum.height),
        )
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// The empty rectangle; it contains no point.
    pub const ZERO: Self = Self::from_size(Size::ZERO);

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// A rectangle of `size` anchored at the origin.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.left()..self.right()).contains(&point.x)
            && (self.top()..self.bottom()).contains(&point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let cell = Rect::new(16.0, 24.0, 84.0, 24.0);
        assert!(cell.contains(Point::new(16.0, 24.0)));
        assert!(cell.contains(Point::new(99.9, 47.9)));
        assert!(!cell.contains(Point::new(100.0, 30.0)));
        assert!(!cell.contains(Point::new(50.0, 48.0)));
        assert!(!cell.contains(Point::new(15.9, 30.0)));
    }

    #[test]
    fn test_zero_rect_contains_nothing() {
        assert!(!Rect::ZERO.contains(Point::ZERO));
    }

    #[test]
    fn test_size_at_least() {
        let popup = Size::new(250.0, 72.0).at_least(Size::new(0.0, 150.0));
        assert_eq!(popup, Size::new(250.0, 150.0));
        assert_eq!(Size::from((3.0, 4.0)).at_least(Size::ZERO), Size::new(3.0, 4.0));
    }
}
