//! Points, rectangles and the display-to-canvas mapping.
//!
//! All stored sticker geometry lives in canvas logical space (a fixed square,
//! 600 units by default). Pointer input arrives in display space, which may be
//! smaller or larger than the logical canvas; [`DisplayMapping`] converts
//! between the two.

use serde::{Deserialize, Serialize};

/// A point in either display or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test: points on the border count as inside.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Scale factors between the on-screen canvas element and logical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    canvas_size: f64,
    display_width: f64,
    display_height: f64,
}

impl DisplayMapping {
    /// Identity mapping: the canvas is displayed at its logical size.
    pub fn identity(canvas_size: f64) -> Self {
        Self {
            canvas_size,
            display_width: canvas_size,
            display_height: canvas_size,
        }
    }

    /// Mapping for a canvas displayed at `display_width × display_height`.
    ///
    /// Degenerate display sizes (zero, negative, non-finite) fall back to the
    /// logical size on that axis so the mapping never divides by zero.
    pub fn new(canvas_size: f64, display_width: f64, display_height: f64) -> Self {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { canvas_size };
        Self {
            canvas_size,
            display_width: sane(display_width),
            display_height: sane(display_height),
        }
    }

    #[inline]
    pub fn canvas_size(&self) -> f64 {
        self.canvas_size
    }

    #[inline]
    pub fn scale_x(&self) -> f64 {
        self.canvas_size / self.display_width
    }

    #[inline]
    pub fn scale_y(&self) -> f64 {
        self.canvas_size / self.display_height
    }

    /// Convert a display-space point to canvas space.
    #[inline]
    pub fn to_canvas(&self, display: Point) -> Point {
        Point::new(display.x * self.scale_x(), display.y * self.scale_y())
    }

    /// Convert a canvas-space point to display space.
    #[inline]
    pub fn to_display(&self, canvas: Point) -> Point {
        Point::new(canvas.x / self.scale_x(), canvas.y / self.scale_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_inclusive() {
        let r = Rect::new(10.0, 10.0, 80.0, 80.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(90.0, 90.0)));
        assert!(r.contains(Point::new(50.0, 50.0)));
        assert!(!r.contains(Point::new(90.1, 50.0)));
        assert!(!r.contains(Point::new(50.0, 9.9)));
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(100.0, 100.0, 80.0, 40.0);
        assert_eq!(r.center(), Point::new(140.0, 120.0));
    }

    #[test]
    fn test_identity_mapping() {
        let m = DisplayMapping::identity(600.0);
        let p = Point::new(123.0, 456.0);
        assert_eq!(m.to_canvas(p), p);
    }

    #[test]
    fn test_half_size_display_doubles_coordinates() {
        let m = DisplayMapping::new(600.0, 300.0, 300.0);
        assert_eq!(m.to_canvas(Point::new(150.0, 75.0)), Point::new(300.0, 150.0));
        assert_eq!(m.to_display(Point::new(300.0, 150.0)), Point::new(150.0, 75.0));
    }

    #[test]
    fn test_non_square_display_scales_each_axis() {
        let m = DisplayMapping::new(600.0, 300.0, 200.0);
        assert_eq!(m.scale_x(), 2.0);
        assert_eq!(m.scale_y(), 3.0);
    }

    #[test]
    fn test_degenerate_display_falls_back_to_identity() {
        let m = DisplayMapping::new(600.0, 0.0, f64::NAN);
        assert_eq!(m.scale_x(), 1.0);
        assert_eq!(m.scale_y(), 1.0);
    }

    #[test]
    fn test_point_sub() {
        assert_eq!(Point::new(5.0, 7.0) - Point::new(2.0, 3.0), Point::new(3.0, 4.0));
    }
}
