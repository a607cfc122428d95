//! Geometry and style model for the Unusual Binary Vector File Formats
//!
//! Both stream types store coordinates as signed fixed-point integers and
//! colors as RGB triples with a reserved fourth field. The scale factor
//! differs per type.

mod bounds;
mod scale;

pub use bounds::Bounds;
pub use scale::{round_int, to_real, TYPE1_SCALE, TYPE2_SCALE};

/// A 2-D point in fixed-point coordinates (scaled integers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One cubic Bézier segment: three control points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cubic {
    pub p: [Point; 3],
}

impl Cubic {
    pub fn new(p0: Point, p1: Point, p2: Point) -> Self {
        Self { p: [p0, p1, p2] }
    }
}

/// An RGB color. Channels are 8-bit in Type 1 files and 16-bit words in
/// Type 2 files; the reserved fourth field is dropped at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Color {
    pub fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_default_is_origin() {
        assert_eq!(Point::default(), Point::new(0, 0));
    }

    #[test]
    fn test_cubic_holds_three_points() {
        let c = Cubic::new(Point::new(1, 2), Point::new(3, 4), Point::new(5, 6));
        assert_eq!(c.p[0], Point::new(1, 2));
        assert_eq!(c.p[2], Point::new(5, 6));
    }
}
