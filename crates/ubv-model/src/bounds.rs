//! Running min/max accumulator for discovered viewports

use crate::Point;

/// Axis-aligned bounding box accumulated while reading geometry.
///
/// Type 2 streams and the assembler have no trustworthy viewport up front:
/// the box is grown from every point actually read and patched into the
/// output afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Fold one coordinate pair into the box
    pub fn fold_xy(&mut self, x: i32, y: i32) {
        if x > self.max_x {
            self.max_x = x;
        } else if x < self.min_x {
            self.min_x = x;
        }
        if y > self.max_y {
            self.max_y = y;
        } else if y < self.min_y {
            self.min_y = y;
        }
    }

    /// Fold one point into the box
    pub fn fold_point(&mut self, p: Point) {
        self.fold_xy(p.x, p.y);
    }

    /// Fold another box into this one
    pub fn fold_bounds(&mut self, other: &Bounds) {
        if other.min_x < self.min_x {
            self.min_x = other.min_x;
        }
        if other.min_y < self.min_y {
            self.min_y = other.min_y;
        }
        if other.max_x > self.max_x {
            self.max_x = other.max_x;
        }
        if other.max_y > self.max_y {
            self.max_y = other.max_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_grows_in_both_directions() {
        let mut b = Bounds::new(0, 0, 1, 1);
        b.fold_xy(-10, 5);
        b.fold_xy(20, -3);
        assert_eq!(b, Bounds::new(-10, -3, 20, 5));
    }

    #[test]
    fn test_fold_inside_is_noop() {
        let mut b = Bounds::new(0, 0, 100, 100);
        b.fold_xy(50, 50);
        assert_eq!(b, Bounds::new(0, 0, 100, 100));
    }

    #[test]
    fn test_fold_bounds_merges() {
        let mut b = Bounds::new(0, 0, 1, 1);
        b.fold_bounds(&Bounds::new(-5, 2, 8, 9));
        assert_eq!(b, Bounds::new(-5, 0, 8, 9));
    }
}
