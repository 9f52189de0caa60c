//! Axis-Aligned Rectangles
//!
//! Planar geometry shared by every planning stage: points, rectangles and
//! the rectangle overlap test used as the collision primitive.
//!
//! Rectangles are stored the way obstacle layouts describe them, as a
//! top-left corner plus a size. Overlap is strict, so two rectangles that
//! only share an edge do not collide.
//!
//! # Example
//!
//! ```rust
//! use visprm::algorithms::aabb::Rect;
//!
//! let wall = Rect::new(100.0, 0.0, 40.0, 480.0);
//! let robot = Rect::from_center((120.0, 50.0), 20.0, 20.0);
//!
//! assert!(wall.intersects(&robot));
//! assert!(!wall.intersects(&robot.with_center((20.0, 50.0))));
//! ```

use serde::{Deserialize, Serialize};

/// 2D point `(x, y)`
pub type Point = (f64, f64);

/// Euclidean distance between two points
pub fn euclidean_distance(p1: Point, p2: Point) -> f64 {
    let dx = p2.0 - p1.0;
    let dy = p2.1 - p1.1;
    (dx * dx + dy * dy).sqrt()
}

/// Point at parameter `u` on the segment, `u = 0` giving `to` and `u = 1` giving `from`
pub fn blend(from: Point, to: Point, u: f64) -> Point {
    (from.0 * u + to.0 * (1.0 - u), from.1 * u + to.1 * (1.0 - u))
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create rectangle from corner and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create rectangle from center and size
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self {
            x: center.0 - width / 2.0,
            y: center.1 - height / 2.0,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Get center point
    pub fn center(&self) -> Point {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Copy of this rectangle moved so that its center lies on `center`
    pub fn with_center(&self, center: Point) -> Rect {
        Rect::from_center(center, self.width, self.height)
    }

    /// Check if the two rectangles share a region of non-zero area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Check if point is inside the rectangle (edges included)
    pub fn contains_point(&self, point: Point) -> bool {
        point.0 >= self.min_x()
            && point.0 <= self.max_x()
            && point.1 >= self.min_y()
            && point.1 <= self.max_y()
    }

    /// Get area
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let box1 = Rect::new(0.0, 0.0, 2.0, 2.0);
        let box2 = Rect::new(1.0, 1.0, 2.0, 2.0);
        let box3 = Rect::new(5.0, 5.0, 2.0, 2.0);

        assert!(box1.intersects(&box2));
        assert!(box2.intersects(&box1));
        assert!(!box1.intersects(&box3));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let box1 = Rect::new(0.0, 0.0, 5.0, 5.0);
        let right = Rect::new(5.0, 0.0, 5.0, 5.0);
        let corner = Rect::new(5.0, 5.0, 5.0, 5.0);

        assert!(!box1.intersects(&right));
        assert!(!box1.intersects(&corner));
    }

    #[test]
    fn test_containment_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);

        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_from_center() {
        let rect = Rect::from_center((5.0, 5.0), 4.0, 6.0);

        assert_eq!(rect.min_x(), 3.0);
        assert_eq!(rect.max_x(), 7.0);
        assert_eq!(rect.min_y(), 2.0);
        assert_eq!(rect.max_y(), 8.0);
        assert_eq!(rect.center(), (5.0, 5.0));
    }

    #[test]
    fn test_with_center_keeps_size() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0);
        let moved = rect.with_center((100.0, 50.0));

        assert_eq!(moved.width, 20.0);
        assert_eq!(moved.height, 10.0);
        assert_eq!(moved.center(), (100.0, 50.0));
    }

    #[test]
    fn test_contains_point() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(rect.contains_point((5.0, 5.0)));
        assert!(rect.contains_point((10.0, 10.0)));
        assert!(!rect.contains_point((11.0, 5.0)));
    }

    #[test]
    fn test_distance_and_blend() {
        assert_eq!(euclidean_distance((0.0, 0.0), (3.0, 4.0)), 5.0);
        assert_eq!(blend((0.0, 0.0), (10.0, 20.0), 0.0), (10.0, 20.0));
        assert_eq!(blend((0.0, 0.0), (10.0, 20.0), 1.0), (0.0, 0.0));
        assert_eq!(blend((0.0, 0.0), (10.0, 20.0), 0.5), (5.0, 10.0));
    }
}
