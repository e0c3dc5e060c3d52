//! Axis-aligned boxes
//!
//! Every entity is a rectangle anchored at its top-left corner, in scene coordinates
//! (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Whether the two boxes share at least one point (touching edges count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x <= b_max.x
            && other.min.x <= a_max.x
            && self.min.y <= b_max.y
            && other.min.y <= a_max.y
    }

    /// Whether the point lies inside or on the boundary
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Whether the horizontal extents overlap, ignoring y
    #[inline]
    pub fn spans_x(&self, other: &Aabb) -> bool {
        self.min.x <= other.max().x && other.min.x <= self.max().x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, side: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::splat(side))
    }

    #[test]
    fn test_overlap_and_separation() {
        let a = square(0.0, 0.0, 30.0);
        assert!(a.overlaps(&square(20.0, 20.0, 30.0)));
        assert!(!a.overlaps(&square(31.0, 0.0, 30.0)));
        assert!(!a.overlaps(&square(0.0, 31.0, 30.0)));
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = square(0.0, 0.0, 30.0);
        assert!(a.overlaps(&square(30.0, 0.0, 30.0)));
        assert!(a.overlaps(&square(30.0, 30.0, 5.0)));
    }

    #[test]
    fn test_contains_point() {
        let cloud = Aabb::new(Vec2::new(100.0, -20.0), Vec2::new(300.0, 100.0));
        assert!(cloud.contains(Vec2::new(250.0, 50.0)));
        assert!(cloud.contains(Vec2::new(400.0, 50.0)));
        assert!(!cloud.contains(Vec2::new(99.0, 50.0)));
        assert!(!cloud.contains(Vec2::new(250.0, 81.0)));
    }
}
