//! Axis-aligned rectangles in world pixels.

use serde::{Deserialize, Serialize};

/// An axis-aligned box with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive overlap: rectangles sharing only an edge still count.
    #[must_use]
    pub fn touches(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Strict overlap: shared edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns true if the point lies inside, edges included.
    #[must_use]
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Distance from a point to the nearest point of this rectangle.
    ///
    /// Zero when the point is inside.
    #[must_use]
    pub fn distance_to_point(&self, px: f32, py: f32) -> f32 {
        let dx = (self.x - px).max(0.0).max(px - self.right());
        let dy = (self.y - py).max(0.0).max(py - self.bottom());
        dx.hypot(dy)
    }

    /// Returns true if all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_is_inclusive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.touches(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 1.0, 1.0);
        assert!(a.overlaps(&b));
        assert!(a.touches(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.touches(&c));
    }

    #[test]
    fn test_distance_to_point() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.distance_to_point(5.0, 5.0), 0.0);
        assert_eq!(r.distance_to_point(13.0, 5.0), 3.0);
        assert!((r.distance_to_point(13.0, 14.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_and_edges() {
        let r = Rect::new(2.0, 4.0, 6.0, 8.0);
        assert_eq!(r.center(), (5.0, 8.0));
        assert_eq!(r.right(), 8.0);
        assert_eq!(r.bottom(), 12.0);
        assert!(r.contains_point(8.0, 12.0));
        assert!(!r.contains_point(8.1, 12.0));
    }
}
