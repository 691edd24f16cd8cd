//! Axis-aligned rectangle geometry for bricks, paddle and grid bounds
//!
//! Viewport space is y-up: `min` is the bottom-left corner, `max` the top-right.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Bottom-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Grow the rectangle by `amount` on every side (Minkowski sum with a square)
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            size: self.size + Vec2::splat(2.0 * amount),
        }
    }

    /// Edges count as inside
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(90.0, 50.0, 80.0, 30.0);
        assert_eq!(r.left(), 90.0);
        assert_eq!(r.right(), 170.0);
        assert_eq!(r.bottom(), 50.0);
        assert_eq!(r.top(), 80.0);
        assert_eq!(r.center(), Vec2::new(130.0, 65.0));
    }

    #[test]
    fn test_expanded_keeps_center() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0);
        let e = r.expanded(2.0);
        assert_eq!(e.min, Vec2::new(-2.0, -2.0));
        assert_eq!(e.max(), Vec2::new(12.0, 6.0));
        assert_eq!(e.center(), r.center());
    }

    #[test]
    fn test_contains_includes_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 10.0)));
        assert!(r.contains(Vec2::new(5.0, 5.0)));
        assert!(!r.contains(Vec2::new(10.1, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, -0.1)));
    }
}
