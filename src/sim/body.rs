//! Axis-aligned rectangles and the bodies built from them
//!
//! World space has its origin at the top-left with y growing downward, so a
//! rectangle's `top` is its smallest y and `bottom` its largest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner plus extent)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Negative extents are clamped to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.position() + self.size() * 0.5
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Interior overlap test. Shared edges do not count, and empty
    /// rectangles never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Same rectangle shifted by `offset`
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }
}

/// A rectangle placed in the world by its top-left `position`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAlignedBody {
    pub position: Vec2,
    pub size: Vec2,
}

impl AxisAlignedBody {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size: size.max(Vec2::ZERO),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

/// Anything the movement resolver can push through the world
pub trait MovableBody {
    fn body(&self) -> AxisAlignedBody;
    fn velocity(&self) -> Vec2;
}

impl MovableBody for (AxisAlignedBody, Vec2) {
    fn body(&self) -> AxisAlignedBody {
        self.0
    }

    fn velocity(&self) -> Vec2 {
        self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 5.0, 8.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 28.0);
        assert_eq!(r.center(), Vec2::new(12.5, 24.0));
    }

    #[test]
    fn test_set_edges_keeps_size() {
        let mut r = Rect::new(0.0, 0.0, 9.0, 18.0);
        r.set_right(100.0);
        assert_eq!(r.x, 91.0);
        r.set_bottom(200.0);
        assert_eq!(r.y, 182.0);
        r.set_left(5.0);
        r.set_top(6.0);
        assert_eq!(r.size(), Vec2::new(9.0, 18.0));
        assert_eq!(r.position(), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let floor = Rect::new(0.0, 200.0, 5000.0, 20.0);
        let resting = Rect::new(50.0, 182.0, 9.0, 18.0);
        assert!(!resting.intersects(&floor));

        let sunk = Rect::new(50.0, 182.5, 9.0, 18.0);
        assert!(sunk.intersects(&floor));
        assert!(floor.intersects(&sunk));
    }

    #[test]
    fn test_zero_size_never_intersects() {
        let big = Rect::new(0.0, 0.0, 100.0, 100.0);
        let point = Rect::new(50.0, 50.0, 0.0, 0.0);
        let line = Rect::new(10.0, 10.0, 50.0, 0.0);
        assert!(!big.intersects(&point));
        assert!(!point.intersects(&big));
        assert!(!big.intersects(&line));
    }

    #[test]
    fn test_negative_size_is_clamped() {
        let r = Rect::new(0.0, 0.0, -4.0, 3.0);
        assert_eq!(r.width, 0.0);
        assert!(r.is_empty());

        let body = AxisAlignedBody::new(Vec2::ZERO, Vec2::new(-1.0, 2.0));
        assert_eq!(body.size, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_body_rect_places_top_left() {
        let body = AxisAlignedBody::new(Vec2::new(50.0, 50.0), Vec2::new(9.0, 18.0));
        assert_eq!(body.rect(), Rect::new(50.0, 50.0, 9.0, 18.0));
        assert_eq!(body.center(), Vec2::new(54.5, 59.0));
    }
}
