//! Axis-aligned collision geometry
//!
//! Every entity is a rectangle; overlap is the only physics there is.

use glam::Vec2;

/// An axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
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
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.min.x + self.size.x / 2.0
    }

    /// Strict overlap test: rectangles that only share an edge don't collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}
