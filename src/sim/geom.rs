//! Axis-aligned geometry for paddles, bricks and sprites
//!
//! Screen space: origin at the playfield's top-left, y grows downward.
//! A rectangle is stored by its top-left corner and size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle from a top-left corner and a size vector
    pub fn from_corner(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Zero-size rectangle at a point (used as a probe)
    pub fn point(p: Vec2) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Strict AABB overlap: each min edge must lie strictly before the other's
    /// max edge on both axes. Touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Sub-rectangle offset from this one's corner and scaled in size
    pub fn inset(&self, offset: Vec2, scale: f32) -> Rect {
        Rect::new(
            self.x + offset.x,
            self.y + offset.y,
            self.w * scale,
            self.h * scale,
        )
    }
}

/// Playfield bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    /// Clamp a rectangle's corner so the whole rectangle stays inside
    pub fn clamp_rect(&self, rect: &mut Rect) {
        rect.x = rect.x.max(0.0).min(self.width - rect.w);
        rect.y = rect.y.max(0.0).min(self.height - rect.h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Sharing an edge is not a collision
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(a.overlaps(&Rect::new(9.9, 9.9, 10.0, 10.0)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = Rect::new(5.0, 5.0, 20.0, 4.0);
        let b = Rect::new(10.0, 0.0, 2.0, 30.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_point_probe() {
        let brick = Rect::new(20.0, 80.0, 55.0, 25.0);
        assert!(Rect::point(Vec2::new(40.0, 90.0)).overlaps(&brick));
        assert!(!Rect::point(Vec2::new(20.0, 90.0)).overlaps(&brick));
        assert!(!Rect::point(Vec2::new(75.0, 90.0)).overlaps(&brick));
    }

    #[test]
    fn test_inset_hitbox() {
        let ship = Rect::new(390.0, 520.0, 20.0, 25.0);
        let hitbox = ship.inset(Vec2::new(3.0, 5.0), 0.7);
        assert_eq!(hitbox.min(), Vec2::new(393.0, 525.0));
        assert!((hitbox.w - 14.0).abs() < 1e-4);
        assert!((hitbox.h - 17.5).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_rect() {
        let field = Playfield::default();
        let mut r = Rect::new(-30.0, 700.0, 100.0, 20.0);
        field.clamp_rect(&mut r);
        assert_eq!(r.min(), Vec2::new(0.0, 580.0));

        let mut r = Rect::new(750.0, -5.0, 100.0, 20.0);
        field.clamp_rect(&mut r);
        assert_eq!(r.min(), Vec2::new(700.0, 0.0));
    }
}
