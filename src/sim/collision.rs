//! Collision detection and response
//!
//! Everything here works on axis-aligned boxes (see [`Rect::overlaps`]).
//! The ball is a circle for wall and paddle tests, and a point probe at its
//! center for brick tests.

use glam::Vec2;

use super::geom::{Playfield, Rect};

/// Reflect a ball off the left, right and top walls.
///
/// The velocity component is turned to point back into the playfield, so a
/// ball still overlapping a wall on the next step keeps heading inward.
/// Returns `true` when the ball's bottom edge has crossed the floor; that is
/// a loss, not a bounce.
pub fn reflect_off_walls(pos: Vec2, vel: &mut Vec2, radius: f32, field: &Playfield) -> bool {
    if pos.x - radius < 0.0 {
        vel.x = vel.x.abs();
    } else if pos.x + radius > field.width {
        vel.x = -vel.x.abs();
    }
    if pos.y - radius < 0.0 {
        vel.y = vel.y.abs();
    }
    pos.y + radius > field.height
}

/// Ball-paddle deflection.
///
/// A hit needs the ball's bottom edge past the paddle's top edge, its center
/// strictly within the paddle's horizontal span, and downward motion (so a
/// ball already bounced upward is not caught twice). On a hit the vertical
/// velocity inverts and the horizontal velocity gains `offset * steering`,
/// where `offset` in [-1, 1] is the hit position relative to the paddle
/// center. Returns the new velocity, or `None` on a miss.
pub fn paddle_deflection(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    paddle: &Rect,
    steering: f32,
) -> Option<Vec2> {
    let in_span = pos.x > paddle.x && pos.x < paddle.x + paddle.w;
    if pos.y + radius > paddle.y && in_span && vel.y > 0.0 {
        let half = paddle.w / 2.0;
        let offset = (pos.x - (paddle.x + half)) / half;
        Some(Vec2::new(vel.x + offset * steering, -vel.y))
    } else {
        None
    }
}

/// Index of the first item (walking from the back) whose bounds overlap `probe`.
///
/// `bounds` returns `None` for items that no longer collide (destroyed),
/// so they are skipped. Newest-first order is the tie-break when several
/// items overlap in the same step.
pub fn newest_overlap<T>(
    items: &[T],
    probe: &Rect,
    bounds: impl Fn(&T) -> Option<Rect>,
) -> Option<usize> {
    items
        .iter()
        .rposition(|item| bounds(item).is_some_and(|r| probe.overlaps(&r)))
}
