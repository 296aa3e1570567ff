//! Motion models shared by both games
//!
//! All quantities are per fixed step: velocities are pixels/step and
//! accelerations pixels/step².

use glam::Vec2;

/// Direct-speed horizontal movement: -1, 0 or +1 times `speed`
#[inline]
pub fn slide(x: f32, direction: f32, speed: f32) -> f32 {
    x + direction * speed
}

/// Exponential speed ramp.
///
/// While the speed is below `max_speed` both components grow by `growth`.
/// Whatever overshoot that produces is rescaled back onto the cap, so the
/// returned speed never exceeds it.
pub fn ramp(vel: Vec2, growth: f32, max_speed: f32) -> Vec2 {
    let vel = if vel.length() < max_speed {
        vel * growth
    } else {
        vel
    };
    vel.clamp_length_max(max_speed)
}

/// Accelerate-then-decay thrust parameters
#[derive(Debug, Clone, Copy)]
pub struct Thrust {
    pub accel: f32,
    /// Multiplier applied every step (< 1)
    pub friction: f32,
    pub max_speed: f32,
}

impl Thrust {
    /// Next velocity for a directional intent.
    ///
    /// Order: accelerate along the normalized intent, apply friction, clamp.
    pub fn apply(&self, vel: Vec2, intent: Vec2) -> Vec2 {
        let vel = vel + intent.normalize_or_zero() * self.accel;
        (vel * self.friction).clamp_length_max(self.max_speed)
    }
}
