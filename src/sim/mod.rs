//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each collection)
//! - No rendering, input-device or storage dependencies

pub mod ammo;
pub mod arkanoid;
pub mod collision;
pub mod geom;
pub mod motion;
pub mod shooter;
pub mod spawn;

use glam::Vec2;
use rand_pcg::Pcg32;

pub use ammo::{Magazine, MagazineState};
pub use arkanoid::{Arkanoid, Ball, Brick, Paddle};
pub use geom::{Playfield, Rect};
pub use shooter::{Asteroid, AsteroidKind, Bullet, Coin, Ship, Shooter};

use crate::config::GameConfig;

/// Directional and action intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire held (shooter)
    pub fire: bool,
    /// Reload requested (shooter)
    pub reload: bool,
}

impl Intent {
    /// Horizontal direction: -1, 0 or +1
    pub fn horizontal(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    /// Vertical direction: -1 (up), 0 or +1 (down)
    pub fn vertical(&self) -> f32 {
        (self.down as i8 - self.up as i8) as f32
    }

    /// Unnormalized direction vector in screen space
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.horizontal(), self.vertical())
    }
}

/// What a single tick did to the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Points earned this tick
    pub points: u64,
    /// Loss condition reached; the session must end
    pub lost: bool,
}

/// One game's entity state and step function
pub trait World {
    /// Namespace of this game's score in the per-user record
    const GAME_KEY: &'static str;

    /// Build the startup layout
    fn new(config: &GameConfig) -> Self;

    /// Return every entity to its startup layout
    fn reset(&mut self);

    /// Advance by exactly one fixed step.
    ///
    /// `score` is the session score before this tick (difficulty input).
    fn tick(&mut self, intent: &Intent, score: u64, rng: &mut Pcg32, dt_ms: f64) -> TickOutcome;

    /// Whether the score has reached this game's boss phase
    fn boss_phase(&self, _score: u64) -> bool {
        false
    }

    /// Whether a weapon reload is in progress
    fn reloading(&self) -> bool {
        false
    }
}
