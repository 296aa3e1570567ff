//! Neon Arcade - simulation core for a neon brick breaker and space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning)
//! - `session`: Game session state machine and best-score baseline
//! - `scheduler`: Fixed-step accumulator driving a session per frame
//! - `input`: Held-key sampling and scripted demo inputs
//! - `store`: Best-score store contract and fire-and-forget commits
//! - `config`: Data-driven game balance
//! - `logging`: env_logger setup for the binary

pub mod config;
pub mod input;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod store;

pub use config::GameConfig;
pub use scheduler::{FixedStep, GameLoop};
pub use session::{Command, GameSession, Phase};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const STEP_MS: f64 = 16.67;
    /// Largest frame delta fed to the accumulator (stall / background tab guard)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Playfield dimensions (both games)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_X: f32 = 350.0;
    pub const PADDLE_Y: f32 = 550.0;
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Pixels per step while a direction is held
    pub const PADDLE_SPEED: f32 = 18.0;

    /// Ball defaults
    pub const BALL_X: f32 = 400.0;
    pub const BALL_Y: f32 = 500.0;
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BALL_START_VX: f32 = 7.0;
    pub const BALL_START_VY: f32 = -7.0;
    pub const BALL_MAX_SPEED: f32 = 45.0;
    /// Per-step velocity multiplier while below max speed
    pub const BALL_GROWTH: f32 = 1.0005;
    /// Horizontal kick at the paddle edge (offset normalized to [-1, 1])
    pub const PADDLE_STEERING: f32 = 10.0;

    /// Brick grid
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_COLS: u32 = 13;
    pub const BRICK_WIDTH: f32 = 55.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_PITCH_X: f32 = 60.0;
    pub const BRICK_PITCH_Y: f32 = 30.0;
    pub const BRICK_ORIGIN_X: f32 = 20.0;
    pub const BRICK_ORIGIN_Y: f32 = 80.0;
    pub const BRICK_REWARD: u64 = 10;
    pub const LEVEL_CLEAR_BONUS: u64 = 100;

    /// Ship defaults
    pub const SHIP_X: f32 = 390.0;
    pub const SHIP_Y: f32 = 520.0;
    pub const SHIP_WIDTH: f32 = 20.0;
    pub const SHIP_HEIGHT: f32 = 25.0;
    pub const SHIP_ACCEL: f32 = 1.5;
    pub const SHIP_FRICTION: f32 = 0.94;
    pub const SHIP_MAX_SPEED: f32 = 18.0;

    /// Ammo
    pub const MAX_AMMO: u32 = 30;
    pub const SHOT_INTERVAL_MS: f64 = 60.0;
    pub const RELOAD_MS: f64 = 2000.0;

    /// Difficulty tiers (score thresholds)
    pub const HEAVY_THRESHOLD: u64 = 500;
    pub const BOSS_THRESHOLD: u64 = 2000;
}
