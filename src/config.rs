//! Game balance configuration
//!
//! Loaded from a JSON file. Every section is optional; missing fields fall
//! back to the defaults in [`crate::consts`].

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::geom::Playfield;

/// Failure to load a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level configuration for both games and the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub playfield: Playfield,
    pub arkanoid: ArkanoidConfig,
    pub shooter: ShooterConfig,
}

impl GameConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Fixed-step scheduler timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulation slice length (ms)
    pub step_ms: f64,
    /// Upper bound on the frame delta added to the accumulator (ms)
    pub max_frame_delta_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_ms: STEP_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
        }
    }
}

/// Brick breaker balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArkanoidConfig {
    /// Paddle top-left at start
    pub paddle_start: Vec2,
    pub paddle_size: Vec2,
    /// Pixels per step while held
    pub paddle_speed: f32,
    pub ball_start: Vec2,
    pub ball_radius: f32,
    pub ball_velocity: Vec2,
    pub ball_max_speed: f32,
    pub ball_growth: f32,
    pub steering: f32,
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_size: Vec2,
    /// Distance between neighbouring brick origins
    pub brick_pitch: Vec2,
    /// Top-left of the first brick
    pub brick_origin: Vec2,
    pub brick_reward: u64,
    pub level_bonus: u64,
}

impl Default for ArkanoidConfig {
    fn default() -> Self {
        Self {
            paddle_start: Vec2::new(PADDLE_X, PADDLE_Y),
            paddle_size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            paddle_speed: PADDLE_SPEED,
            ball_start: Vec2::new(BALL_X, BALL_Y),
            ball_radius: BALL_RADIUS,
            ball_velocity: Vec2::new(BALL_START_VX, BALL_START_VY),
            ball_max_speed: BALL_MAX_SPEED,
            ball_growth: BALL_GROWTH,
            steering: PADDLE_STEERING,
            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            brick_pitch: Vec2::new(BRICK_PITCH_X, BRICK_PITCH_Y),
            brick_origin: Vec2::new(BRICK_ORIGIN_X, BRICK_ORIGIN_Y),
            brick_reward: BRICK_REWARD,
            level_bonus: LEVEL_CLEAR_BONUS,
        }
    }
}

/// Space shooter balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub ship_start: Vec2,
    pub ship_size: Vec2,
    pub ship_accel: f32,
    /// Velocity multiplier applied every step (< 1)
    pub ship_friction: f32,
    pub ship_max_speed: f32,
    /// Hitbox offset from the ship's top-left
    pub hitbox_offset: Vec2,
    /// Hitbox size as a fraction of the ship size
    pub hitbox_scale: f32,
    pub bullet_size: Vec2,
    /// Bullet spawn offset from the ship's left edge
    pub bullet_offset_x: f32,
    pub bullet_speed: f32,
    pub max_ammo: u32,
    pub shot_interval_ms: f64,
    pub reload_ms: f64,
    pub coin_reward: u64,
    /// Kill reward is this times the asteroid's max health
    pub kill_reward_per_health: u64,
    pub spawn: SpawnConfig,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            ship_start: Vec2::new(SHIP_X, SHIP_Y),
            ship_size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            ship_accel: SHIP_ACCEL,
            ship_friction: SHIP_FRICTION,
            ship_max_speed: SHIP_MAX_SPEED,
            hitbox_offset: Vec2::new(3.0, 5.0),
            hitbox_scale: 0.7,
            bullet_size: Vec2::new(4.0, 12.0),
            bullet_offset_x: 9.0,
            bullet_speed: 18.0,
            max_ammo: MAX_AMMO,
            shot_interval_ms: SHOT_INTERVAL_MS,
            reload_ms: RELOAD_MS,
            coin_reward: 1,
            kill_reward_per_health: 10,
            spawn: SpawnConfig::default(),
        }
    }
}

/// Obstacle and pickup spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Per-step chance of an asteroid
    pub asteroid_chance: f64,
    /// Per-step chance of a coin
    pub coin_chance: f64,
    pub normal_size_min: f32,
    pub normal_size_max: f32,
    /// Normal health is floor(size / divisor) + 1
    pub normal_health_divisor: f32,
    pub normal_speed_min: f32,
    pub normal_speed_max: f32,
    pub heavy_size: f32,
    pub heavy_health: u32,
    pub heavy_speed: f32,
    /// Score at which heavy asteroids start appearing
    pub heavy_threshold: u64,
    /// Chance of a heavy asteroid between the heavy and boss thresholds
    pub heavy_chance: f64,
    /// Score at which every asteroid is heavy
    pub boss_threshold: u64,
    pub coin_size: f32,
    pub coin_speed_min: f32,
    pub coin_speed_max: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            asteroid_chance: 0.077,
            coin_chance: 0.02,
            normal_size_min: 30.0,
            normal_size_max: 60.0,
            normal_health_divisor: 10.0,
            normal_speed_min: 4.0,
            normal_speed_max: 7.0,
            heavy_size: 75.0,
            heavy_health: 5,
            heavy_speed: 5.0,
            heavy_threshold: HEAVY_THRESHOLD,
            heavy_chance: 0.99,
            boss_threshold: BOSS_THRESHOLD,
            coin_size: 20.0,
            coin_speed_min: 4.0,
            coin_speed_max: 7.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = GameConfig::from_json(
            r#"{ "shooter": { "max_ammo": 12, "spawn": { "boss_threshold": 900 } } }"#,
        )
        .unwrap();
        assert_eq!(config.shooter.max_ammo, 12);
        assert_eq!(config.shooter.spawn.boss_threshold, 900);
        assert_eq!(config.shooter.spawn.heavy_threshold, HEAVY_THRESHOLD);
        assert_eq!(config.arkanoid, ArkanoidConfig::default());
        assert_eq!(config.timing.step_ms, STEP_MS);
    }

    #[test]
    fn test_vectors_parse_as_pairs() {
        let config =
            GameConfig::from_json(r#"{ "arkanoid": { "ball_velocity": [3.0, -4.0] } }"#).unwrap();
        assert_eq!(config.arkanoid.ball_velocity, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            GameConfig::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
