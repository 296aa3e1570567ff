//! Obstacle and pickup spawning with tiered difficulty
//!
//! Each step runs two independent Bernoulli trials (asteroid, coin). The
//! asteroid variant depends on the score tier:
//! - below the heavy threshold: normal asteroid of random size
//! - at or above it: heavy asteroid with high probability
//! - at or above the boss threshold: always heavy

use rand::Rng;
use rand_pcg::Pcg32;

use super::geom::Rect;
use super::shooter::{Asteroid, AsteroidKind, Coin};
use crate::config::SpawnConfig;

/// Difficulty tier for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Normal,
    Heavy,
    Boss,
}

impl Tier {
    pub fn for_score(score: u64, config: &SpawnConfig) -> Self {
        if score >= config.boss_threshold {
            Tier::Boss
        } else if score >= config.heavy_threshold {
            Tier::Heavy
        } else {
            Tier::Normal
        }
    }
}

/// Uniform sample in [min, max), tolerating an empty range
fn uniform(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Roll one asteroid above the top edge
pub fn asteroid(rng: &mut Pcg32, score: u64, config: &SpawnConfig, width: f32) -> Asteroid {
    let heavy = match Tier::for_score(score, config) {
        Tier::Boss => true,
        Tier::Heavy => rng.random_bool(config.heavy_chance.clamp(0.0, 1.0)),
        Tier::Normal => false,
    };

    if heavy {
        let size = config.heavy_size;
        return Asteroid {
            rect: Rect::new(uniform(rng, 0.0, width - size), -size, size, size),
            speed: config.heavy_speed,
            health: config.heavy_health,
            max_health: config.heavy_health,
            kind: AsteroidKind::Heavy,
        };
    }

    let size = uniform(rng, config.normal_size_min, config.normal_size_max);
    let health = (size / config.normal_health_divisor).floor() as u32 + 1;
    Asteroid {
        rect: Rect::new(uniform(rng, 0.0, width - size), -size, size, size),
        speed: uniform(rng, config.normal_speed_min, config.normal_speed_max),
        health,
        max_health: health,
        kind: AsteroidKind::Normal,
    }
}

/// Roll one coin above the top edge
pub fn coin(rng: &mut Pcg32, config: &SpawnConfig, width: f32) -> Coin {
    let size = config.coin_size;
    Coin {
        rect: Rect::new(uniform(rng, 0.0, width - size), -size, size, size),
        speed: uniform(rng, config.coin_speed_min, config.coin_speed_max),
    }
}

/// Per-step spawn trials
pub fn roll(
    rng: &mut Pcg32,
    score: u64,
    config: &SpawnConfig,
    width: f32,
) -> (Option<Asteroid>, Option<Coin>) {
    let rock = rng
        .random_bool(config.asteroid_chance.clamp(0.0, 1.0))
        .then(|| asteroid(rng, score, config, width));
    let pickup = rng
        .random_bool(config.coin_chance.clamp(0.0, 1.0))
        .then(|| coin(rng, config, width));
    (rock, pickup)
}
