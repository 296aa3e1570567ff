//! Brick breaker world
//!
//! Paddle, one ball, and a grid of bricks that is rebuilt (with a bonus)
//! every time it is cleared. Levels are implicit: there is no level counter.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{newest_overlap, paddle_deflection, reflect_off_walls};
use super::geom::{Playfield, Rect};
use super::motion::{ramp, slide};
use super::{Intent, TickOutcome, World};
use crate::config::{ArkanoidConfig, GameConfig};

/// Brick colour per row, top to bottom (0xRRGGBB)
pub const BRICK_COLORS: [u32; 5] = [0xef4444, 0xf59e0b, 0x10b981, 0x06b6d4, 0xa855f7];

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paddle {
    pub rect: Rect,
}

/// The ball (center + radius)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A destructible brick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: u32,
    pub alive: bool,
}

/// Complete brick breaker state
#[derive(Debug, Clone, Serialize)]
pub struct Arkanoid {
    #[serde(skip)]
    config: ArkanoidConfig,
    #[serde(skip)]
    field: Playfield,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Active bricks in build order (row-major)
    pub bricks: Vec<Brick>,
}

impl Arkanoid {
    fn start_paddle(config: &ArkanoidConfig) -> Paddle {
        Paddle {
            rect: Rect::from_corner(config.paddle_start, config.paddle_size),
        }
    }

    fn start_ball(config: &ArkanoidConfig) -> Ball {
        Ball {
            pos: config.ball_start,
            vel: config.ball_velocity,
            radius: config.ball_radius,
        }
    }

    /// Full brick grid in row-major order
    pub fn build_bricks(config: &ArkanoidConfig) -> Vec<Brick> {
        let mut bricks = Vec::with_capacity((config.brick_rows * config.brick_cols) as usize);
        for row in 0..config.brick_rows {
            for col in 0..config.brick_cols {
                let corner = config.brick_origin
                    + Vec2::new(col as f32, row as f32) * config.brick_pitch;
                bricks.push(Brick {
                    rect: Rect::from_corner(corner, config.brick_size),
                    color: BRICK_COLORS[row as usize % BRICK_COLORS.len()],
                    alive: true,
                });
            }
        }
        bricks
    }

    pub fn config(&self) -> &ArkanoidConfig {
        &self.config
    }

    pub fn alive_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    /// Direct-speed paddle movement, clamped to the playfield
    fn move_paddle(&mut self, intent: &Intent) {
        let rect = &mut self.paddle.rect;
        rect.x = slide(rect.x, intent.horizontal(), self.config.paddle_speed);
        self.field.clamp_rect(rect);
    }
}

impl World for Arkanoid {
    const GAME_KEY: &'static str = "arkanoidBest";

    fn new(config: &GameConfig) -> Self {
        let arkanoid = config.arkanoid.clone();
        Self {
            field: config.playfield,
            paddle: Self::start_paddle(&arkanoid),
            ball: Self::start_ball(&arkanoid),
            bricks: Self::build_bricks(&arkanoid),
            config: arkanoid,
        }
    }

    fn reset(&mut self) {
        self.paddle = Self::start_paddle(&self.config);
        self.ball = Self::start_ball(&self.config);
        self.bricks = Self::build_bricks(&self.config);
    }

    fn tick(&mut self, intent: &Intent, _score: u64, _rng: &mut Pcg32, _dt_ms: f64) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        self.move_paddle(intent);

        let ball = &mut self.ball;
        ball.vel = ramp(ball.vel, self.config.ball_growth, self.config.ball_max_speed);
        ball.pos += ball.vel;

        if reflect_off_walls(ball.pos, &mut ball.vel, ball.radius, &self.field) {
            outcome.lost = true;
            return outcome;
        }

        if let Some(vel) = paddle_deflection(
            ball.pos,
            ball.vel,
            ball.radius,
            &self.paddle.rect,
            self.config.steering,
        ) {
            ball.vel = vel.clamp_length_max(self.config.ball_max_speed);
        }

        // One brick per step; newest-built brick wins a tie
        let probe = Rect::point(ball.pos);
        if let Some(i) = newest_overlap(&self.bricks, &probe, |b| b.alive.then_some(b.rect)) {
            self.bricks[i].alive = false;
            ball.vel.y = -ball.vel.y;
            outcome.points += self.config.brick_reward;
        }
        self.bricks.retain(|b| b.alive);

        if self.bricks.is_empty() {
            self.bricks = Self::build_bricks(&self.config);
            outcome.points += self.config.level_bonus;
            log::info!("Brick grid cleared, rebuilding {} bricks", self.bricks.len());
        }

        outcome
    }
}
