//! Input sources
//!
//! A source is sampled once per physics step and yields an [`Intent`]. The
//! keyboard source works for any world; the demo bots read the world they
//! drive and play it through the same physics as a human would.

use crate::session::Command;
use crate::sim::{Arkanoid, Intent, Shooter};

/// Something that produces one intent per step
pub trait InputSource<W> {
    fn sample(&mut self, world: &W) -> Intent;
}

/// Physical keys the games react to (DOM `KeyboardEvent.code` names)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyR,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
}

impl Key {
    /// Parse a DOM key code; layout independent
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(Key::KeyW),
            "KeyA" => Some(Key::KeyA),
            "KeyS" => Some(Key::KeyS),
            "KeyD" => Some(Key::KeyD),
            "KeyR" => Some(Key::KeyR),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "Space" => Some(Key::Space),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Held-key state fed by key-down / key-up events
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    held: Intent,
    /// Reload is edge-triggered: one request per key press
    reload_pending: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns a session command for keys that have one.
    ///
    /// Space doubles as fire and restart; the session ignores the restart
    /// while the game is still running.
    pub fn key_down(&mut self, key: Key) -> Option<Command> {
        match key {
            Key::KeyW | Key::ArrowUp => self.held.up = true,
            Key::KeyS | Key::ArrowDown => self.held.down = true,
            Key::KeyA | Key::ArrowLeft => self.held.left = true,
            Key::KeyD | Key::ArrowRight => self.held.right = true,
            Key::KeyR => self.reload_pending = true,
            Key::Space => {
                self.held.fire = true;
                return Some(Command::Restart);
            }
            Key::Escape => return Some(Command::ExitToMenu),
        }
        None
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::KeyW | Key::ArrowUp => self.held.up = false,
            Key::KeyS | Key::ArrowDown => self.held.down = false,
            Key::KeyA | Key::ArrowLeft => self.held.left = false,
            Key::KeyD | Key::ArrowRight => self.held.right = false,
            Key::Space => self.held.fire = false,
            Key::KeyR | Key::Escape => {}
        }
    }

    /// Release everything (e.g. on focus loss)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<W> InputSource<W> for Keyboard {
    fn sample(&mut self, _world: &W) -> Intent {
        Intent {
            reload: std::mem::take(&mut self.reload_pending),
            ..self.held
        }
    }
}

/// Steer toward a target coordinate with a dead zone
fn chase(from: f32, to: f32, dead_zone: f32) -> (bool, bool) {
    let delta = to - from;
    (delta < -dead_zone, delta > dead_zone)
}

/// Demo player for the brick breaker: keeps the paddle under the ball
#[derive(Debug, Clone, Default)]
pub struct PaddleBot;

impl InputSource<Arkanoid> for PaddleBot {
    fn sample(&mut self, world: &Arkanoid) -> Intent {
        let center = world.paddle.rect.center().x;
        let dead_zone = world.config().paddle_speed / 2.0;
        let (left, right) = chase(center, world.ball.pos.x, dead_zone);
        Intent {
            left,
            right,
            ..Default::default()
        }
    }
}

/// Demo player for the shooter: sweeps a figure across the lower field
/// while firing in bursts
#[derive(Debug, Clone)]
pub struct ShipBot {
    step_ms: f64,
    steps: u64,
    last_shot_ms: f64,
}

impl ShipBot {
    /// Time between bot trigger pulls
    const FIRE_PERIOD_MS: f64 = 200.0;

    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            steps: 0,
            last_shot_ms: f64::NEG_INFINITY,
        }
    }

    /// Where the bot wants the ship's center at time `t` (seconds)
    fn target(t: f32, width: f32, home_y: f32) -> (f32, f32) {
        (width / 2.0 + (t * 1.3).sin() * 280.0, home_y + (t * 0.9).sin() * 60.0)
    }
}

impl InputSource<Shooter> for ShipBot {
    fn sample(&mut self, world: &Shooter) -> Intent {
        let now_ms = self.steps as f64 * self.step_ms;
        self.steps += 1;

        let config = world.config();
        let (tx, ty) = Self::target(
            (now_ms / 1000.0) as f32,
            crate::consts::PLAYFIELD_WIDTH,
            config.ship_start.y,
        );
        let center = world.ship.rect.center();
        let (left, right) = chase(center.x, tx, 8.0);
        let (up, down) = chase(center.y, ty, 8.0);

        let fire = now_ms - self.last_shot_ms > Self::FIRE_PERIOD_MS;
        if fire {
            self.last_shot_ms = now_ms;
        }

        Intent {
            left,
            right,
            up,
            down,
            fire,
            reload: false,
        }
    }
}
