//! Space shooter world
//!
//! A thrust-driven ship dodges falling asteroids, shoots them down and
//! collects coins. Asteroids and coins arrive from the spawner; the game
//! ends on the first asteroid contact (no shields, no lives).

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ammo::Magazine;
use super::collision::newest_overlap;
use super::geom::{Playfield, Rect};
use super::motion::Thrust;
use super::spawn::{self, Tier};
use super::{Intent, TickOutcome, World};
use crate::config::{GameConfig, ShooterConfig};

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ship {
    pub rect: Rect,
    pub vel: Vec2,
}

impl Ship {
    /// Collision box, smaller than the sprite
    pub fn hitbox(&self, config: &ShooterConfig) -> Rect {
        self.rect.inset(config.hitbox_offset, config.hitbox_scale)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bullet {
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AsteroidKind {
    Normal,
    /// Large, tough and worth more; rendered distinctly
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asteroid {
    pub rect: Rect,
    /// Pixels per step, downward
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    pub kind: AsteroidKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coin {
    pub rect: Rect,
    pub speed: f32,
}

/// Complete shooter state
#[derive(Debug, Clone, Serialize)]
pub struct Shooter {
    #[serde(skip)]
    config: ShooterConfig,
    #[serde(skip)]
    field: Playfield,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub coins: Vec<Coin>,
    pub magazine: Magazine,
    /// Simulation time since (re)start, ms
    pub clock_ms: f64,
}

impl Shooter {
    fn start_ship(config: &ShooterConfig) -> Ship {
        Ship {
            rect: Rect::from_corner(config.ship_start, config.ship_size),
            vel: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &ShooterConfig {
        &self.config
    }

    fn thrust(&self) -> Thrust {
        Thrust {
            accel: self.config.ship_accel,
            friction: self.config.ship_friction,
            max_speed: self.config.ship_max_speed,
        }
    }

    /// Accelerate, decay, clamp speed, integrate, clamp to the playfield
    fn steer_ship(&mut self, intent: &Intent) {
        let thrust = self.thrust();
        let ship = &mut self.ship;
        ship.vel = thrust.apply(ship.vel, intent.axis());
        ship.rect.x += ship.vel.x;
        ship.rect.y += ship.vel.y;
        self.field.clamp_rect(&mut ship.rect);
    }

    fn fire(&mut self) {
        if self.magazine.try_fire(self.clock_ms) {
            let size = self.config.bullet_size;
            let corner = Vec2::new(self.ship.rect.x + self.config.bullet_offset_x, self.ship.rect.y);
            self.bullets.push(Bullet {
                rect: Rect::from_corner(corner, size),
            });
        }
    }

    /// Move projectiles and falling objects; drop whatever left the field
    fn advance_objects(&mut self) {
        let bullet_speed = self.config.bullet_speed;
        self.bullets.retain_mut(|b| {
            b.rect.y -= bullet_speed;
            b.rect.y > -b.rect.h
        });

        let floor = self.field.height;
        self.asteroids.retain_mut(|a| {
            a.rect.y += a.speed;
            a.rect.y < floor
        });
        self.coins.retain_mut(|c| {
            c.rect.y += c.speed;
            c.rect.y < floor
        });
    }

    /// Each bullet (newest first) damages at most one asteroid (newest first)
    fn resolve_bullets(&mut self) -> u64 {
        let mut points = 0;
        let mut bi = self.bullets.len();
        while bi > 0 {
            bi -= 1;
            let probe = self.bullets[bi].rect;
            let Some(ai) = newest_overlap(&self.asteroids, &probe, |a| Some(a.rect)) else {
                continue;
            };
            self.bullets.remove(bi);
            let asteroid = &mut self.asteroids[ai];
            asteroid.health = asteroid.health.saturating_sub(1);
            if asteroid.health == 0 {
                points += self.config.kill_reward_per_health * u64::from(asteroid.max_health);
                self.asteroids.remove(ai);
            }
        }
        points
    }

    fn collect_coins(&mut self, hitbox: &Rect) -> u64 {
        let before = self.coins.len();
        self.coins.retain(|c| !hitbox.overlaps(&c.rect));
        (before - self.coins.len()) as u64 * self.config.coin_reward
    }
}

impl World for Shooter {
    const GAME_KEY: &'static str = "spaceShooterBest";

    fn new(config: &GameConfig) -> Self {
        let shooter = config.shooter.clone();
        Self {
            field: config.playfield,
            ship: Self::start_ship(&shooter),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            coins: Vec::new(),
            magazine: Magazine::new(&shooter),
            clock_ms: 0.0,
            config: shooter,
        }
    }

    fn reset(&mut self) {
        self.ship = Self::start_ship(&self.config);
        self.bullets.clear();
        self.asteroids.clear();
        self.coins.clear();
        self.magazine = Magazine::new(&self.config);
        self.clock_ms = 0.0;
    }

    fn tick(&mut self, intent: &Intent, score: u64, rng: &mut Pcg32, dt_ms: f64) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        self.clock_ms += dt_ms;

        self.steer_ship(intent);
        self.magazine.update(self.clock_ms);
        if intent.reload {
            self.magazine.start_reload(self.clock_ms);
        }
        if intent.fire {
            self.fire();
        }
        let hitbox = self.ship.hitbox(&self.config);

        self.advance_objects();
        outcome.points += self.resolve_bullets();
        outcome.points += self.collect_coins(&hitbox);

        if self.asteroids.iter().any(|a| hitbox.overlaps(&a.rect)) {
            outcome.lost = true;
            return outcome;
        }

        let (asteroid, coin) = spawn::roll(rng, score, &self.config.spawn, self.field.width);
        if let Some(asteroid) = asteroid {
            log::debug!(
                "Spawned {:?} asteroid (hp {}) at x={:.0}",
                asteroid.kind,
                asteroid.health,
                asteroid.rect.x
            );
            self.asteroids.push(asteroid);
        }
        self.coins.extend(coin);

        outcome
    }

    fn boss_phase(&self, score: u64) -> bool {
        Tier::for_score(score, &self.config.spawn) == Tier::Boss
    }

    fn reloading(&self) -> bool {
        self.magazine.is_reloading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnConfig;
    use crate::consts::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    /// Shooter with spawning disabled so tests control every object
    fn quiet() -> Shooter {
        let mut config = GameConfig::default();
        config.shooter.spawn = SpawnConfig {
            asteroid_chance: 0.0,
            coin_chance: 0.0,
            ..SpawnConfig::default()
        };
        Shooter::new(&config)
    }

    fn step(world: &mut Shooter, intent: Intent) -> TickOutcome {
        world.tick(&intent, 0, &mut Pcg32::seed_from_u64(3), STEP_MS)
    }

    fn rock(x: f32, y: f32, size: f32, health: u32) -> Asteroid {
        Asteroid {
            rect: Rect::new(x, y, size, size),
            speed: 0.0,
            health,
            max_health: health,
            kind: AsteroidKind::Normal,
        }
    }

    #[test]
    fn test_ship_accelerates_then_coasts() {
        let mut w = quiet();
        let right = Intent {
            right: true,
            ..Default::default()
        };
        step(&mut w, right);
        // (0 + 1.5) * 0.94
        assert!((w.ship.vel.x - 1.41).abs() < 1e-4);
        assert!((w.ship.rect.x - (SHIP_X + 1.41)).abs() < 1e-3);

        let coasting = w.ship.vel.x * SHIP_FRICTION;
        step(&mut w, Intent::default());
        assert!((w.ship.vel.x - coasting).abs() < 1e-4);
    }

    #[test]
    fn test_fire_spawns_bullet_at_nose() {
        let mut w = quiet();
        let fire = Intent {
            fire: true,
            ..Default::default()
        };
        step(&mut w, fire);
        assert_eq!(w.magazine.ammo, MAX_AMMO - 1);
        assert_eq!(w.bullets.len(), 1);
        // Spawned at the nose then advanced once
        assert_eq!(w.bullets[0].rect, Rect::new(SHIP_X + 9.0, SHIP_Y - 18.0, 4.0, 12.0));

        // 60 ms interval: next accepted shot is 4 steps (66.7 ms) later
        for _ in 0..3 {
            step(&mut w, fire);
        }
        assert_eq!(w.bullets.len(), 1);
        step(&mut w, fire);
        assert_eq!(w.bullets.len(), 2);
    }

    #[test]
    fn test_bullets_expire_off_top() {
        let mut w = quiet();
        w.bullets.push(Bullet {
            rect: Rect::new(100.0, 5.0, 4.0, 12.0),
        });
        step(&mut w, Intent::default());
        // y = -13 <= -12: removed in the same step
        assert!(w.bullets.is_empty());
    }

    #[test]
    fn test_falling_objects_expire_at_floor() {
        let mut w = quiet();
        let mut a = rock(10.0, 590.0, 30.0, 1);
        a.speed = 10.0;
        w.asteroids.push(a);
        w.coins.push(Coin {
            rect: Rect::new(700.0, 595.0, 20.0, 20.0),
            speed: 5.0,
        });
        step(&mut w, Intent::default());
        assert!(w.asteroids.is_empty());
        assert!(w.coins.is_empty());
    }

    #[test]
    fn test_bullet_damages_then_destroys() {
        let mut w = quiet();
        w.asteroids.push(rock(100.0, 100.0, 40.0, 2));
        w.bullets.push(Bullet {
            rect: Rect::new(110.0, 150.0, 4.0, 12.0),
        });
        let outcome = step(&mut w, Intent::default());
        assert_eq!(outcome.points, 0);
        assert!(w.bullets.is_empty());
        assert_eq!(w.asteroids[0].health, 1);

        w.bullets.push(Bullet {
            rect: Rect::new(110.0, 150.0, 4.0, 12.0),
        });
        let outcome = step(&mut w, Intent::default());
        // 10 x max health
        assert_eq!(outcome.points, 20);
        assert!(w.asteroids.is_empty());
    }

    #[test]
    fn test_one_asteroid_per_bullet() {
        let mut w = quiet();
        w.asteroids.push(rock(100.0, 100.0, 40.0, 1));
        w.asteroids.push(rock(105.0, 100.0, 40.0, 1));
        w.bullets.push(Bullet {
            rect: Rect::new(110.0, 150.0, 4.0, 12.0),
        });
        let outcome = step(&mut w, Intent::default());
        assert_eq!(outcome.points, 10);
        assert_eq!(w.asteroids.len(), 1);
        // Newest asteroid took the hit
        assert_eq!(w.asteroids[0].rect.x, 100.0);
    }

    #[test]
    fn test_coin_pickup() {
        let mut w = quiet();
        let hitbox = w.ship.hitbox(w.config());
        w.coins.push(Coin {
            rect: Rect::new(hitbox.x, hitbox.y, 20.0, 20.0),
            speed: 0.0,
        });
        let outcome = step(&mut w, Intent::default());
        assert_eq!(outcome.points, 1);
        assert!(w.coins.is_empty());
    }

    #[test]
    fn test_asteroid_contact_is_lost() {
        let mut w = quiet();
        let hitbox = w.ship.hitbox(w.config());
        w.asteroids.push(rock(hitbox.x - 5.0, hitbox.y - 5.0, 30.0, 3));
        let outcome = step(&mut w, Intent::default());
        assert!(outcome.lost);
    }

    #[test]
    fn test_sprite_corner_outside_hitbox_is_safe() {
        let mut w = quiet();
        // Overlaps the sprite's top-left corner but not the inset hitbox
        w.asteroids.push(rock(SHIP_X - 29.0, SHIP_Y - 29.0, 30.0, 3));
        let outcome = step(&mut w, Intent::default());
        assert!(!outcome.lost);
    }

    #[test]
    fn test_empty_magazine_reload_cycle() {
        let mut w = quiet();
        w.magazine.ammo = 0;
        let fire = Intent {
            fire: true,
            ..Default::default()
        };
        step(&mut w, fire);
        assert!(w.bullets.is_empty());
        assert!(w.magazine.is_reloading());

        // 2000 ms at 16.67 ms per step
        let steps = (RELOAD_MS / STEP_MS).ceil() as usize;
        for _ in 0..steps {
            step(&mut w, Intent::default());
        }
        assert!(!w.magazine.is_reloading());
        assert_eq!(w.magazine.ammo, MAX_AMMO);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut w = quiet();
        w.asteroids.push(rock(1.0, 1.0, 30.0, 1));
        w.coins.push(Coin {
            rect: Rect::new(0.0, 0.0, 20.0, 20.0),
            speed: 4.0,
        });
        w.magazine.ammo = 3;
        w.ship.vel = Vec2::new(5.0, 5.0);
        w.reset();
        assert!(w.asteroids.is_empty() && w.coins.is_empty() && w.bullets.is_empty());
        assert_eq!(w.magazine.ammo, MAX_AMMO);
        assert_eq!(w.ship, Shooter::start_ship(w.config()));
        assert_eq!(w.clock_ms, 0.0);
    }

    #[test]
    fn test_boss_phase_flag() {
        let w = quiet();
        assert!(!w.boss_phase(1999));
        assert!(w.boss_phase(2000));
    }

    proptest! {
        #[test]
        fn ship_stays_in_bounds_under_cap(
            moves in proptest::collection::vec(0u8..16, 1..300)
        ) {
            let mut w = quiet();
            let mut rng = Pcg32::seed_from_u64(11);
            for m in moves {
                let intent = Intent {
                    left: m & 1 != 0,
                    right: m & 2 != 0,
                    up: m & 4 != 0,
                    down: m & 8 != 0,
                    ..Default::default()
                };
                w.tick(&intent, 0, &mut rng, STEP_MS);
                let r = w.ship.rect;
                prop_assert!(r.x >= 0.0 && r.x <= PLAYFIELD_WIDTH - r.w);
                prop_assert!(r.y >= 0.0 && r.y <= PLAYFIELD_HEIGHT - r.h);
                prop_assert!(w.ship.vel.length() <= SHIP_MAX_SPEED + 1e-3);
            }
        }

        #[test]
        fn ammo_stays_in_range(
            fire in proptest::collection::vec(any::<bool>(), 1..400)
        ) {
            let mut w = quiet();
            let mut rng = Pcg32::seed_from_u64(12);
            for f in fire {
                let intent = Intent { fire: f, reload: !f, ..Default::default() };
                let before = w.magazine.ammo;
                let reloading = w.magazine.is_reloading();
                w.tick(&intent, 0, &mut rng, STEP_MS);
                prop_assert!(w.magazine.ammo <= MAX_AMMO);
                if reloading && w.magazine.is_reloading() {
                    prop_assert_eq!(w.magazine.ammo, before);
                }
            }
        }
    }
}
