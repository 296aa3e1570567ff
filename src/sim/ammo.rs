//! Magazine with rate limiting and timed reloads
//!
//! Times are simulation milliseconds (sum of fixed steps), never wall clock.

use serde::Serialize;

use crate::config::ShooterConfig;

/// Reload sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MagazineState {
    Ready,
    /// Reload began at this simulation time
    Reloading { since_ms: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Magazine {
    pub ammo: u32,
    pub max_ammo: u32,
    pub state: MagazineState,
    #[serde(skip)]
    last_shot_ms: Option<f64>,
    #[serde(skip)]
    shot_interval_ms: f64,
    #[serde(skip)]
    reload_ms: f64,
}

impl Magazine {
    pub fn new(config: &ShooterConfig) -> Self {
        Self {
            ammo: config.max_ammo,
            max_ammo: config.max_ammo,
            state: MagazineState::Ready,
            last_shot_ms: None,
            shot_interval_ms: config.shot_interval_ms,
            reload_ms: config.reload_ms,
        }
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.state, MagazineState::Reloading { .. })
    }

    /// Try to take one round.
    ///
    /// Rejected while reloading, when empty, or inside the shot interval.
    /// An empty magazine starts reloading, whether it was emptied by this
    /// shot or was already empty.
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if self.is_reloading() {
            return false;
        }
        if self.ammo == 0 {
            self.start_reload(now_ms);
            return false;
        }
        if self
            .last_shot_ms
            .is_some_and(|last| now_ms - last < self.shot_interval_ms)
        {
            return false;
        }

        self.ammo -= 1;
        self.last_shot_ms = Some(now_ms);
        if self.ammo == 0 {
            self.start_reload(now_ms);
        }
        true
    }

    /// Begin a reload. No-op while already reloading or when full.
    pub fn start_reload(&mut self, now_ms: f64) -> bool {
        if self.is_reloading() || self.ammo >= self.max_ammo {
            return false;
        }
        self.state = MagazineState::Reloading { since_ms: now_ms };
        log::debug!("Reload started with {} rounds left", self.ammo);
        true
    }

    /// Finish a reload once its duration has elapsed
    pub fn update(&mut self, now_ms: f64) {
        if let MagazineState::Reloading { since_ms } = self.state {
            if now_ms - since_ms >= self.reload_ms {
                self.ammo = self.max_ammo;
                self.state = MagazineState::Ready;
            }
        }
    }

    /// Fraction of the reload completed (0 when ready)
    pub fn reload_progress(&self, now_ms: f64) -> f32 {
        match self.state {
            MagazineState::Ready => 0.0,
            MagazineState::Reloading { since_ms } => {
                ((now_ms - since_ms) / self.reload_ms).clamp(0.0, 1.0) as f32
            }
        }
    }
}
