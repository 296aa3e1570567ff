//! Game session state machine
//!
//! A session owns one world plus everything around it: score, phase, the
//! seeded RNG and the handle to the best-score store. States are `Running`
//! and `GameOver`; there is no pause.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::GameConfig;
use crate::sim::{Intent, World};
use crate::store::{CommitEvent, ScoreCommitter, WriteOutcome};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Running,
    /// Physics frozen until an explicit restart
    GameOver,
}

/// Player commands outside the per-step intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ExitToMenu,
    Restart,
}

/// What the caller should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct GameSession<W: World> {
    world: W,
    score: u64,
    phase: Phase,
    /// Baseline from the store; only raised by a confirmed write
    best_score: u64,
    new_record: bool,
    rng: Pcg32,
    committer: ScoreCommitter,
    /// Commits dispatched but not yet reported back
    in_flight: usize,
}

impl<W: World> GameSession<W> {
    pub fn new(config: &GameConfig, seed: u64, committer: ScoreCommitter) -> Self {
        let best_score = committer.load_best(W::GAME_KEY);
        log::info!(
            "Session for {} started (seed {seed}, best {best_score})",
            W::GAME_KEY
        );
        Self {
            world: W::new(config),
            score: 0,
            phase: Phase::Running,
            best_score,
            new_record: false,
            rng: Pcg32::seed_from_u64(seed),
            committer,
            in_flight: 0,
        }
    }

    /// Advance one fixed step. No-op once the game is over.
    pub fn step(&mut self, intent: &Intent, dt_ms: f64) {
        if self.phase == Phase::GameOver {
            return;
        }
        let outcome = self.world.tick(intent, self.score, &mut self.rng, dt_ms);
        self.score += outcome.points;
        if outcome.lost {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.new_record = self.score > self.best_score;
        log::info!(
            "Game over on {}: score {} (best {}{})",
            W::GAME_KEY,
            self.score,
            self.best_score,
            if self.new_record { ", new record" } else { "" }
        );
        if self.committer.dispatch(W::GAME_KEY, self.score) {
            self.in_flight += 1;
        }
    }

    /// Reinitialize everything for a new run. Only honoured after game over.
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.world.reset();
        self.score = 0;
        self.new_record = false;
        self.phase = Phase::Running;
        log::info!("Restarted {}", W::GAME_KEY);
        true
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Restart => {
                self.restart();
                Flow::Continue
            }
            Command::ExitToMenu => Flow::Exit,
        }
    }

    /// Drain finished commits without blocking
    pub fn poll_commits(&mut self) -> Vec<CommitEvent> {
        let events = self.committer.poll();
        for event in &events {
            self.record_commit(event);
        }
        events
    }

    /// Block until every dispatched commit has reported, or `timeout` passes.
    /// Returns the number of commits still outstanding.
    pub fn flush_commits(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.committer.wait(remaining) {
                Some(event) => self.record_commit(&event),
                None => break,
            }
        }
        self.in_flight
    }

    fn record_commit(&mut self, event: &CommitEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match &event.result {
            Ok(WriteOutcome::Written { previous }) => {
                log::info!(
                    "Saved {} = {} (was {previous})",
                    event.game_key,
                    event.score
                );
                self.best_score = self.best_score.max(event.score);
            }
            Ok(WriteOutcome::Kept { stored }) => {
                log::debug!(
                    "Kept {} = {stored}; {} is not higher",
                    event.game_key,
                    event.score
                );
            }
            Err(e) => log::error!("Failed to save {} = {}: {e}", event.game_key, event.score),
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Whether the last finished run beat the best score it started against
    pub fn new_record(&self) -> bool {
        self.new_record
    }

    pub fn snapshot(&self) -> Snapshot<'_, W> {
        Snapshot {
            game: W::GAME_KEY,
            score: self.score,
            best_score: self.best_score,
            running: self.is_running(),
            new_record: self.new_record,
            boss_phase: self.world.boss_phase(self.score),
            reloading: self.world.reloading(),
            world: &self.world,
        }
    }
}

/// Read-only view for renderers and the headless runner
#[derive(Debug, Serialize)]
pub struct Snapshot<'a, W> {
    pub game: &'static str,
    pub score: u64,
    pub best_score: u64,
    pub running: bool,
    pub new_record: bool,
    pub boss_phase: bool,
    pub reloading: bool,
    pub world: &'a W,
}
