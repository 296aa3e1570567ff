//! Fixed-step scheduling
//!
//! Frames arrive at whatever rate the host manages; the simulation always
//! advances in fixed slices. Leftover time carries over in an accumulator,
//! and a stalled frame is capped so the game never spirals trying to catch
//! up.

use crate::config::TimingConfig;
use crate::input::InputSource;
use crate::session::GameSession;
use crate::sim::World;
use crate::store::CommitEvent;

/// Smallest accepted step, so a zero in the config cannot hang the loop
const MIN_STEP_MS: f64 = 1.0;

/// Frame-time accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_ms: f64,
    max_frame_delta_ms: f64,
    accumulator: f64,
    /// Timestamp of the previous frame; `None` until the first frame
    last_time: Option<f64>,
}

impl FixedStep {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            step_ms: timing.step_ms.max(MIN_STEP_MS),
            max_frame_delta_ms: timing.max_frame_delta_ms.max(0.0),
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    /// Leftover time not yet consumed by a step
    pub fn pending_ms(&self) -> f64 {
        self.accumulator
    }

    /// Feed a frame timestamp; returns how many fixed steps to run.
    ///
    /// The first call only records the baseline. Clocks that jump backwards
    /// count as zero elapsed time.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_time.replace(now_ms) else {
            return 0;
        };
        self.accumulator += (now_ms - last).clamp(0.0, self.max_frame_delta_ms);

        let mut steps = 0;
        while self.accumulator >= self.step_ms {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        steps
    }
}

/// What one frame did
#[derive(Debug)]
pub struct FrameReport {
    pub steps: u32,
    /// Score commits that finished since the previous frame
    pub commits: Vec<CommitEvent>,
}

/// Session, input source and accumulator wired together
pub struct GameLoop<W: World, I: InputSource<W>> {
    pub session: GameSession<W>,
    pub input: I,
    clock: FixedStep,
}

impl<W: World, I: InputSource<W>> GameLoop<W, I> {
    pub fn new(session: GameSession<W>, input: I, timing: &TimingConfig) -> Self {
        Self {
            session,
            input,
            clock: FixedStep::new(timing),
        }
    }

    /// Run the steps owed at `now_ms`, sampling input once per step
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        let steps = self.clock.advance(now_ms);
        let dt_ms = self.clock.step_ms();
        for _ in 0..steps {
            let intent = self.input.sample(self.session.world());
            self.session.step(&intent, dt_ms);
        }
        FrameReport {
            steps,
            commits: self.session.poll_commits(),
        }
    }
}
