//! Frame loop plumbing shared by the browser scheduler and headless runs
//!
//! The scheduler asks `run_frame` what to do after every frame and only
//! resubmits on `Flow::Continue`. A stopped or won game therefore stops
//! receiving frames without anyone having to cancel a pending callback.

use crate::consts::{DEFAULT_FRAME_MS, MAX_FRAME_MS};
use crate::renderer::Painter;
use crate::sim::MiniGame;

/// Whether the scheduler should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Turns animation-frame timestamps into clamped deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous tick
    ///
    /// The first tick after `reset` reports one 60 Hz frame. Large gaps (a
    /// backgrounded tab) are clamped so timers and physics don't jump.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let dt = match self.last {
            Some(last) => (timestamp_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => DEFAULT_FRAME_MS,
        };
        self.last = Some(timestamp_ms);
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Advance and draw one frame of `game`
///
/// An idle game is neither updated nor drawn.
pub fn run_frame(
    game: &mut dyn MiniGame,
    painter: &mut dyn Painter,
    clock: &mut FrameClock,
    timestamp_ms: f64,
) -> Flow {
    if !game.is_active() {
        return Flow::Halt;
    }
    let dt = clock.tick(timestamp_ms);
    game.update(dt);
    game.draw(painter);
    if game.is_active() {
        Flow::Continue
    } else {
        log::debug!("{} session ended, halting frames", game.kind().as_str());
        Flow::Halt
    }
}
