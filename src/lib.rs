//! Minigate - canvas mini-games that unlock page content
//!
//! Core modules:
//! - `sim`: Simulations (the four mini-games, session lifecycle, timers, input)
//! - `driver`: Frame clock and loop flow control
//! - `renderer`: Drawing contract the simulations paint through
//! - `persistence`: Session-scoped unlock flags
//! - `manager`: Orchestrator (modal lifecycle, unlock protocol)
//! - `platform`: Browser bindings (DOM, canvas, storage, events)
//! - `settings`: Data-driven game tuning

pub mod driver;
pub mod error;
pub mod manager;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GateError;
pub use manager::{GameManager, Page, TriggerBinding, TriggerId, TriggerSetup};
pub use persistence::{MemoryStore, SessionStore, UnlockRegistry};
pub use settings::Tuning;
pub use sim::{GameKind, MiniGame};

use glam::Vec2;

/// Canvas configuration constants
pub mod consts {
    /// Logical canvas resolution, independent of the displayed CSS size
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Frame delta used when no previous timestamp exists (60 Hz)
    pub const DEFAULT_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest delta fed to a simulation after a stalled tab
    pub const MAX_FRAME_MS: f64 = 100.0;
}

/// Logical canvas size as a vector
#[inline]
pub fn canvas_size() -> Vec2 {
    Vec2::new(consts::CANVAS_WIDTH, consts::CANVAS_HEIGHT)
}
