//! Gameplay simulation
//!
//! Every mini-game lives here, free of browser types:
//! - Input arrives as `InputEvent`s already mapped to canvas coordinates
//! - Drawing goes through the `Painter` trait
//! - Randomness comes from a seeded RNG
//! - Delayed actions are owned by the session and die with it

pub mod basket;
pub mod bug_hunter;
pub mod collision;
pub mod game;
pub mod input;
pub mod mario;
pub mod session;
pub mod timer;
pub mod wire_fix;

pub use basket::Basket;
pub use bug_hunter::BugHunter;
pub use collision::Rect;
pub use game::{GameKind, Hud, MiniGame, create_game};
pub use input::{CanvasRect, InputEvent, InputSource, key_action};
pub use mario::Mario;
pub use session::{GameSession, OnComplete, SessionPhase};
pub use timer::Timers;
pub use wire_fix::WireFix;
