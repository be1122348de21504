//! The shared mini-game contract

use serde::{Deserialize, Serialize};

use super::input::{InputEvent, InputSource};
use super::session::OnComplete;
use super::{Basket, BugHunter, Mario, WireFix};
use crate::renderer::Painter;
use crate::settings::Tuning;

/// Game variant selected by a trigger's `data-game-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    #[default]
    Bug,
    Wire,
    Basket,
    Mario,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Bug,
        GameKind::Wire,
        GameKind::Basket,
        GameKind::Mario,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Bug => "bug",
            GameKind::Wire => "wire",
            GameKind::Basket => "basket",
            GameKind::Mario => "mario",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bug" => Some(GameKind::Bug),
            "wire" => Some(GameKind::Wire),
            "basket" => Some(GameKind::Basket),
            "mario" => Some(GameKind::Mario),
            _ => None,
        }
    }

    /// Trigger attribute value; missing or unknown selects the default game
    pub fn from_attr(attr: Option<&str>) -> Self {
        attr.and_then(Self::from_str).unwrap_or_default()
    }

    /// Session storage key of the unlock flag
    pub fn storage_key(&self) -> String {
        format!("unlocked_{}", self.as_str())
    }
}

/// Text shown above and below the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub title: &'static str,
    pub instruction: &'static str,
    pub status: String,
    /// Title color; `None` keeps the stylesheet default
    pub accent: Option<&'static str>,
}

/// A mini-game bound to the shared canvas
///
/// Lifecycle: `start` arms the session (resetting state via `init`),
/// `update`/`draw` run once per frame while active, and the session ends with
/// `stop` (no callback) or an internal win (callback once). Input and ticks
/// delivered to an idle game are ignored.
pub trait MiniGame {
    fn kind(&self) -> GameKind;

    /// Reset entities to the pre-game layout
    fn init(&mut self);

    fn start(&mut self, on_complete: OnComplete);

    /// Idempotent; drops pending delayed actions
    fn stop(&mut self);

    fn update(&mut self, dt_ms: f64);

    fn draw(&self, painter: &mut dyn Painter);

    fn handle_input(&mut self, event: InputEvent);

    fn is_active(&self) -> bool;

    fn hud(&self) -> Hud;

    /// Event sources the platform must listen to while this game is active
    fn bindings(&self) -> &'static [InputSource];
}

/// Construct the simulation for `kind`
pub fn create_game(kind: GameKind, tuning: &Tuning, seed: u64) -> Box<dyn MiniGame> {
    match kind {
        GameKind::Bug => Box::new(BugHunter::new(tuning.bug.clone(), seed)),
        GameKind::Wire => Box::new(WireFix::new(tuning.wire.clone(), seed)),
        GameKind::Basket => Box::new(Basket::new(tuning.basket.clone())),
        GameKind::Mario => Box::new(Mario::new(tuning.mario.clone(), seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_attr_defaults_to_bug() {
        assert_eq!(GameKind::from_attr(None), GameKind::Bug);
        assert_eq!(GameKind::from_attr(Some("")), GameKind::Bug);
        assert_eq!(GameKind::from_attr(Some("pinball")), GameKind::Bug);
        assert_eq!(GameKind::from_attr(Some("Wire")), GameKind::Wire);
        assert_eq!(GameKind::from_attr(Some("mario")), GameKind::Mario);
    }

    #[test]
    fn test_storage_keys() {
        let keys: Vec<String> = GameKind::ALL.iter().map(|k| k.storage_key()).collect();
        assert_eq!(
            keys,
            vec!["unlocked_bug", "unlocked_wire", "unlocked_basket", "unlocked_mario"]
        );
    }

    #[test]
    fn test_create_game_matches_kind() {
        let tuning = Tuning::default();
        for kind in GameKind::ALL {
            let game = create_game(kind, &tuning, 7);
            assert_eq!(game.kind(), kind);
            assert!(!game.is_active());
        }
    }
}
