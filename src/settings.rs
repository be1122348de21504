//! Game tuning
//!
//! Every gameplay constant lives here so a page can override it through
//! LocalStorage without a rebuild. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Bug hunter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BugTuning {
    /// Bugs to destroy before the gate opens
    pub target_score: u32,
    /// Bugs on screen when the game starts
    pub initial_bugs: usize,
    /// Extra hit radius beyond half the bug size (pixels)
    pub hit_tolerance: f32,
    /// Spawn immediately when fewer than this many bugs remain
    pub min_supply: usize,
    /// Delay before the follow-up spawn after a hit (ms)
    pub respawn_delay_ms: f64,
    pub min_size: f32,
    pub max_size: f32,
    /// Largest speed component (pixels per tick)
    pub max_speed: f32,
}

impl Default for BugTuning {
    fn default() -> Self {
        Self {
            target_score: 5,
            initial_bugs: 3,
            hit_tolerance: 10.0,
            min_supply: 2,
            respawn_delay_ms: 200.0,
            min_size: 30.0,
            max_size: 50.0,
            max_speed: 2.0,
        }
    }
}

/// Wire fix parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WireTuning {
    /// Shared radius for pick-up, magnet and commit tests
    pub snap_radius: f32,
    /// Delay between the last connection and the win (ms)
    pub win_delay_ms: f64,
    pub left_x: f32,
    pub right_x: f32,
    pub terminal_ys: [f32; 4],
    /// Particles per successful connection
    pub burst_size: usize,
    pub particle_speed: f32,
    pub particle_decay: f32,
}

impl Default for WireTuning {
    fn default() -> Self {
        Self {
            snap_radius: 30.0,
            win_delay_ms: 500.0,
            left_x: 80.0,
            right_x: 520.0,
            terminal_ys: [80.0, 160.0, 240.0, 320.0],
            burst_size: 10,
            particle_speed: 2.5,
            particle_decay: 0.05,
        }
    }
}

/// Basket parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasketTuning {
    pub ball_start: (f32, f32),
    pub ball_radius: f32,
    pub hoop: (f32, f32),
    pub hoop_radius: f32,
    /// Downward acceleration (pixels per tick²)
    pub gravity: f32,
    /// Power change per tick while charging
    pub power_step: f32,
    /// Launch angle above horizontal (degrees)
    pub launch_angle_deg: f32,
    /// Launch speed at zero power
    pub base_speed: f32,
    /// Power units per extra unit of speed
    pub power_divisor: f32,
    /// Ball-to-hoop distance that counts as a basket
    pub score_radius: f32,
}

impl Default for BasketTuning {
    fn default() -> Self {
        Self {
            ball_start: (100.0, 300.0),
            ball_radius: 15.0,
            hoop: (500.0, 150.0),
            hoop_radius: 25.0,
            gravity: 0.5,
            power_step: 2.0,
            launch_angle_deg: 60.0,
            base_speed: 10.0,
            power_divisor: 5.0,
            score_radius: 20.0,
        }
    }
}

/// Obstacle runner parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarioTuning {
    pub target_distance: f32,
    /// Extra distance past the target before the goal flag reaches the player
    pub win_margin: f32,
    pub gravity: f32,
    /// Upward velocity applied on jump (pixels per tick)
    pub jump_impulse: f32,
    /// World scroll speed (units per tick)
    pub speed: f32,
    /// Chance per tick of spawning once spacing allows it
    pub spawn_chance: f32,
    /// Minimum distance between spawns
    pub spawn_spacing: f32,
    /// Probability a spawn is a pipe rather than an enemy
    pub pipe_chance: f32,
    pub ground_y: f32,
    pub player_x: f32,
}

impl Default for MarioTuning {
    fn default() -> Self {
        Self {
            target_distance: 2000.0,
            win_margin: 250.0,
            gravity: 0.6,
            jump_impulse: 12.0,
            speed: 4.0,
            spawn_chance: 0.02,
            spawn_spacing: 400.0,
            pipe_chance: 0.4,
            ground_y: 300.0,
            player_x: 50.0,
        }
    }
}

/// Orchestrator timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateTuning {
    pub toast_duration_ms: u32,
    pub navigate_delay_ms: u32,
    pub toast_message: String,
}

impl Default for GateTuning {
    fn default() -> Self {
        Self {
            toast_duration_ms: 3000,
            navigate_delay_ms: 1000,
            toast_message: "🔓 ACCESS GRANTED".to_string(),
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub bug: BugTuning,
    pub wire: WireTuning,
    pub basket: BasketTuning,
    pub mario: MarioTuning,
    pub gate: GateTuning,
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "minigate_tuning";

    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning overrides: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
