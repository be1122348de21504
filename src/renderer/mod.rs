//! Drawing contract
//!
//! Simulations paint through `Painter` so they stay free of browser types.
//! The browser implementation wraps a Canvas2D context; `CommandBuffer`
//! records calls for tests and headless runs.

pub mod recording;
pub mod shapes;

pub use recording::{CommandBuffer, DrawCommand};

use glam::Vec2;

use crate::sim::collision::Rect;

/// Optional decorative images used by the obstacle runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Enemy,
    Pipe,
}

impl Sprite {
    pub const ALL: [Sprite; 3] = [Sprite::Player, Sprite::Enemy, Sprite::Pipe];

    /// Image URL relative to the page
    pub fn path(&self) -> &'static str {
        match self {
            Sprite::Player => "assets/images/mario.png",
            Sprite::Enemy => "assets/images/goomba.png",
            Sprite::Pipe => "assets/images/pipe.png",
        }
    }
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f32,
    pub round_cap: bool,
    /// Dash pattern (on, off)
    pub dash: Option<(f32, f32)>,
}

impl<'a> Stroke<'a> {
    pub fn solid(color: &'a str, width: f32) -> Self {
        Self {
            color,
            width,
            round_cap: false,
            dash: None,
        }
    }

    pub fn round(mut self) -> Self {
        self.round_cap = true;
        self
    }

    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some((on, off));
        self
    }
}

/// A 2D drawing surface in logical canvas coordinates
pub trait Painter {
    /// Fill the whole surface
    fn clear(&mut self, color: &str);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke<'_>);

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke<'_>);

    /// Stroke a run of connected segments
    fn polyline(&mut self, points: &[Vec2], stroke: Stroke<'_>);

    fn fill_polygon(&mut self, points: &[Vec2], color: &str);

    fn text(&mut self, text: &str, pos: Vec2, font: &str, color: &str);

    /// Global opacity for subsequent calls (1.0 = opaque)
    fn set_alpha(&mut self, alpha: f32);

    /// Glow (shadow blur) for subsequent calls; `blur = 0` disables it
    fn set_glow(&mut self, blur: f32, color: &str);

    /// Whether the image has finished loading with a non-zero size
    fn sprite_ready(&self, sprite: Sprite) -> bool;

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
}

/// Shared palette
pub mod palette {
    /// Dark slate backdrop used by the puzzle games
    pub const BACKDROP: &str = "#0f172a";
    pub const PANEL: &str = "#334155";
    pub const PIN_BASE: &str = "#1e293b";
    pub const WHITE: &str = "#ffffff";
    pub const RED: &str = "#ef4444";
    pub const BLUE: &str = "#3b82f6";
    pub const GREEN: &str = "#10b981";
    pub const AMBER: &str = "#f59e0b";
}
