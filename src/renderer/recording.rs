//! Recording painter for tests and headless runs

use std::collections::HashSet;

use glam::Vec2;

use super::{Painter, Sprite, Stroke};
use crate::sim::collision::Rect;

/// A recorded draw call (styles reduced to what assertions need)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { color: String },
    FillRect { rect: Rect, color: String },
    StrokeRect { rect: Rect, color: String },
    FillCircle { center: Vec2, radius: f32, color: String },
    StrokeCircle { center: Vec2, radius: f32, color: String },
    Line { from: Vec2, to: Vec2, color: String, width: f32 },
    Polyline { points: Vec<Vec2>, color: String },
    FillPolygon { points: Vec<Vec2>, color: String },
    Text { text: String, pos: Vec2 },
    Alpha(f32),
    Glow(f32),
    Sprite { sprite: Sprite, rect: Rect },
}

/// Painter that stores every call
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
    ready: HashSet<Sprite>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the image finished (or failed) loading
    pub fn set_sprite_ready(&mut self, sprite: Sprite, ready: bool) {
        if ready {
            self.ready.insert(sprite);
        } else {
            self.ready.remove(&sprite);
        }
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn sprites(&self) -> impl Iterator<Item = (Sprite, Rect)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite { sprite, rect } => Some((*sprite, *rect)),
            _ => None,
        })
    }

    pub fn filled_rects(&self) -> impl Iterator<Item = (Rect, &str)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillRect { rect, color } => Some((*rect, color.as_str())),
            _ => None,
        })
    }
}

impl Painter for CommandBuffer {
    fn clear(&mut self, color: &str) {
        self.commands.push(DrawCommand::Clear {
            color: color.to_string(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: stroke.color.to_string(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color: stroke.color.to_string(),
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn polyline(&mut self, points: &[Vec2], stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color: stroke.color.to_string(),
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: &str) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color: color.to_string(),
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, _font: &str, _color: &str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
        });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Alpha(alpha));
    }

    fn set_glow(&mut self, blur: f32, _color: &str) {
        self.commands.push(DrawCommand::Glow(blur));
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        self.ready.contains(&sprite)
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.commands.push(DrawCommand::Sprite { sprite, rect });
    }
}
