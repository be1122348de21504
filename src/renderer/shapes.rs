//! Composite shapes shared by several games

use glam::Vec2;

use super::{Painter, Sprite, Stroke, palette};
use crate::sim::collision::Rect;

/// Which grid lines to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLines {
    Vertical,
    Both,
}

/// Backdrop grid every `spacing` pixels
pub fn grid(painter: &mut dyn Painter, bounds: Vec2, spacing: f32, lines: GridLines, stroke: Stroke<'_>) {
    let mut x = 0.0;
    while x < bounds.x {
        painter.line(Vec2::new(x, 0.0), Vec2::new(x, bounds.y), stroke);
        x += spacing;
    }
    if lines == GridLines::Both {
        let mut y = 0.0;
        while y < bounds.y {
            painter.line(Vec2::new(0.0, y), Vec2::new(bounds.x, y), stroke);
            y += spacing;
        }
    }
}

/// Wire terminal: dark socket with a glowing colored core
pub fn pin(painter: &mut dyn Painter, pos: Vec2, color: &str) {
    painter.fill_circle(pos, 15.0, palette::PIN_BASE);
    painter.set_glow(10.0, color);
    painter.fill_circle(pos, 8.0, color);
    painter.set_glow(0.0, color);
}

/// Draw the sprite if it is loaded, otherwise a solid rectangle.
///
/// Readiness is queried on every call; images may finish loading mid-game.
pub fn sprite_or_fill(painter: &mut dyn Painter, sprite: Sprite, rect: Rect, fallback: &str) {
    if painter.sprite_ready(sprite) {
        painter.draw_sprite(sprite, rect);
    } else {
        painter.fill_rect(rect, fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandBuffer, DrawCommand};

    #[test]
    fn test_sprite_or_fill_switches_when_loaded() {
        let mut buf = CommandBuffer::new();
        let rect = Rect::new(0.0, 0.0, 30.0, 30.0);

        sprite_or_fill(&mut buf, Sprite::Enemy, rect, "#a04000");
        assert_eq!(
            buf.commands,
            vec![DrawCommand::FillRect {
                rect,
                color: "#a04000".to_string()
            }]
        );

        buf.clear_commands();
        buf.set_sprite_ready(Sprite::Enemy, true);
        sprite_or_fill(&mut buf, Sprite::Enemy, rect, "#a04000");
        assert_eq!(
            buf.commands,
            vec![DrawCommand::Sprite {
                sprite: Sprite::Enemy,
                rect
            }]
        );
    }

    #[test]
    fn test_grid_line_count() {
        let mut buf = CommandBuffer::new();
        grid(
            &mut buf,
            Vec2::new(600.0, 400.0),
            40.0,
            GridLines::Both,
            Stroke::solid("#fff", 1.0),
        );
        // 15 vertical + 10 horizontal
        assert_eq!(buf.commands.len(), 25);
    }
}
