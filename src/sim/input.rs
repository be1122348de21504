//! Input normalization
//!
//! Pointer, touch and keyboard events are reduced to a handful of
//! canvas-space actions before they reach a simulation.

use glam::Vec2;

/// A normalized input action in logical canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse down or touch start
    PointerDown(Vec2),
    /// Mouse move or touch move
    PointerMove(Vec2),
    /// Mouse up (with position) or touch end (without)
    PointerUp(Option<Vec2>),
    /// Keyboard jump action
    Jump,
}

/// Raw event sources a simulation listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
    /// Space key on the document
    KeySpace,
}

impl InputSource {
    /// DOM event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            InputSource::MouseDown => "mousedown",
            InputSource::MouseMove => "mousemove",
            InputSource::MouseUp => "mouseup",
            InputSource::TouchStart => "touchstart",
            InputSource::TouchMove => "touchmove",
            InputSource::TouchEnd => "touchend",
            InputSource::KeySpace => "keydown",
        }
    }

    /// Whether the listener goes on the document rather than the canvas
    pub fn on_document(&self) -> bool {
        matches!(self, InputSource::KeySpace)
    }
}

/// Displayed bounds of the canvas in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    /// Map a client-space point to logical canvas space, undoing CSS scaling
    pub fn to_canvas(&self, client: Vec2, logical: Vec2) -> Vec2 {
        let scale_x = if self.width > 0.0 { logical.x / self.width } else { 1.0 };
        let scale_y = if self.height > 0.0 { logical.y / self.height } else { 1.0 };
        Vec2::new(
            (client.x - self.left) * scale_x,
            (client.y - self.top) * scale_y,
        )
    }
}

/// Map a keyboard `code` to an action
pub fn key_action(code: &str) -> Option<InputEvent> {
    match code {
        "Space" => Some(InputEvent::Jump),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_canvas_compensates_scaling() {
        // Canvas displayed at half size, offset on the page
        let rect = CanvasRect {
            left: 100.0,
            top: 50.0,
            width: 300.0,
            height: 200.0,
        };
        let logical = Vec2::new(600.0, 400.0);

        let p = rect.to_canvas(Vec2::new(250.0, 150.0), logical);
        assert!((p.x - 300.0).abs() < 0.001);
        assert!((p.y - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_rect_does_not_divide_by_zero() {
        let rect = CanvasRect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
        let p = rect.to_canvas(Vec2::new(10.0, 20.0), Vec2::new(600.0, 400.0));
        assert_eq!(p, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_key_action() {
        assert_eq!(key_action("Space"), Some(InputEvent::Jump));
        assert_eq!(key_action("Enter"), None);
    }
}
