//! Canvas2D implementation of `Painter`

use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::{GateError, Result};
use crate::renderer::{Painter, Sprite, Stroke};
use crate::sim::Rect;

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    sprites: HashMap<Sprite, HtmlImageElement>,
}

impl CanvasPainter {
    /// Grab the 2D context and start loading the sprite images
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(GateError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GateError::ContextUnavailable)?;

        let mut sprites = HashMap::new();
        for sprite in Sprite::ALL {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(sprite.path());
                    sprites.insert(sprite, img);
                }
                Err(e) => log::warn!("Could not create image for {:?}: {:?}", sprite, e),
            }
        }

        Ok(Self { ctx, sprites })
    }

    fn apply_stroke(&self, stroke: Stroke<'_>) {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx
            .set_line_cap(if stroke.round_cap { "round" } else { "butt" });
        let dash = match stroke.dash {
            Some((on, off)) => js_sys::Array::of2(&(on as f64).into(), &(off as f64).into()),
            None => js_sys::Array::new(),
        };
        let _ = self.ctx.set_line_dash(&dash);
    }

    fn trace(&self, points: &[Vec2]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        true
    }
}

impl Painter for CanvasPainter {
    fn clear(&mut self, color: &str) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>) {
        self.apply_stroke(stroke);
        self.ctx
            .stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke<'_>) {
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.stroke();
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke<'_>) {
        self.polyline(&[from, to], stroke);
    }

    fn polyline(&mut self, points: &[Vec2], stroke: Stroke<'_>) {
        self.apply_stroke(stroke);
        if self.trace(points) {
            self.ctx.stroke();
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: &str) {
        self.ctx.set_fill_style_str(color);
        if self.trace(points) {
            self.ctx.close_path();
            self.ctx.fill();
        }
    }

    fn text(&mut self, text: &str, pos: Vec2, font: &str, color: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn set_glow(&mut self, blur: f32, color: &str) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(color);
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        self.sprites
            .get(&sprite)
            .is_some_and(|img| img.complete() && img.natural_width() != 0)
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        if let Some(img) = self.sprites.get(&sprite) {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                rect.x as f64,
                rect.y as f64,
                rect.w as f64,
                rect.h as f64,
            );
        }
    }
}
