use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::{GateError, Result};

/// requestAnimationFrame scheduler with explicit cancellation
///
/// Each request is tagged with the loop generation. `cancel` bumps the
/// generation and cancels the pending handle, so a callback that still slips
/// through sees a stale generation and does nothing.
#[derive(Debug, Default)]
pub struct FrameLoop {
    handle: Option<i32>,
    generation: u32,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Schedule `on_frame(timestamp_ms)` for the next repaint
    pub fn request<F>(&mut self, on_frame: F) -> Result<()>
    where
        F: FnOnce(f64) + 'static,
    {
        let window = web_sys::window().ok_or(GateError::NoWindow)?;
        let closure = Closure::once(on_frame);
        let handle = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        closure.forget();
        self.handle = Some(handle);
        Ok(())
    }

    /// The pending callback is running
    pub fn fired(&mut self) {
        self.handle = None;
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
        self.generation = self.generation.wrapping_add(1);
    }
}
