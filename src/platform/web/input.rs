//! Event listeners for the active game

use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

use crate::canvas_size;
use crate::error::Result;
use crate::sim::{CanvasRect, InputEvent, InputSource, key_action};

pub type InputSink = Rc<dyn Fn(InputEvent)>;

struct Listener {
    target: EventTarget,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Attaches exactly the listeners a game declares and removes them again
///
/// Detached closures are kept alive until the next `attach`, since `detach`
/// usually runs from inside one of them (the input that won the game).
pub struct InputAdapter {
    canvas: HtmlCanvasElement,
    document: Document,
    listeners: Vec<Listener>,
    retired: Vec<Listener>,
}

impl InputAdapter {
    pub fn new(canvas: HtmlCanvasElement, document: Document) -> Self {
        Self {
            canvas,
            document,
            listeners: Vec::new(),
            retired: Vec::new(),
        }
    }

    pub fn attach(&mut self, sources: &[InputSource], sink: InputSink) -> Result<()> {
        self.detach();
        self.retired.clear();

        for &source in sources {
            let canvas = self.canvas.clone();
            let sink = sink.clone();
            let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                if let Some(input) = translate(source, &canvas, &event) {
                    sink(input);
                }
            });

            let target: EventTarget = if source.on_document() {
                self.document.clone().into()
            } else {
                self.canvas.clone().into()
            };
            target.add_event_listener_with_callback(
                source.event_type(),
                closure.as_ref().unchecked_ref(),
            )?;
            self.listeners.push(Listener {
                target,
                event_type: source.event_type(),
                closure,
            });
        }
        log::debug!("Attached {} input listeners", self.listeners.len());
        Ok(())
    }

    /// Safe to call repeatedly
    pub fn detach(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event_type,
                listener.closure.as_ref().unchecked_ref(),
            );
            self.retired.push(listener);
        }
        log::debug!("Detached input listeners");
    }
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) -> Vec2 {
    let bounds = canvas.get_bounding_client_rect();
    let rect = CanvasRect {
        left: bounds.left() as f32,
        top: bounds.top() as f32,
        width: bounds.width() as f32,
        height: bounds.height() as f32,
    };
    rect.to_canvas(Vec2::new(client_x, client_y), canvas_size())
}

fn translate(source: InputSource, canvas: &HtmlCanvasElement, event: &Event) -> Option<InputEvent> {
    match source {
        InputSource::MouseDown | InputSource::MouseMove | InputSource::MouseUp => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            let pos = canvas_point(canvas, mouse.client_x() as f32, mouse.client_y() as f32);
            Some(match source {
                InputSource::MouseDown => InputEvent::PointerDown(pos),
                InputSource::MouseMove => InputEvent::PointerMove(pos),
                _ => InputEvent::PointerUp(Some(pos)),
            })
        }
        InputSource::TouchStart | InputSource::TouchMove => {
            // Keep the page from scrolling or synthesizing mouse events
            event.prevent_default();
            let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
            let pos = canvas_point(canvas, touch.client_x() as f32, touch.client_y() as f32);
            Some(if source == InputSource::TouchStart {
                InputEvent::PointerDown(pos)
            } else {
                InputEvent::PointerMove(pos)
            })
        }
        InputSource::TouchEnd => {
            event.prevent_default();
            Some(InputEvent::PointerUp(None))
        }
        InputSource::KeySpace => {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            let action = key_action(&key.code())?;
            event.prevent_default();
            Some(action)
        }
    }
}
