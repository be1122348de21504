//! Browser bootstrap
//!
//! Wires the DOM page, session storage, Canvas2D painter, input listeners and
//! the animation-frame loop around a `GameManager`.

mod frame_loop;
mod input;
mod page;
mod painter;

pub use frame_loop::FrameLoop;
pub use input::InputAdapter;
pub use page::DomPage;
pub use painter::CanvasPainter;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlElement};

use crate::driver::Flow;
use crate::error::{GateError, Result};
use crate::manager::{GameManager, TriggerId, TriggerSetup};
use crate::persistence::BrowserSessionStore;
use crate::settings::Tuning;
use crate::sim::InputEvent;

type Shared = Rc<RefCell<App>>;

struct App {
    manager: GameManager<BrowserSessionStore, DomPage>,
    painter: CanvasPainter,
    input: InputAdapter,
    frames: FrameLoop,
}

impl App {
    /// Bind the running game's inputs and start its frames
    fn arm(&mut self, shared: &Shared) {
        let weak = Rc::downgrade(shared);
        let sink = Rc::new(move |event: InputEvent| on_input(&weak, event));
        if let Err(e) = self.input.attach(self.manager.active_bindings(), sink) {
            log::warn!("Input setup failed: {}", e);
        }

        self.frames.cancel();
        request_frame(self, shared);
    }

    fn teardown(&mut self) {
        self.input.detach();
        self.frames.cancel();
    }
}

fn request_frame(app: &mut App, shared: &Shared) {
    let weak = Rc::downgrade(shared);
    let generation = app.frames.generation();
    let result = app
        .frames
        .request(move |timestamp| on_frame(&weak, generation, timestamp));
    if let Err(e) = result {
        log::error!("requestAnimationFrame failed: {}", e);
    }
}

fn on_frame(weak: &Weak<RefCell<App>>, generation: u32, timestamp: f64) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut app) = shared.try_borrow_mut() else {
        log::warn!("Frame skipped: app busy");
        return;
    };
    if app.frames.generation() != generation {
        return;
    }
    app.frames.fired();

    let App {
        manager, painter, ..
    } = &mut *app;
    match manager.frame(painter, timestamp) {
        Flow::Continue => request_frame(&mut app, &shared),
        Flow::Halt => app.teardown(),
    }
}

fn on_input(weak: &Weak<RefCell<App>>, event: InputEvent) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut app) = shared.try_borrow_mut() else {
        return;
    };
    app.manager.dispatch_input(event);
    if !app.manager.is_running() {
        app.teardown();
    }
}

fn on_trigger_click(shared: &Shared, id: TriggerId, event: &Event) {
    let Ok(mut app) = shared.try_borrow_mut() else {
        return;
    };
    if !app.manager.on_trigger_activated(id) {
        return;
    }
    event.prevent_default();
    if let Some(el) = event
        .current_target()
        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
    {
        let _ = el.blur();
    }
    app.arm(shared);
}

fn on_close(shared: &Shared) {
    if let Ok(mut app) = shared.try_borrow_mut() {
        app.manager.abort();
        app.teardown();
    }
}

/// Listeners that live as long as the page
fn listen<F>(target: &web_sys::EventTarget, event_type: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn start() -> Result<()> {
    let window = web_sys::window().ok_or(GateError::NoWindow)?;
    let document = window
        .document()
        .ok_or(GateError::MissingElement("document"))?;

    let tuning = Tuning::load();
    let store = BrowserSessionStore::open()?;
    let mut page = DomPage::mount(window.clone(), document.clone())?;
    let bindings = page.scan_triggers()?;

    let painter = CanvasPainter::new(page.canvas())?;
    let input = InputAdapter::new(page.canvas().clone(), document);
    let close = page.close_button().clone();
    let trigger_elements: Vec<HtmlElement> = bindings
        .iter()
        .filter_map(|b| page.trigger_element(b.id).cloned())
        .collect();

    let seed = js_sys::Date::now() as u64;
    let mut manager = GameManager::new(store, page, tuning, seed);

    let mut launchable = Vec::new();
    for (binding, el) in bindings.into_iter().zip(trigger_elements) {
        let id = binding.id;
        if manager.setup_trigger(binding) == TriggerSetup::Launch {
            launchable.push((id, el));
        }
    }
    manager.restore_progress();

    let shared: Shared = Rc::new(RefCell::new(App {
        manager,
        painter,
        input,
        frames: FrameLoop::new(),
    }));

    for (id, el) in launchable {
        let app = shared.clone();
        listen(&el, "click", move |event| on_trigger_click(&app, id, &event))?;
    }

    {
        let app = shared.clone();
        listen(&close, "click", move |_| on_close(&app))?;
    }

    {
        let app = shared.clone();
        listen(&window, "resize", move |_| {
            if let Ok(app) = app.try_borrow() {
                app.manager.page().apply_canvas_size();
            }
        })?;
    }

    log::info!("Minigate ready (seed {})", seed);
    Ok(())
}

/// Entry point: set up logging, then start once the DOM is parsed
pub fn run() -> Result<()> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or(GateError::NoWindow)?;
    let document = window
        .document()
        .ok_or(GateError::MissingElement("document"))?;

    if document.ready_state() == "loading" {
        listen(&document, "DOMContentLoaded", |_| {
            if let Err(e) = start() {
                log::error!("Minigate failed to start: {}", e);
            }
        })?;
        Ok(())
    } else {
        start()
    }
}
