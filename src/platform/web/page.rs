//! DOM side of the orchestrator

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, Window};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::{GateError, Result};
use crate::manager::{Page, TriggerBinding, TriggerId};
use crate::sim::{GameKind, Hud};

pub const MODAL_ID: &str = "game-modal";
pub const CANVAS_ID: &str = "game-canvas";
pub const CLOSE_ID: &str = "close-game";
pub const TRIGGER_CLASS: &str = "locked-content-trigger";
const UNLOCKED_CLASS: &str = "unlocked-btn";
/// Gated triggers plus any link or button that names a game type
const SCAN_SELECTOR: &str =
    ".locked-content-trigger, a[data-game-type], button[data-game-type]";
const SECTION_SELECTOR: &str = ".locked-section";
const OVERLAY_SELECTOR: &str = ".locked-overlay";
const HIDDEN_CLASS: &str = "hidden-content";
const TOAST_CLASS: &str = "unlock-toast";

const MODAL_MARKUP: &str = r#"
    <div class="game-container">
        <div class="game-header">
            <h3>SYSTEM LOCKED 🔒</h3>
            <p>Default instruction</p>
        </div>
        <canvas id="game-canvas"></canvas>
        <div class="game-ui">
            <div class="score"></div>
            <button id="close-game" class="close-btn">ABORT</button>
        </div>
    </div>"#;

/// Handles into the modal, held for the page lifetime
pub struct DomPage {
    window: Window,
    document: Document,
    modal: HtmlElement,
    title: HtmlElement,
    instruction: Element,
    status: Element,
    canvas: HtmlCanvasElement,
    close: Element,
    triggers: Vec<HtmlElement>,
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::warn!("Failed to set {}: {:?}", property, e);
    }
}

fn query<T: JsCast>(root: &Element, selector: &'static str) -> Result<T> {
    root.query_selector(selector)?
        .ok_or(GateError::MissingElement(selector))?
        .dyn_into::<T>()
        .map_err(|_| GateError::MissingElement(selector))
}

impl DomPage {
    /// Find the modal or build it, then resolve every handle
    pub fn mount(window: Window, document: Document) -> Result<Self> {
        let modal = match document.get_element_by_id(MODAL_ID) {
            Some(modal) => modal,
            None => {
                let modal = document.create_element("div")?;
                modal.set_id(MODAL_ID);
                modal.set_class_name("game-modal");
                modal.set_inner_html(MODAL_MARKUP);
                document
                    .body()
                    .ok_or(GateError::MissingElement("body"))?
                    .append_child(&modal)?;
                log::info!("Created game modal");
                modal
            }
        };

        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .ok_or(GateError::MissingElement(CANVAS_ID))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GateError::NotACanvas(CANVAS_ID))?;
        let close = document
            .get_element_by_id(CLOSE_ID)
            .ok_or(GateError::MissingElement(CLOSE_ID))?;

        let page = Self {
            title: query(&modal, ".game-header h3")?,
            instruction: query(&modal, ".game-header p")?,
            status: query(&modal, ".score")?,
            modal: modal
                .dyn_into::<HtmlElement>()
                .map_err(|_| GateError::MissingElement(MODAL_ID))?,
            window,
            document,
            canvas,
            close,
            triggers: Vec::new(),
        };
        page.apply_canvas_size();
        Ok(page)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn close_button(&self) -> &Element {
        &self.close
    }

    pub fn trigger_element(&self, id: TriggerId) -> Option<&HtmlElement> {
        self.triggers.get(id.0)
    }

    /// Logical resolution, independent of CSS size
    pub fn apply_canvas_size(&self) {
        self.canvas.set_width(CANVAS_WIDTH as u32);
        self.canvas.set_height(CANVAS_HEIGHT as u32);
    }

    /// Read every trigger element in document order
    ///
    /// A selector list matches each element once, so an element with both
    /// the class and the attribute yields a single binding.
    pub fn scan_triggers(&mut self) -> Result<Vec<TriggerBinding>> {
        let nodes = self.document.query_selector_all(SCAN_SELECTOR)?;
        self.triggers.clear();
        let mut bindings = Vec::new();

        for i in 0..nodes.length() {
            let Some(el) = nodes
                .get(i)
                .and_then(|n| n.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            let binding = TriggerBinding {
                id: TriggerId(self.triggers.len()),
                kind: GameKind::from_attr(el.get_attribute("data-game-type").as_deref()),
                href: el.get_attribute("href"),
                is_link: el.tag_name().eq_ignore_ascii_case("a"),
                in_locked_section: el.closest(SECTION_SELECTOR).ok().flatten().is_some(),
                gated: el.class_list().contains(TRIGGER_CLASS),
            };
            bindings.push(binding);
            self.triggers.push(el);
        }
        let gated = bindings.iter().filter(|b| b.gated).count();
        log::info!(
            "Found {} locked triggers ({} restore-only)",
            gated,
            bindings.len() - gated
        );
        Ok(bindings)
    }

    fn reveal(&self, section: &Element) {
        if let Some(overlay) = section
            .query_selector(OVERLAY_SELECTOR)
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            set_style(&overlay, "display", "none");
        }

        let content = section
            .query_selector(&format!(".{}", HIDDEN_CLASS))
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        if let Some(content) = content {
            let _ = content.class_list().remove_1(HIDDEN_CLASS);
            set_style(&content, "display", "block");
            set_style(&content, "opacity", "1");
            set_style(&content, "pointer-events", "auto");
            set_style(&content, "filter", "none");
        }
    }
}

impl Page for DomPage {
    fn show_modal(&mut self) {
        set_style(&self.modal, "display", "flex");
    }

    fn hide_modal(&mut self) {
        set_style(&self.modal, "display", "none");
    }

    fn set_hud(&mut self, hud: &Hud) {
        self.title.set_text_content(Some(hud.title));
        match hud.accent {
            Some(color) => set_style(&self.title, "color", color),
            None => {
                let _ = self.title.style().remove_property("color");
            }
        }
        self.instruction.set_text_content(Some(hud.instruction));
        self.status.set_text_content(Some(&hud.status));
    }

    fn mark_unlocked(&mut self, trigger: TriggerId) {
        if let Some(el) = self.trigger_element(trigger) {
            let _ = el.class_list().add_1(UNLOCKED_CLASS);
        }
    }

    fn release_link(&mut self, trigger: TriggerId) {
        if let Some(el) = self.trigger_element(trigger) {
            let _ = el.class_list().remove_1(TRIGGER_CLASS);
        }
    }

    fn reveal_section(&mut self, trigger: TriggerId, hide_trigger: bool) {
        let Some(el) = self.trigger_element(trigger) else {
            return;
        };
        let Some(section) = el.closest(SECTION_SELECTOR).ok().flatten() else {
            log::warn!("Trigger {:?} is not inside a locked section", trigger);
            return;
        };
        self.reveal(&section);
        if hide_trigger {
            set_style(el, "display", "none");
        }
    }

    fn show_toast(&mut self, message: &str, duration_ms: u32) {
        let Some(body) = self.document.body() else {
            return;
        };
        let toast = match self.document.create_element("div") {
            Ok(toast) => toast,
            Err(e) => {
                log::warn!("Toast creation failed: {:?}", e);
                return;
            }
        };
        toast.set_class_name(TOAST_CLASS);
        toast.set_text_content(Some(message));
        if body.append_child(&toast).is_err() {
            return;
        }

        let remove = Closure::once_into_js(move || toast.remove());
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                remove.unchecked_ref(),
                duration_ms as i32,
            );
    }

    fn navigate_after(&mut self, url: &str, delay_ms: u32) {
        let window = self.window.clone();
        let url = url.to_string();
        let go = Closure::once_into_js(move || {
            if let Err(e) = window.location().set_href(&url) {
                log::warn!("Navigation to {} failed: {:?}", url, e);
            }
        });
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                go.unchecked_ref(),
                delay_ms as i32,
            );
    }
}
