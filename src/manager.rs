//! Orchestrator: triggers, the shared modal, and the unlock protocol
//!
//! `GameManager` holds no browser types. Everything it does to the page goes
//! through the `Page` trait, and unlock flags go through an `UnlockRegistry`.
//! The platform layer feeds it trigger clicks, input events and animation
//! frames.

use std::cell::Cell;
use std::rc::Rc;

use crate::driver::{Flow, FrameClock, run_frame};
use crate::persistence::{SessionStore, UnlockRegistry};
use crate::renderer::Painter;
use crate::settings::Tuning;
use crate::sim::{GameKind, Hud, InputEvent, InputSource, MiniGame, create_game};

/// Index of a trigger element in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub usize);

/// What the page tells us about one trigger element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerBinding {
    pub id: TriggerId,
    pub kind: GameKind,
    /// Raw `href`, if any
    pub href: Option<String>,
    /// Anchor element (navigates on its own once unlocked)
    pub is_link: bool,
    /// Inside a `.locked-section` whose content is revealed on unlock
    pub in_locked_section: bool,
    /// Carries the trigger class and launches a game when clicked. Other
    /// elements naming a game type only take part in restore.
    pub gated: bool,
}

impl TriggerBinding {
    /// URL to visit after a win; in-page anchors don't count
    pub fn navigation_target(&self) -> Option<&str> {
        self.href
            .as_deref()
            .filter(|href| !href.is_empty() && !href.starts_with('#'))
    }
}

/// Result of setting up a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSetup {
    /// Attach a click handler that routes through `on_trigger_activated`
    Launch,
    /// Ungated element or already unlocked link: no handler, default
    /// behavior proceeds
    PassThrough,
}

/// DOM collaborator
pub trait Page {
    fn show_modal(&mut self);

    fn hide_modal(&mut self);

    fn set_hud(&mut self, hud: &Hud);

    /// Style the trigger as unlocked
    fn mark_unlocked(&mut self, trigger: TriggerId);

    /// Drop the locked styling from a link trigger
    fn release_link(&mut self, trigger: TriggerId);

    /// Show the hidden content of the trigger's locked section
    fn reveal_section(&mut self, trigger: TriggerId, hide_trigger: bool);

    fn show_toast(&mut self, message: &str, duration_ms: u32);

    fn navigate_after(&mut self, url: &str, delay_ms: u32);
}

/// Builds the simulation for a launch
pub type GameFactory = fn(GameKind, &Tuning, u64) -> Box<dyn MiniGame>;

struct ActiveGame {
    game: Box<dyn MiniGame>,
    trigger: TriggerId,
    clock: FrameClock,
    /// Set by the completion callback, consumed after each update
    won: Rc<Cell<bool>>,
}

pub struct GameManager<S, P> {
    registry: UnlockRegistry<S>,
    page: P,
    tuning: Tuning,
    factory: GameFactory,
    triggers: Vec<TriggerBinding>,
    current: Option<ActiveGame>,
    last_hud: Option<Hud>,
    seed: u64,
}

impl<S: SessionStore, P: Page> GameManager<S, P> {
    pub fn new(store: S, page: P, tuning: Tuning, seed: u64) -> Self {
        Self {
            registry: UnlockRegistry::new(store),
            page,
            tuning,
            factory: create_game,
            triggers: Vec::new(),
            current: None,
            last_hud: None,
            seed,
        }
    }

    /// Swap the simulation constructor
    pub fn with_factory(mut self, factory: GameFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn registry(&self) -> &UnlockRegistry<S> {
        &self.registry
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&TriggerBinding> {
        self.triggers.iter().find(|t| t.id == id)
    }

    /// Kind of the running game, if any
    pub fn current_kind(&self) -> Option<GameKind> {
        self.current.as_ref().map(|a| a.game.kind())
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|a| a.game.is_active())
    }

    /// Input sources the platform should currently listen to
    pub fn active_bindings(&self) -> &'static [InputSource] {
        match &self.current {
            Some(active) if active.game.is_active() => active.game.bindings(),
            _ => &[],
        }
    }

    /// Register a trigger; unlocked links are released and get no handler
    pub fn setup_trigger(&mut self, binding: TriggerBinding) -> TriggerSetup {
        let setup = if !binding.gated {
            TriggerSetup::PassThrough
        } else if binding.is_link && self.registry.is_unlocked(binding.kind) {
            self.page.release_link(binding.id);
            TriggerSetup::PassThrough
        } else {
            TriggerSetup::Launch
        };
        self.triggers.retain(|t| t.id != binding.id);
        self.triggers.push(binding);
        setup
    }

    /// Re-apply unlocks earned earlier in this browsing session
    pub fn restore_progress(&mut self) {
        let unlocked = self.registry.unlocked_kinds();
        if unlocked.is_empty() {
            return;
        }
        for trigger in self.triggers.iter().filter(|t| unlocked.contains(&t.kind)) {
            if trigger.is_link {
                self.page.release_link(trigger.id);
            } else if trigger.in_locked_section {
                self.page.reveal_section(trigger.id, true);
            }
        }
        let names: Vec<&str> = unlocked.iter().map(|k| k.as_str()).collect();
        log::info!("Restored unlocks: {}", names.join(", "));
    }

    /// A trigger was clicked
    ///
    /// Returns `true` when a game was launched and the default action should
    /// be prevented. The unlock flag is checked at click time, so a trigger
    /// unlocked after setup falls through to its normal behavior.
    pub fn on_trigger_activated(&mut self, id: TriggerId) -> bool {
        let Some(trigger) = self.trigger(id) else {
            log::warn!("Click on unregistered trigger {:?}", id);
            return false;
        };
        if !trigger.gated {
            return false;
        }
        let kind = trigger.kind;
        if self.registry.is_unlocked(kind) {
            log::debug!("{} already unlocked, letting click through", kind.as_str());
            return false;
        }
        self.launch(id);
        true
    }

    /// Stop whatever runs, then start the trigger's game in the modal
    pub fn launch(&mut self, id: TriggerId) {
        let Some(kind) = self.trigger(id).map(|t| t.kind) else {
            log::warn!("Launch for unregistered trigger {:?}", id);
            return;
        };
        self.stop_current();

        self.seed = self.seed.wrapping_add(1);
        let mut game = (self.factory)(kind, &self.tuning, self.seed);
        let won = Rc::new(Cell::new(false));
        let flag = won.clone();

        self.page.show_modal();
        game.start(Box::new(move || flag.set(true)));
        self.current = Some(ActiveGame {
            game,
            trigger: id,
            clock: FrameClock::new(),
            won,
        });
        self.last_hud = None;
        self.sync_hud();
        log::info!("Launched {} game", kind.as_str());
    }

    /// Close button: stop without unlocking
    pub fn abort(&mut self) {
        if self.stop_current() {
            log::info!("Game aborted");
        }
        self.page.hide_modal();
    }

    /// One animation frame
    pub fn frame(&mut self, painter: &mut dyn Painter, timestamp_ms: f64) -> Flow {
        let Some(active) = self.current.as_mut() else {
            return Flow::Halt;
        };
        let flow = run_frame(
            active.game.as_mut(),
            painter,
            &mut active.clock,
            timestamp_ms,
        );
        if self.settle() {
            return Flow::Halt;
        }
        self.sync_hud();
        flow
    }

    /// Forward a normalized input event to the running game
    pub fn dispatch_input(&mut self, event: InputEvent) {
        let Some(active) = self.current.as_mut() else {
            log::debug!("Input with no game running: {:?}", event);
            return;
        };
        active.game.handle_input(event);
        if !self.settle() {
            self.sync_hud();
        }
    }

    /// Run the unlock protocol if the game just won
    fn settle(&mut self) -> bool {
        let won = self.current.as_ref().is_some_and(|a| a.won.get());
        if !won {
            return false;
        }
        if let Some(active) = self.current.take() {
            self.complete(active.trigger);
        }
        true
    }

    fn complete(&mut self, id: TriggerId) {
        let Some(trigger) = self.trigger(id).cloned() else {
            return;
        };
        self.page.hide_modal();
        self.page.mark_unlocked(id);
        self.registry.mark_unlocked(trigger.kind);

        let gate = &self.tuning.gate;
        self.page.show_toast(&gate.toast_message, gate.toast_duration_ms);

        if let Some(url) = trigger.navigation_target() {
            log::info!("Navigating to {} in {}ms", url, gate.navigate_delay_ms);
            self.page.navigate_after(url, gate.navigate_delay_ms);
        } else if trigger.in_locked_section {
            self.page.reveal_section(id, false);
        }
        self.last_hud = None;
    }

    fn stop_current(&mut self) -> bool {
        match self.current.take() {
            Some(mut active) => {
                active.game.stop();
                true
            }
            None => false,
        }
    }

    fn sync_hud(&mut self) {
        let Some(active) = &self.current else {
            return;
        };
        let hud = active.game.hud();
        if self.last_hud.as_ref() != Some(&hud) {
            self.page.set_hud(&hud);
            self.last_hud = Some(hud);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::renderer::CommandBuffer;
    use crate::sim::{GameSession, OnComplete};
    use glam::Vec2;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        ShowModal,
        HideModal,
        Hud(String),
        MarkUnlocked(TriggerId),
        ReleaseLink(TriggerId),
        Reveal(TriggerId, bool),
        Toast(String, u32),
        Navigate(String, u32),
    }

    #[derive(Default)]
    struct FakePage {
        calls: Vec<Call>,
    }

    impl Page for FakePage {
        fn show_modal(&mut self) {
            self.calls.push(Call::ShowModal);
        }
        fn hide_modal(&mut self) {
            self.calls.push(Call::HideModal);
        }
        fn set_hud(&mut self, hud: &Hud) {
            self.calls.push(Call::Hud(hud.status.clone()));
        }
        fn mark_unlocked(&mut self, trigger: TriggerId) {
            self.calls.push(Call::MarkUnlocked(trigger));
        }
        fn release_link(&mut self, trigger: TriggerId) {
            self.calls.push(Call::ReleaseLink(trigger));
        }
        fn reveal_section(&mut self, trigger: TriggerId, hide_trigger: bool) {
            self.calls.push(Call::Reveal(trigger, hide_trigger));
        }
        fn show_toast(&mut self, message: &str, duration_ms: u32) {
            self.calls.push(Call::Toast(message.to_string(), duration_ms));
        }
        fn navigate_after(&mut self, url: &str, delay_ms: u32) {
            self.calls.push(Call::Navigate(url.to_string(), delay_ms));
        }
    }

    /// Wins on the first pointer-down, counts frames in its status
    struct ClickToWin {
        kind: GameKind,
        frames: u32,
        session: GameSession,
    }

    impl MiniGame for ClickToWin {
        fn kind(&self) -> GameKind {
            self.kind
        }
        fn init(&mut self) {
            self.frames = 0;
        }
        fn start(&mut self, on_complete: OnComplete) {
            self.init();
            self.session.begin(on_complete);
        }
        fn stop(&mut self) {
            self.session.end();
        }
        fn update(&mut self, _dt_ms: f64) {
            if self.session.is_active() {
                self.frames += 1;
            }
        }
        fn draw(&self, painter: &mut dyn Painter) {
            painter.clear("#000000");
        }
        fn handle_input(&mut self, event: InputEvent) {
            if !self.session.is_active() {
                return;
            }
            match event {
                InputEvent::PointerDown(_) => {
                    self.session.win();
                }
                InputEvent::Jump => self.frames = 100,
                _ => {}
            }
        }
        fn is_active(&self) -> bool {
            self.session.is_active()
        }
        fn hud(&self) -> Hud {
            Hud {
                title: "TEST",
                instruction: "",
                status: format!("frames {}", self.frames),
                accent: None,
            }
        }
        fn bindings(&self) -> &'static [InputSource] {
            &[InputSource::MouseDown]
        }
    }

    fn click_to_win(kind: GameKind, _tuning: &Tuning, _seed: u64) -> Box<dyn MiniGame> {
        Box::new(ClickToWin {
            kind,
            frames: 0,
            session: GameSession::new(),
        })
    }

    fn manager(store: MemoryStore) -> GameManager<MemoryStore, FakePage> {
        GameManager::new(store, FakePage::default(), Tuning::default(), 1)
            .with_factory(click_to_win)
    }

    fn link(id: usize, kind: GameKind, href: &str) -> TriggerBinding {
        TriggerBinding {
            id: TriggerId(id),
            kind,
            href: Some(href.to_string()),
            is_link: true,
            in_locked_section: false,
            gated: true,
        }
    }

    fn section_button(id: usize, kind: GameKind) -> TriggerBinding {
        TriggerBinding {
            id: TriggerId(id),
            kind,
            href: None,
            is_link: false,
            in_locked_section: true,
            gated: true,
        }
    }

    fn ungated(binding: TriggerBinding) -> TriggerBinding {
        TriggerBinding {
            gated: false,
            ..binding
        }
    }

    fn click() -> InputEvent {
        InputEvent::PointerDown(Vec2::new(10.0, 10.0))
    }

    #[test]
    fn test_navigation_target_skips_anchors() {
        assert_eq!(link(0, GameKind::Bug, "/blog/a").navigation_target(), Some("/blog/a"));
        assert_eq!(link(0, GameKind::Bug, "#").navigation_target(), None);
        assert_eq!(link(0, GameKind::Bug, "#top").navigation_target(), None);
        assert_eq!(section_button(0, GameKind::Wire).navigation_target(), None);
    }

    #[test]
    fn test_launch_shows_modal_and_hud() {
        let mut mgr = manager(MemoryStore::new());
        assert_eq!(mgr.setup_trigger(link(0, GameKind::Basket, "/p")), TriggerSetup::Launch);

        assert!(mgr.on_trigger_activated(TriggerId(0)));
        assert!(mgr.is_running());
        assert_eq!(mgr.current_kind(), Some(GameKind::Basket));
        assert_eq!(mgr.active_bindings(), &[InputSource::MouseDown]);
        assert_eq!(
            mgr.page().calls,
            vec![Call::ShowModal, Call::Hud("frames 0".into())]
        );
    }

    #[test]
    fn test_win_on_link_persists_and_navigates() {
        let mut mgr = manager(MemoryStore::new());
        mgr.setup_trigger(link(3, GameKind::Bug, "/blog/post"));
        mgr.on_trigger_activated(TriggerId(3));
        mgr.page_mut().calls.clear();

        mgr.dispatch_input(click());

        assert!(!mgr.is_running());
        assert!(mgr.registry().is_unlocked(GameKind::Bug));
        assert_eq!(
            mgr.registry().store().get("unlocked_bug").as_deref(),
            Some("true")
        );
        assert_eq!(
            mgr.page().calls,
            vec![
                Call::HideModal,
                Call::MarkUnlocked(TriggerId(3)),
                Call::Toast("🔓 ACCESS GRANTED".into(), 3000),
                Call::Navigate("/blog/post".into(), 1000),
            ]
        );
        assert!(mgr.active_bindings().is_empty());
    }

    #[test]
    fn test_win_in_section_reveals_content() {
        let mut mgr = manager(MemoryStore::new());
        mgr.setup_trigger(section_button(1, GameKind::Wire));
        mgr.on_trigger_activated(TriggerId(1));
        mgr.dispatch_input(click());

        assert!(mgr.page().calls.contains(&Call::Reveal(TriggerId(1), false)));
        assert!(
            !mgr.page()
                .calls
                .iter()
                .any(|c| matches!(c, Call::Navigate(..)))
        );
    }

    #[test]
    fn test_unlocked_link_gets_no_handler() {
        let mut store = MemoryStore::new();
        store.set("unlocked_mario", "true");
        let mut mgr = manager(store);

        let setup = mgr.setup_trigger(link(0, GameKind::Mario, "/secret"));
        assert_eq!(setup, TriggerSetup::PassThrough);
        assert_eq!(mgr.page().calls, vec![Call::ReleaseLink(TriggerId(0))]);

        // Buttons still route through the manager
        assert_eq!(
            mgr.setup_trigger(section_button(1, GameKind::Mario)),
            TriggerSetup::Launch
        );
    }

    #[test]
    fn test_click_rechecks_unlock_state() {
        let mut mgr = manager(MemoryStore::new());
        mgr.setup_trigger(link(0, GameKind::Wire, "/a"));
        mgr.setup_trigger(link(1, GameKind::Wire, "/b"));

        mgr.on_trigger_activated(TriggerId(0));
        mgr.dispatch_input(click());
        mgr.page_mut().calls.clear();

        // Same kind, set up before the unlock: default action proceeds
        assert!(!mgr.on_trigger_activated(TriggerId(1)));
        assert!(!mgr.is_running());
        assert!(mgr.page().calls.is_empty());
    }

    #[test]
    fn test_restore_progress() {
        let mut store = MemoryStore::new();
        store.set("unlocked_wire", "true");
        let mut mgr = manager(store);
        mgr.setup_trigger(section_button(0, GameKind::Wire));
        mgr.setup_trigger(section_button(1, GameKind::Mario));
        mgr.setup_trigger(link(2, GameKind::Wire, "/x"));
        mgr.page_mut().calls.clear();

        mgr.restore_progress();
        assert_eq!(
            mgr.page().calls,
            vec![Call::Reveal(TriggerId(0), true), Call::ReleaseLink(TriggerId(2))]
        );
    }

    #[test]
    fn test_restore_covers_ungated_elements() {
        let mut store = MemoryStore::new();
        store.set("unlocked_bug", "true");
        let mut mgr = manager(store);

        // Ungated elements never get a click handler, locked or not
        assert_eq!(
            mgr.setup_trigger(ungated(section_button(0, GameKind::Bug))),
            TriggerSetup::PassThrough
        );
        assert_eq!(
            mgr.setup_trigger(ungated(link(1, GameKind::Bug, "/post"))),
            TriggerSetup::PassThrough
        );
        assert_eq!(
            mgr.setup_trigger(ungated(section_button(2, GameKind::Basket))),
            TriggerSetup::PassThrough
        );
        assert!(mgr.page().calls.is_empty());

        mgr.restore_progress();
        assert_eq!(
            mgr.page().calls,
            vec![Call::Reveal(TriggerId(0), true), Call::ReleaseLink(TriggerId(1))]
        );

        mgr.page_mut().calls.clear();
        assert!(!mgr.on_trigger_activated(TriggerId(2)));
        assert!(!mgr.is_running());
        assert!(mgr.page().calls.is_empty());
    }

    #[test]
    fn test_relaunch_stops_previous_game() {
        let mut mgr = manager(MemoryStore::new());
        mgr.setup_trigger(link(0, GameKind::Bug, "/a"));
        mgr.setup_trigger(link(1, GameKind::Basket, "/b"));

        mgr.on_trigger_activated(TriggerId(0));
        mgr.on_trigger_activated(TriggerId(1));
        assert_eq!(mgr.current_kind(), Some(GameKind::Basket));

        mgr.dispatch_input(click());
        assert!(mgr.registry().is_unlocked(GameKind::Basket));
        assert!(!mgr.registry().is_unlocked(GameKind::Bug));
    }

    #[test]
    fn test_abort_never_unlocks() {
        let mut mgr = manager(MemoryStore::new());
        mgr.setup_trigger(section_button(0, GameKind::Bug));
        mgr.on_trigger_activated(TriggerId(0));

        mgr.abort();
        mgr.abort();
        assert!(!mgr.is_running());
        assert_eq!(mgr.current_kind(), None);

        mgr.dispatch_input(click());
        assert!(mgr.registry().unlocked_kinds().is_empty());
        assert!(
            !mgr.page()
                .calls
                .iter()
                .any(|c| matches!(c, Call::MarkUnlocked(_) | Call::Toast(..)))
        );
    }

    #[test]
    fn test_frames_halt_when_idle() {
        let mut mgr = manager(MemoryStore::new());
        let mut buf = CommandBuffer::new();
        assert_eq!(mgr.frame(&mut buf, 0.0), Flow::Halt);

        mgr.setup_trigger(section_button(0, GameKind::Bug));
        mgr.on_trigger_activated(TriggerId(0));
        assert_eq!(mgr.frame(&mut buf, 0.0), Flow::Continue);
        assert_eq!(mgr.frame(&mut buf, 16.0), Flow::Continue);

        mgr.abort();
        assert_eq!(mgr.frame(&mut buf, 32.0), Flow::Halt);
    }

    #[test]
    fn test_hud_written_only_on_change() {
        let mut mgr = manager(MemoryStore::new());
        mgr.setup_trigger(section_button(0, GameKind::Bug));
        mgr.on_trigger_activated(TriggerId(0));
        mgr.page_mut().calls.clear();

        // Status changes every frame for the stub
        let mut buf = CommandBuffer::new();
        mgr.frame(&mut buf, 0.0);
        assert_eq!(mgr.page().calls, vec![Call::Hud("frames 1".into())]);

        mgr.page_mut().calls.clear();
        mgr.dispatch_input(InputEvent::PointerMove(Vec2::ZERO));
        assert!(mgr.page().calls.is_empty());

        mgr.dispatch_input(InputEvent::Jump);
        assert_eq!(mgr.page().calls, vec![Call::Hud("frames 100".into())]);
    }

    #[test]
    fn test_real_bug_game_unlocks_after_five_hits() {
        let mut mgr: GameManager<MemoryStore, FakePage> =
            GameManager::new(MemoryStore::new(), FakePage::default(), Tuning::default(), 9);
        mgr.setup_trigger(link(0, GameKind::Bug, "/post"));
        mgr.on_trigger_activated(TriggerId(0));

        let mut buf = CommandBuffer::new();
        let mut ts = 0.0;
        for _ in 0..500 {
            if !mgr.is_running() {
                break;
            }
            // Aim at whatever bug was drawn last
            buf.clear_commands();
            mgr.frame(&mut buf, ts);
            ts += 16.0;
            let target = buf
                .filled_rects()
                .filter(|(_, color)| *color == crate::renderer::palette::RED)
                .last()
                .map(|(r, _)| Vec2::new(r.x + r.w / 2.0, r.y + r.h / 2.0));
            if let Some(pos) = target {
                mgr.dispatch_input(InputEvent::PointerDown(pos));
            }
        }
        assert!(mgr.registry().is_unlocked(GameKind::Bug));
    }
}
