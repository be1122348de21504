//! Game session lifecycle shared by every simulation
//!
//! Idle → Active on `begin`, Active → Idle on `end` (no callback) or `win`
//! (callback, exactly once).

/// Completion callback handed to a simulation on start
pub type OnComplete = Box<dyn FnOnce()>;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Constructed or finished; no ticks, no input
    Idle,
    /// Loop running, input bound
    Active,
}

/// One start→stop/win lifetime of a simulation
pub struct GameSession {
    phase: SessionPhase,
    /// Milliseconds of session time fed through `advance`
    elapsed_ms: f64,
    on_complete: Option<OnComplete>,
    /// Incremented on every `begin`
    generation: u32,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("has_callback", &self.on_complete.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            elapsed_ms: 0.0,
            on_complete: None,
            generation: 0,
        }
    }

    /// Arm the session. A session that is already active is re-armed with the
    /// new callback; the old one is dropped uncalled.
    pub fn begin(&mut self, on_complete: OnComplete) {
        self.phase = SessionPhase::Active;
        self.elapsed_ms = 0.0;
        self.on_complete = Some(on_complete);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Go idle without completing. Returns whether the session was active.
    pub fn end(&mut self) -> bool {
        let was_active = self.is_active();
        self.phase = SessionPhase::Idle;
        self.on_complete = None;
        was_active
    }

    /// Go idle and fire the completion callback. Only the first call in a
    /// session does anything.
    pub fn win(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = SessionPhase::Idle;
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
        true
    }

    /// Accumulate session time
    pub fn advance(&mut self, dt_ms: f64) {
        if self.is_active() {
            self.elapsed_ms += dt_ms.max(0.0);
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}
