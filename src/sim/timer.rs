//! Delayed one-shot actions owned by a session
//!
//! Timers run on session time: they only advance through `update(dt)` and are
//! dropped wholesale when the session stops, so a delayed spawn or win can
//! never fire into a dead game.

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due_ms: f64,
    action: T,
}

/// Pending delayed actions, fired in due order
#[derive(Debug, Clone)]
pub struct Timers<T> {
    now_ms: f64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            pending: Vec::new(),
        }
    }

    /// Run `action` once `delay_ms` of session time has passed
    pub fn schedule(&mut self, delay_ms: f64, action: T) {
        self.pending.push(Scheduled {
            due_ms: self.now_ms + delay_ms.max(0.0),
            action,
        });
    }

    /// Advance the clock and return every action that came due. Actions
    /// sharing a due time keep their scheduling order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<T> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due_ms <= now);
        self.pending = rest;

        due.sort_by(|a, b| {
            a.due_ms
                .partial_cmp(&b.due_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        due.into_iter().map(|s| s.action).collect()
    }

    /// Drop everything and rewind the clock
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.now_ms = 0.0;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Timers::new();
        timers.schedule(200.0, "spawn");

        assert!(timers.advance(100.0).is_empty());
        assert!(timers.advance(99.0).is_empty());
        assert_eq!(timers.advance(1.0), vec!["spawn"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut timers = Timers::new();
        timers.schedule(50.0, 2);
        timers.schedule(10.0, 1);
        timers.schedule(50.0, 3);

        assert_eq!(timers.advance(100.0), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::new();
        timers.schedule(10.0, ());
        timers.cancel_all();
        assert!(timers.advance(1000.0).is_empty());
    }
}
