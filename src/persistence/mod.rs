//! Unlock flags scoped to the browser tab session
//!
//! Each game kind has one flag under `unlocked_<kind>`. Flags are only ever
//! set to `"true"`; any other stored value reads as locked.

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserSessionStore;

use std::collections::HashMap;

use crate::sim::GameKind;

const UNLOCKED: &str = "true";

/// String key/value storage with session lifetime
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and native runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Reads and writes per-kind unlock flags
#[derive(Debug, Clone, Default)]
pub struct UnlockRegistry<S> {
    store: S,
}

impl<S: SessionStore> UnlockRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn is_unlocked(&self, kind: GameKind) -> bool {
        self.store.get(&kind.storage_key()).as_deref() == Some(UNLOCKED)
    }

    pub fn mark_unlocked(&mut self, kind: GameKind) {
        self.store.set(&kind.storage_key(), UNLOCKED);
        log::info!("Unlocked {} for this session", kind.as_str());
    }

    /// Kinds already unlocked, in `GameKind::ALL` order
    pub fn unlocked_kinds(&self) -> Vec<GameKind> {
        GameKind::ALL
            .into_iter()
            .filter(|k| self.is_unlocked(*k))
            .collect()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
