use web_sys::Storage;

use super::SessionStore;
use crate::error::{GateError, Result};

/// `window.sessionStorage`
///
/// Storage failures (quota, privacy mode) are logged and treated as a
/// missing value; a failed write only means the unlock won't survive reload.
pub struct BrowserSessionStore {
    storage: Storage,
}

impl BrowserSessionStore {
    pub fn open() -> Result<Self> {
        let window = web_sys::window().ok_or(GateError::NoWindow)?;
        let storage = window
            .session_storage()?
            .ok_or(GateError::StorageUnavailable)?;
        Ok(Self { storage })
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            log::warn!("sessionStorage write of {} failed: {:?}", key, e);
        }
    }
}
