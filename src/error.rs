//! Error types for the platform layer.
//!
//! Simulations never fail; only DOM bootstrap, storage access and tuning
//! parsing can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("No global window object")]
    NoWindow,

    #[error("Required element '{0}' is missing")]
    MissingElement(&'static str),

    #[error("Element '{0}' is not a canvas")]
    NotACanvas(&'static str),

    #[error("Canvas 2D context unavailable")]
    ContextUnavailable,

    #[error("Session storage unavailable")]
    StorageUnavailable,

    #[error("Invalid tuning: {0}")]
    Tuning(#[from] serde_json::Error),

    #[error("JavaScript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GateError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GateError::Js(format!("{:?}", value))
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
