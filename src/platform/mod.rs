//! Platform bindings
//!
//! Only the browser is supported; native builds use the platform-free core
//! directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;
