#![forbid(unsafe_code)]

//! Browser host for Guidepost tours.
//!
//! - [`TourHost`] - engine plus help menu behind the operations the page
//!   calls; compiles on every target
//! - `GuidedTourWeb` - `wasm-bindgen` surface over a `TourHost` bound to the
//!   live DOM, `localStorage`, a `resize` listener and browser timeouts
//! - `WebDocument`, `LocalStorage` - the DOM and storage backends
//! - `init_logging` - routes `tracing` output to the browser console
//!
//! Rendering stays in the page: every state change is pushed to a JS callback
//! as a JSON view of the overlay and menu.

pub mod host;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod local_storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use host::{HostView, TourHost};

#[cfg(target_arch = "wasm32")]
pub use dom::WebDocument;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use wasm::{GuidedTourWeb, init_logging};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct GuidedTourWeb;

#[cfg(not(target_arch = "wasm32"))]
impl GuidedTourWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
