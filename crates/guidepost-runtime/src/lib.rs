#![forbid(unsafe_code)]

//! Guidepost runtime.
//!
//! Drives a guided tour over a [`Document`](guidepost_core::Document):
//!
//! - [`TourEngine`] - session state, navigation, hooks and geometry
//! - [`compute_geometry`] - highlight and tooltip placement with viewport clamping
//! - [`SettleTimer`] / [`ResizeDebouncer`] - host-driven re-measure timers
//! - [`CompletionStore`] - the persisted "tour seen" flag
//! - [`KeyValueStore`] - storage backends ([`MemoryStorage`], and `FileStorage`
//!   behind the `state-persistence` feature)
//!
//! The runtime never reads a clock. Hosts pass a monotonic `now` into every
//! call that can arm a timer and call [`TourEngine::tick`] when
//! [`TourEngine::next_deadline`] passes.

pub mod completion;
pub mod config;
pub mod engine;
pub mod placement;
pub mod state_persistence;
pub mod timing;

pub use completion::{CompletionStore, TOUR_COMPLETED_KEY};
pub use config::EngineConfig;
pub use engine::{TourAdvanceReason, TourEngine, TourEvent, TourObserver, TourOverlay};
pub use placement::{TourGeometry, anchor_tooltip, compute_geometry};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{KeyValueStore, MemoryStorage, StorageError, StorageResult};
pub use timing::{ResizeDebouncer, SettleTimer};
