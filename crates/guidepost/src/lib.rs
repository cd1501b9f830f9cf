#![forbid(unsafe_code)]

//! Guidepost public facade crate.
//!
//! Re-exports the step model, the tour engine and the built-in presets, and
//! offers a prelude for hosts that embed a tour.
//!
//! ```
//! use guidepost::prelude::*;
//! use std::time::Duration;
//!
//! let mut page = MemoryDocument::new(Size::new(1280.0, 800.0));
//! page.insert("#save", Rect::new(600.0, 20.0, 80.0, 32.0));
//!
//! let tour = Sequence::new(
//!     "intro",
//!     vec![Step::new("#save", "Save", "Saves your work.").placement(Placement::Bottom)],
//! );
//! let mut engine = TourEngine::new(
//!     page,
//!     CompletionStore::new(MemoryStorage::new()),
//!     EngineConfig::default(),
//! );
//! engine.activate(tour, Duration::ZERO);
//! assert_eq!(engine.step_label().as_deref(), Some("Step 1 of 1"));
//! engine.advance(Duration::from_millis(500));
//! assert!(engine.has_completed_tour());
//! ```

use std::fmt;

#[cfg(feature = "tracing-json")]
pub mod logging;

// --- Core re-exports -------------------------------------------------------

pub use guidepost_core::{
    Document, HookContext, HookError, MemoryDocument, Placement, Point, Rect, ScrollOptions,
    Sequence, Size, Step, StepHooks, TargetSelector,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use guidepost_runtime::FileStorage;
pub use guidepost_runtime::{
    CompletionStore, EngineConfig, KeyValueStore, MemoryStorage, StorageError, TOUR_COMPLETED_KEY,
    TourAdvanceReason, TourEngine, TourEvent, TourGeometry, TourObserver, TourOverlay,
};

// --- Catalog re-exports ----------------------------------------------------

#[cfg(feature = "catalog")]
pub use guidepost_catalog::{PresetId, TourMenu, UnknownPreset};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Guidepost hosts.
#[derive(Debug)]
pub enum Error {
    /// Completion flag could not be read or written.
    Storage(StorageError),
    /// A step hook failed.
    Hook(HookError),
    /// Engine configuration did not parse.
    Config(serde_json::Error),
    /// No preset with this name.
    Preset(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Hook(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Preset(name) => write!(f, "unknown tour preset: {name:?}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Hook(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Preset(_) => None,
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<HookError> for Error {
    fn from(err: HookError) -> Self {
        Self::Hook(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "catalog")]
impl From<UnknownPreset> for Error {
    fn from(err: UnknownPreset) -> Self {
        Self::Preset(err.0)
    }
}

/// Standard result type for Guidepost APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse an [`EngineConfig`] override, mapping failures into [`Error`].
pub fn config_from_json(json: &str) -> Result<EngineConfig> {
    Ok(EngineConfig::from_json(json)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CompletionStore, Document, EngineConfig, Error, KeyValueStore, MemoryDocument,
        MemoryStorage, Placement, Rect, Result, Sequence, Size, Step, StepHooks, TourEngine,
        TourEvent,
    };

    #[cfg(feature = "catalog")]
    pub use crate::{PresetId, TourMenu};

    pub use crate::{core, runtime};
    #[cfg(feature = "catalog")]
    pub use crate::catalog;
}

#[cfg(feature = "catalog")]
pub use guidepost_catalog as catalog;
pub use guidepost_core as core;
pub use guidepost_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert() {
        let err = config_from_json("{\"spacing\": []}").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("invalid configuration"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn storage_and_hook_errors_convert() {
        let err: Error = StorageError::Unavailable("quota".into()).into();
        assert_eq!(err.to_string(), "storage unavailable: quota");
        let err: Error = HookError::MissingElement(".x".into()).into();
        assert_eq!(err.to_string(), "element not found: .x");
    }

    #[cfg(feature = "catalog")]
    #[test]
    fn unknown_preset_converts() {
        let parsed: Result<PresetId> = "tutorial".parse::<PresetId>().map_err(Error::from);
        let err = parsed.unwrap_err();
        assert_eq!(err.to_string(), "unknown tour preset: \"tutorial\"");
    }
}
