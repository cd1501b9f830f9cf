#![forbid(unsafe_code)]

//! Guidepost catalog.
//!
//! The tours shipped with the chat application and the help menu that
//! launches them.
//!
//! - [`presets`] - step sequences, the preset registry and the hooks that open
//!   panels or focus inputs before a step is measured
//! - [`menu`] - help button, preset menu and first-visit hint state

pub mod menu;
pub mod presets;

pub use menu::{HINT_TIMEOUT, MenuEntry, MenuView, TourMenu};
pub use presets::{
    FocusHook, OpenPanelHook, PRESET_REGISTRY, PresetId, PresetMeta, RevealHook, UnknownPreset,
    chat_tour, complete_tour, menu_presets, welcome_tour, workspace_tour,
};
