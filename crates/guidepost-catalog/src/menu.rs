#![forbid(unsafe_code)]

//! Help button, preset menu and first-visit hint.
//!
//! `TourMenu` is pure view state. It never renders; hosts read
//! [`TourMenu::view`] and forward clicks to the methods below. The only link to
//! the engine is [`TourMenu::select`], which starts a preset, and
//! [`TourMenu::handle_event`], which observes the tour ending.
//!
//! # Invariants
//!
//! - The hint is never visible while the menu is open.
//! - Once hidden, the hint stays hidden for the lifetime of the menu.
//! - Selecting a preset always closes the menu.

use core::time::Duration;

use guidepost_core::document::Document;
use guidepost_runtime::engine::{TourEngine, TourEvent};
use serde::Serialize;

use crate::presets::{PresetId, PresetMeta, menu_presets};

/// How long the first-visit hint stays up without interaction.
pub const HINT_TIMEOUT: Duration = Duration::from_secs(8);

pub const BUTTON_TITLE: &str = "Help & Tours";
pub const MENU_HEADING: &str = "Guided Tours";
pub const HINT_TEXT: &str = "👋 Click here for a guided tour!";

/// One selectable row in the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub preset: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub featured: bool,
}

impl From<&PresetMeta> for MenuEntry {
    fn from(meta: &PresetMeta) -> Self {
        Self {
            preset: meta.id.as_str(),
            icon: meta.icon,
            title: meta.title,
            description: meta.description,
            featured: meta.featured,
        }
    }
}

/// Snapshot for rendering the trigger, hint and menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView<'a> {
    pub button_title: &'static str,
    pub heading: &'static str,
    pub open: bool,
    pub hint: Option<&'static str>,
    pub entries: &'a [MenuEntry],
    pub running: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct TourMenu {
    open: bool,
    hint_visible: bool,
    hint_deadline: Option<Duration>,
    running: Option<PresetId>,
    entries: Vec<MenuEntry>,
}

impl TourMenu {
    /// Menu closed, hint visible until `now + HINT_TIMEOUT`.
    pub fn new(now: Duration) -> Self {
        Self {
            open: false,
            hint_visible: true,
            hint_deadline: Some(now.saturating_add(HINT_TIMEOUT)),
            running: None,
            entries: menu_presets().map(MenuEntry::from).collect(),
        }
    }

    /// Menu closed with no hint, e.g. for users who already took the tour.
    pub fn without_hint() -> Self {
        Self {
            open: false,
            hint_visible: false,
            hint_deadline: None,
            running: None,
            entries: menu_presets().map(MenuEntry::from).collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_hint_visible(&self) -> bool {
        self.hint_visible && !self.open
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Preset whose tour is currently running, if one was started from here.
    pub fn running(&self) -> Option<PresetId> {
        self.running
    }

    /// Help button pressed.
    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.dismiss_hint();
    }

    /// Close button or backdrop pressed.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn dismiss_hint(&mut self) {
        self.hint_visible = false;
        self.hint_deadline = None;
    }

    /// Returns `true` when the hint timed out on this call.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.hint_deadline {
            Some(due) if now >= due => {
                self.dismiss_hint();
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.hint_deadline
    }

    /// Close the menu and start `preset` on `engine`.
    pub fn select<D: Document>(
        &mut self,
        preset: PresetId,
        engine: &mut TourEngine<D>,
        now: Duration,
    ) -> Option<TourEvent> {
        self.open = false;
        let event = engine.activate(preset.sequence(), now);
        self.running = event.is_some().then_some(preset);
        tracing::debug!(preset = preset.as_str(), started = self.running.is_some(), "tour selected from menu");
        event
    }

    /// Observe an engine event. Clears the running preset when the tour ends.
    pub fn handle_event(&mut self, event: &TourEvent) {
        match event {
            TourEvent::Finished { .. } | TourEvent::Skipped { .. } => {
                self.running = None;
            }
            TourEvent::Started { .. } | TourEvent::StepChanged { .. } => {}
        }
    }

    pub fn view(&self) -> MenuView<'_> {
        MenuView {
            button_title: BUTTON_TITLE,
            heading: MENU_HEADING,
            open: self.open,
            hint: self.is_hint_visible().then_some(HINT_TEXT),
            entries: &self.entries,
            running: self.running.map(PresetId::as_str),
        }
    }
}
