#![forbid(unsafe_code)]

//! Target-independent host state.
//!
//! [`TourHost`] bundles the engine and the help menu and exposes exactly the
//! operations the browser binding forwards. It compiles on every target so
//! the binding logic is tested natively against a
//! [`MemoryDocument`](guidepost_core::MemoryDocument).

use core::time::Duration;

use guidepost_catalog::menu::{MenuView, TourMenu};
use guidepost_catalog::presets::{PresetId, UnknownPreset};
use guidepost_core::document::Document;
use guidepost_runtime::engine::{TourEngine, TourEvent, TourOverlay};
use guidepost_runtime::timing::earliest;
use guidepost_runtime::{CompletionStore, EngineConfig, KeyValueStore};
use serde::Serialize;

/// Everything a renderer needs for one frame.
#[derive(Debug, Serialize)]
pub struct HostView<'a> {
    pub tour: Option<TourOverlay<'a>>,
    pub menu: MenuView<'a>,
    pub completed: bool,
}

pub struct TourHost<D> {
    engine: TourEngine<D>,
    menu: TourMenu,
}

impl<D: Document> TourHost<D> {
    /// Build a host. The first-visit hint depends on the completion flag: it
    /// is shown for [`HINT_TIMEOUT`](guidepost_catalog::menu::HINT_TIMEOUT)
    /// only when no tour has been finished or skipped yet.
    pub fn new(
        document: D,
        storage: impl KeyValueStore + 'static,
        config: EngineConfig,
        now: Duration,
    ) -> Self {
        let completion = CompletionStore::new(storage);
        let menu = if completion.has_completed_tour() {
            TourMenu::without_hint()
        } else {
            TourMenu::new(now)
        };
        Self {
            engine: TourEngine::new(document, completion, config),
            menu,
        }
    }

    pub fn engine(&self) -> &TourEngine<D> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TourEngine<D> {
        &mut self.engine
    }

    pub fn menu(&self) -> &TourMenu {
        &self.menu
    }

    /// Start the preset named `preset` (`complete`, `chat`, `workspace`,
    /// `welcome`).
    pub fn start(&mut self, preset: &str, now: Duration) -> Result<Option<TourEvent>, UnknownPreset> {
        let preset: PresetId = preset.parse()?;
        Ok(self.menu.select(preset, &mut self.engine, now))
    }

    pub fn next(&mut self, now: Duration) -> Option<TourEvent> {
        let event = self.engine.advance(now);
        self.observe(event.as_ref());
        event
    }

    pub fn previous(&mut self, now: Duration) -> Option<TourEvent> {
        self.engine.retreat(now)
    }

    pub fn skip(&mut self) -> Option<TourEvent> {
        let event = self.engine.skip();
        self.observe(event.as_ref());
        event
    }

    fn observe(&mut self, event: Option<&TourEvent>) {
        if let Some(event) = event {
            self.menu.handle_event(event);
        }
    }

    pub fn reset_completion(&mut self) {
        self.engine.reset_completion();
    }

    pub fn has_completed_tour(&self) -> bool {
        self.engine.has_completed_tour()
    }

    pub fn toggle_menu(&mut self) {
        self.menu.toggle();
    }

    pub fn close_menu(&mut self) {
        self.menu.close();
    }

    pub fn dismiss_hint(&mut self) {
        self.menu.dismiss_hint();
    }

    pub fn notify_resize(&mut self, now: Duration) {
        self.engine.notify_resize(now);
    }

    /// Fire due timers. Returns `true` when the view changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let moved = self.engine.tick(now);
        let hint_hidden = self.menu.tick(now);
        moved || hint_hidden
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        earliest(self.engine.next_deadline(), self.menu.next_deadline())
    }

    pub fn view(&self) -> HostView<'_> {
        HostView {
            tour: self.engine.overlay(),
            menu: self.menu.view(),
            completed: self.engine.has_completed_tour(),
        }
    }

    pub fn view_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.view())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use guidepost_core::document::MemoryDocument;
    use guidepost_core::geometry::{Rect, Size};
    use guidepost_runtime::{MemoryStorage, TOUR_COMPLETED_KEY};
    use pretty_assertions::assert_eq;

    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn page() -> MemoryDocument {
        let mut doc = MemoryDocument::new(Size::new(1280.0, 800.0));
        doc.insert(".custom-chat-header", Rect::new(0.0, 0.0, 1280.0, 56.0))
            .insert(".custom-chat-messages", Rect::new(0.0, 56.0, 1280.0, 600.0));
        doc
    }

    fn host(storage: Arc<MemoryStorage>) -> TourHost<MemoryDocument> {
        TourHost::new(page(), storage, EngineConfig::default(), ms(0))
    }

    #[test]
    fn first_visit_shows_hint_returning_user_does_not() {
        let fresh = host(Arc::new(MemoryStorage::new()));
        assert!(fresh.menu().is_hint_visible());

        let seen = Arc::new(MemoryStorage::with_entries([(TOUR_COMPLETED_KEY, "true")]));
        let returning = host(seen);
        assert!(!returning.menu().is_hint_visible());
        assert!(returning.has_completed_tour());
    }

    #[test]
    fn start_rejects_unknown_preset() {
        let mut h = host(Arc::new(MemoryStorage::new()));
        assert!(h.start("tutorial", ms(0)).is_err());
        assert!(!h.engine().is_active());
    }

    #[test]
    fn start_next_previous_skip() {
        let mut h = host(Arc::new(MemoryStorage::new()));
        h.toggle_menu();
        assert!(matches!(h.start("chat", ms(0)), Ok(Some(TourEvent::Started { .. }))));
        assert!(!h.menu().is_open());
        assert!(h.next(ms(1)).is_some());
        assert_eq!(h.engine().step_index(), 1);
        assert!(h.previous(ms(2)).is_some());
        assert!(h.previous(ms(3)).is_none());
        assert!(matches!(h.skip(), Some(TourEvent::Skipped { at: 0, .. })));
        assert!(h.has_completed_tour());
        assert_eq!(h.menu().running(), None);
    }

    #[test]
    fn reset_completion_clears_storage() {
        let storage = Arc::new(MemoryStorage::with_entries([(TOUR_COMPLETED_KEY, "true")]));
        let mut h = host(Arc::clone(&storage));
        h.reset_completion();
        assert!(!h.has_completed_tour());
        assert!(storage.is_empty());
    }

    #[test]
    fn deadline_covers_hint_and_settle() {
        let mut h = host(Arc::new(MemoryStorage::new()));
        assert_eq!(h.next_deadline(), Some(ms(8000)));
        h.start("chat", ms(10)).unwrap();
        assert_eq!(h.next_deadline(), Some(ms(110)));
        assert!(h.tick(ms(110)));
        assert_eq!(h.next_deadline(), Some(ms(8000)));
        assert!(h.tick(ms(8000)));
        assert!(!h.menu().is_hint_visible());
    }

    #[test]
    fn view_json_carries_tour_and_menu() {
        let mut h = host(Arc::new(MemoryStorage::new()));
        h.start("chat", ms(0)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&h.view_json().unwrap()).unwrap();
        assert_eq!(json["tour"]["title"], "Chat Header");
        assert_eq!(json["tour"]["label"], "Step 1 of 4");
        assert_eq!(json["tour"]["placement"], "bottom");
        assert_eq!(json["tour"]["tooltip"]["y"], 72.0);
        assert_eq!(json["menu"]["open"], false);
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn view_json_without_tour_has_null_overlay() {
        let h = host(Arc::new(MemoryStorage::new()));
        let json: serde_json::Value = serde_json::from_str(&h.view_json().unwrap()).unwrap();
        assert!(json["tour"].is_null());
        assert_eq!(json["menu"]["entries"].as_array().map(Vec::len), Some(3));
    }
}
