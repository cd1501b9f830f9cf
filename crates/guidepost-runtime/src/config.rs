#![forbid(unsafe_code)]

//! Engine configuration.

use core::time::Duration;

use guidepost_core::document::ScrollOptions;
use guidepost_core::geometry::Size;
use guidepost_core::step::DEFAULT_HIGHLIGHT_PADDING;
use serde::Deserialize;

/// Tour engine configuration.
///
/// Deserializable so hosts can pass overrides as JSON; missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Assumed tooltip footprint (default: 320×200).
    pub tooltip_size: Size,
    /// Gap between target and tooltip, and minimum gap to the viewport edge
    /// (default: 16).
    pub spacing: f64,
    /// Highlight padding for steps that do not set one (default: 8).
    pub default_padding: f64,
    /// Delay before re-measuring a freshly shown step (default: 100 ms).
    pub settle_delay_ms: u64,
    /// Quiet period after the last resize event (default: 100 ms).
    pub resize_debounce_ms: u64,
    /// Upper bound on resize coalescing during a continuous drag
    /// (default: 500 ms).
    pub resize_max_wait_ms: u64,
    /// How targets are scrolled into view; `None` disables scrolling.
    pub scroll: Option<ScrollOptions>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tooltip_size: Size::new(320.0, 200.0),
            spacing: 16.0,
            default_padding: DEFAULT_HIGHLIGHT_PADDING,
            settle_delay_ms: 100,
            resize_debounce_ms: 100,
            resize_max_wait_ms: 500,
            scroll: Some(ScrollOptions::default()),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn tooltip_size(mut self, size: Size) -> Self {
        self.tooltip_size = size;
        self
    }

    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn default_padding(mut self, padding: f64) -> Self {
        self.default_padding = padding;
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    #[must_use]
    pub fn resize_debounce(mut self, quiet: Duration, max_wait: Duration) -> Self {
        self.resize_debounce_ms = quiet.as_millis().min(u64::MAX as u128) as u64;
        self.resize_max_wait_ms = max_wait.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    #[must_use]
    pub fn scroll(mut self, scroll: Option<ScrollOptions>) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn settle_delay_duration(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn resize_quiet_duration(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn resize_max_wait_duration(&self) -> Duration {
        Duration::from_millis(self.resize_max_wait_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidepost_core::document::{ScrollAlign, ScrollBehavior};

    #[test]
    fn defaults_match_original_constants() {
        let c = EngineConfig::default();
        assert_eq!(c.tooltip_size, Size::new(320.0, 200.0));
        assert_eq!(c.spacing, 16.0);
        assert_eq!(c.default_padding, 8.0);
        assert_eq!(c.settle_delay_duration(), Duration::from_millis(100));
        let scroll = c.scroll.unwrap();
        assert_eq!(scroll.behavior, ScrollBehavior::Smooth);
        assert_eq!(scroll.block, ScrollAlign::Center);
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let c = EngineConfig::from_json(
            r#"{"spacing": 24, "tooltip_size": {"width": 280, "height": 160}, "scroll": null}"#,
        )
        .unwrap();
        assert_eq!(c.spacing, 24.0);
        assert_eq!(c.tooltip_size, Size::new(280.0, 160.0));
        assert_eq!(c.scroll, None);
        assert_eq!(c.settle_delay_ms, 100);
    }

    #[test]
    fn json_rejects_wrong_types() {
        assert!(EngineConfig::from_json(r#"{"spacing": "wide"}"#).is_err());
    }

    #[test]
    fn builder_chaining() {
        let c = EngineConfig::default()
            .spacing(8.0)
            .default_padding(4.0)
            .settle_delay(Duration::from_millis(300))
            .resize_debounce(Duration::from_millis(50), Duration::from_millis(250))
            .scroll(None);
        assert_eq!(c.spacing, 8.0);
        assert_eq!(c.default_padding, 4.0);
        assert_eq!(c.settle_delay_ms, 300);
        assert_eq!(c.resize_debounce_ms, 50);
        assert_eq!(c.resize_max_wait_ms, 250);
        assert!(c.scroll.is_none());
    }
}
