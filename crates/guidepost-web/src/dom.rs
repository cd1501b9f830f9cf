#![forbid(unsafe_code)]

//! [`Document`] backed by the live page.

use guidepost_core::document::{Document, ScrollAlign, ScrollBehavior, ScrollOptions};
use guidepost_core::geometry::{Rect, Size};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, ScrollIntoViewOptions, ScrollLogicalPosition, Window};

/// The browser DOM seen through `querySelector`.
///
/// Invalid selectors are treated like selectors that match nothing.
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn query(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(selector, error = ?err, "querySelector rejected selector");
                None
            }
        }
    }

    fn query_html(&self, selector: &str) -> Option<HtmlElement> {
        self.query(selector)?.dyn_into::<HtmlElement>().ok()
    }

    fn dimension(value: Result<JsValue, JsValue>) -> f64 {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

impl Document for WebDocument {
    fn viewport(&self) -> Size {
        Size::new(
            Self::dimension(self.window.inner_width()),
            Self::dimension(self.window.inner_height()),
        )
    }

    fn bounding_rect(&self, selector: &str) -> Option<Rect> {
        let rect = self.query(selector)?.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn exists(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    fn has_class(&self, selector: &str, class: &str) -> bool {
        self.query(selector)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn click(&mut self, selector: &str) -> bool {
        match self.query_html(selector) {
            Some(el) => {
                el.click();
                true
            }
            None => false,
        }
    }

    fn focus(&mut self, selector: &str) -> bool {
        self.query_html(selector).is_some_and(|el| el.focus().is_ok())
    }

    fn scroll_into_view(&mut self, selector: &str, options: ScrollOptions) {
        let Some(el) = self.query(selector) else {
            return;
        };
        let opts = ScrollIntoViewOptions::new();
        opts.set_behavior(match options.behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        opts.set_block(match options.block {
            ScrollAlign::Start => ScrollLogicalPosition::Start,
            ScrollAlign::Center => ScrollLogicalPosition::Center,
            ScrollAlign::End => ScrollLogicalPosition::End,
            ScrollAlign::Nearest => ScrollLogicalPosition::Nearest,
        });
        el.scroll_into_view_with_scroll_into_view_options(&opts);
    }
}
