#![forbid(unsafe_code)]

//! The page as seen by the tour.
//!
//! [`Document`] is the narrow slice of the DOM the engine and hooks need:
//! measure an element, scroll it into view, and the two interactions hooks
//! perform (click, focus). Everything is addressed by a single CSS selector;
//! multi-candidate targets are resolved with [`resolve_target`].
//!
//! [`MemoryDocument`] is a deterministic in-memory implementation for native
//! builds and tests. Clicking an element can trigger scripted
//! [`ClickEffect`]s, which is enough to model "press the toggle, panel opens".

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};
use crate::step::TargetSelector;

/// How scrolling should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    Instant,
    #[default]
    Smooth,
}

/// Where the element should land along the block axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlign {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

/// Options for [`Document::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollAlign,
}

/// Read access to layout plus the few writes hooks need.
pub trait Document {
    /// Visible viewport size.
    fn viewport(&self) -> Size;

    /// Bounding box of the first element matching `selector`.
    fn bounding_rect(&self, selector: &str) -> Option<Rect>;

    /// Whether any element matches `selector`.
    fn exists(&self, selector: &str) -> bool {
        self.bounding_rect(selector).is_some()
    }

    /// Whether the first element matching `selector` carries `class`.
    /// `false` when nothing matches.
    fn has_class(&self, selector: &str, class: &str) -> bool;

    /// Click the first element matching `selector`. Returns `false` when
    /// nothing matches.
    fn click(&mut self, selector: &str) -> bool;

    /// Focus the first element matching `selector`. Returns `false` when
    /// nothing matches.
    fn focus(&mut self, selector: &str) -> bool;

    /// Ask the host to scroll the element into view.
    fn scroll_into_view(&mut self, selector: &str, options: ScrollOptions);
}

/// A target that resolved to an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    /// The candidate selector that matched.
    pub selector: String,
    pub rect: Rect,
}

/// Try each candidate of `target` in order and return the first match.
pub fn resolve_target(document: &dyn Document, target: &TargetSelector) -> Option<ResolvedTarget> {
    target.candidates().find_map(|candidate| {
        document
            .bounding_rect(candidate)
            .map(|rect| ResolvedTarget {
                selector: candidate.to_owned(),
                rect,
            })
    })
}

/// Scripted consequence of clicking an element in a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClickEffect {
    AddClass { selector: String, class: String },
    RemoveClass { selector: String, class: String },
    Insert { selector: String, rect: Rect },
    Remove { selector: String },
}

#[derive(Debug, Clone, Default)]
struct MemoryElement {
    rect: Rect,
    classes: BTreeSet<String>,
    clicks: u32,
}

/// In-memory [`Document`] keyed by exact selector text.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    viewport: Size,
    elements: HashMap<String, MemoryElement>,
    effects: HashMap<String, Vec<ClickEffect>>,
    focused: Option<String>,
    scrolls: Vec<(String, ScrollOptions)>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Add or replace an element.
    pub fn insert(&mut self, selector: impl Into<String>, rect: Rect) -> &mut Self {
        let selector = selector.into();
        let entry = self.elements.entry(selector).or_default();
        entry.rect = rect;
        self
    }

    /// Add or replace an element carrying `classes`.
    pub fn insert_with_classes<'c>(
        &mut self,
        selector: impl Into<String>,
        rect: Rect,
        classes: impl IntoIterator<Item = &'c str>,
    ) -> &mut Self {
        let selector = selector.into();
        let entry = self.elements.entry(selector).or_default();
        entry.rect = rect;
        entry.classes = classes.into_iter().map(str::to_owned).collect();
        self
    }

    pub fn remove(&mut self, selector: &str) -> bool {
        self.elements.remove(selector).is_some()
    }

    /// Move or resize an existing element. Returns `false` if it is absent.
    pub fn set_rect(&mut self, selector: &str, rect: Rect) -> bool {
        match self.elements.get_mut(selector) {
            Some(element) => {
                element.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Register what happens when `selector` is clicked.
    pub fn on_click(&mut self, selector: impl Into<String>, effect: ClickEffect) -> &mut Self {
        self.effects.entry(selector.into()).or_default().push(effect);
        self
    }

    pub fn clicks(&self, selector: &str) -> u32 {
        self.elements.get(selector).map_or(0, |e| e.clicks)
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Every scroll request received, oldest first.
    pub fn scrolls(&self) -> &[(String, ScrollOptions)] {
        &self.scrolls
    }

    fn apply(&mut self, effect: ClickEffect) {
        match effect {
            ClickEffect::AddClass { selector, class } => {
                if let Some(element) = self.elements.get_mut(&selector) {
                    element.classes.insert(class);
                }
            }
            ClickEffect::RemoveClass { selector, class } => {
                if let Some(element) = self.elements.get_mut(&selector) {
                    element.classes.remove(&class);
                }
            }
            ClickEffect::Insert { selector, rect } => {
                self.insert(selector, rect);
            }
            ClickEffect::Remove { selector } => {
                self.remove(&selector);
            }
        }
    }
}

impl Document for MemoryDocument {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn bounding_rect(&self, selector: &str) -> Option<Rect> {
        self.elements.get(selector).map(|e| e.rect)
    }

    fn has_class(&self, selector: &str, class: &str) -> bool {
        self.elements
            .get(selector)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn click(&mut self, selector: &str) -> bool {
        let Some(element) = self.elements.get_mut(selector) else {
            return false;
        };
        element.clicks += 1;
        let effects = self.effects.get(selector).cloned().unwrap_or_default();
        for effect in effects {
            self.apply(effect);
        }
        true
    }

    fn focus(&mut self, selector: &str) -> bool {
        if !self.elements.contains_key(selector) {
            return false;
        }
        self.focused = Some(selector.to_owned());
        true
    }

    fn scroll_into_view(&mut self, selector: &str, options: ScrollOptions) {
        self.scrolls.push((selector.to_owned(), options));
    }
}
