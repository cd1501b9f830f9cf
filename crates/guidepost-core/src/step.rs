#![forbid(unsafe_code)]

//! Declarative tour steps and sequences.
//!
//! A [`Step`] names the element to spotlight, the copy to show next to it and
//! where the tooltip should sit. A [`Sequence`] is an ordered, named list of
//! steps presented as one tour. Both are immutable once built; hooks are
//! shared behind an [`Arc`] so sequences can be concatenated cheaply.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hooks::StepHooks;

/// Highlight padding applied when a step does not specify one.
pub const DEFAULT_HIGHLIGHT_PADDING: f64 = 8.0;

/// Preferred tooltip position relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Above the target, centered horizontally.
    Top,
    /// Below the target, centered horizontally.
    #[default]
    Bottom,
    /// Left of the target, centered vertically.
    Left,
    /// Right of the target, centered vertically.
    Right,
}

impl Placement {
    pub const ALL: [Placement; 4] = [
        Placement::Top,
        Placement::Bottom,
        Placement::Left,
        Placement::Right,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::Bottom => "bottom",
            Placement::Left => "left",
            Placement::Right => "right",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more CSS selectors, tried in order.
///
/// The source string is split on commas and each trimmed, non-empty piece is
/// a candidate. Resolution uses the first candidate that matches, which is
/// not the same as handing the whole list to `querySelector` (that would pick
/// whichever match comes first in document order).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSelector {
    source: String,
    candidates: Vec<String>,
}

impl TargetSelector {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let candidates = source
            .split(',')
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty())
            .map(str::to_owned)
            .collect();
        Self { source, candidates }
    }

    /// The selector text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Candidate selectors in resolution order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl From<&str> for TargetSelector {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A single unit of a tour.
#[derive(Clone)]
pub struct Step {
    pub id: String,
    pub target: TargetSelector,
    pub title: String,
    pub body: String,
    pub placement: Placement,
    /// Explicit highlight padding. `None` falls back to
    /// [`DEFAULT_HIGHLIGHT_PADDING`]; `Some(0.0)` is honoured.
    pub highlight_padding: Option<f64>,
    pub hooks: Option<Arc<dyn StepHooks>>,
}

impl Step {
    /// Create a step with default placement and padding.
    ///
    /// The id is derived from the title.
    pub fn new(target: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: format!("step:{}", slugify(&title)),
            target: TargetSelector::new(target),
            title,
            body: body.into(),
            placement: Placement::default(),
            highlight_padding: None,
            hooks: None,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.highlight_padding = Some(padding);
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: impl StepHooks + 'static) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Padding to apply around the target, with the default filled in.
    pub fn resolved_padding(&self) -> f64 {
        self.padding_or(DEFAULT_HIGHLIGHT_PADDING)
    }

    /// Padding to apply around the target, falling back to `default` when
    /// unset or not a finite number.
    pub fn padding_or(&self, default: f64) -> f64 {
        match self.highlight_padding {
            Some(padding) if padding.is_finite() => padding,
            _ => default,
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("target", &self.target.source())
            .field("title", &self.title)
            .field("placement", &self.placement)
            .field("highlight_padding", &self.highlight_padding)
            .field("hooks", &self.hooks.as_ref().map(|h| h.name()))
            .finish()
    }
}

/// An ordered list of steps presented as one tour.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    name: String,
    steps: Vec<Step>,
}

impl Sequence {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// An unnamed, empty sequence.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Build a sequence from the steps of `parts` in order, followed by
    /// `extra`.
    pub fn concat<'a>(
        name: impl Into<String>,
        parts: impl IntoIterator<Item = &'a Sequence>,
        extra: impl IntoIterator<Item = Step>,
    ) -> Self {
        let mut steps: Vec<Step> = parts
            .into_iter()
            .flat_map(|part| part.steps.iter().cloned())
            .collect();
        steps.extend(extra);
        Self::new(name, steps)
    }
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_sep = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}
