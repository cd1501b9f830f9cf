#![forbid(unsafe_code)]

//! Step side-effect hooks.
//!
//! Some steps need the page to change before their target can be measured,
//! for example opening a collapsed side panel. Those effects are expressed as
//! a [`StepHooks`] implementation attached to the step. The engine calls
//! [`StepHooks::on_before_step`] before measuring the target and
//! [`StepHooks::on_after_step`] once the step is on screen, each exactly once
//! per time the step is shown.
//!
//! Hooks reach the page only through the [`HookContext`], never through
//! ambient globals, so tests can drive them against a
//! [`MemoryDocument`](crate::document::MemoryDocument) and assert on what
//! they did.

use std::fmt;

use crate::document::Document;

/// Failure reported by a hook.
///
/// Hook errors are logged by the engine and never abort the tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// An element the hook needed was not in the document.
    MissingElement(String),
    /// The host rejected the operation.
    Host(String),
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::MissingElement(selector) => write!(f, "element not found: {selector}"),
            HookError::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for HookError {}

/// What a hook can see and touch while it runs.
pub struct HookContext<'a> {
    document: &'a mut dyn Document,
    sequence: &'a str,
    step_id: &'a str,
    step_index: usize,
    step_count: usize,
}

impl<'a> HookContext<'a> {
    pub fn new(
        document: &'a mut dyn Document,
        sequence: &'a str,
        step_id: &'a str,
        step_index: usize,
        step_count: usize,
    ) -> Self {
        Self {
            document,
            sequence,
            step_id,
            step_index,
            step_count,
        }
    }

    pub fn document(&mut self) -> &mut dyn Document {
        &mut *self.document
    }

    pub fn sequence(&self) -> &str {
        self.sequence
    }

    pub fn step_id(&self) -> &str {
        self.step_id
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

impl fmt::Debug for HookContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("sequence", &self.sequence)
            .field("step_id", &self.step_id)
            .field("step_index", &self.step_index)
            .field("step_count", &self.step_count)
            .finish()
    }
}

/// Side effects attached to a step.
///
/// Both methods default to doing nothing, so an implementation only needs
/// the half it cares about.
pub trait StepHooks: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs before the step's target is measured.
    fn on_before_step(&self, _cx: &mut HookContext<'_>) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs after the step has been shown.
    fn on_after_step(&self, _cx: &mut HookContext<'_>) -> Result<(), HookError> {
        Ok(())
    }
}
