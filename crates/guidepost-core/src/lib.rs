#![forbid(unsafe_code)]

//! Core: geometry, the step model, step hooks and the document capability.

pub mod document;
pub mod geometry;
pub mod hooks;
pub mod step;

pub use document::{Document, MemoryDocument, ScrollOptions};
pub use geometry::{Point, Rect, Size};
pub use hooks::{HookContext, HookError, StepHooks};
pub use step::{Placement, Sequence, Step, TargetSelector};
