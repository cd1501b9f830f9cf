#![forbid(unsafe_code)]

//! Tour engine: session state, navigation and geometry.
//!
//! The engine owns the active [`Sequence`], the current index, the last
//! computed [`TourGeometry`], the [`CompletionStore`] and the [`Document`] it
//! measures against. It is host-driven: every call that can arm a timer
//! takes the current monotonic time, and the host calls [`TourEngine::tick`]
//! at or after [`TourEngine::next_deadline`].
//!
//! # Showing a step
//!
//! 1. Geometry from the previous step is dropped.
//! 2. The step's `on_before_step` hook runs.
//! 3. The target is resolved and measured ([`TourEngine::locate_positions`]).
//! 4. The step's `on_after_step` hook runs.
//! 5. The settle timer is armed; when it fires the target is measured again.
//!
//! # Invariants
//!
//! 1. While active, `step_index < step_count`.
//! 2. Geometry is only ever derived from the current step; it is cleared on
//!    every step change and on teardown.
//! 3. Completion and skip both mark the completion store, notify the
//!    observer once, and leave the engine inactive at index 0.
//! 4. Navigation at a boundary is a no-op, never an error.

use core::time::Duration;
use std::fmt;
use std::sync::Arc;

use guidepost_core::document::{Document, resolve_target};
use guidepost_core::geometry::Rect;
use guidepost_core::hooks::{HookContext, HookError, StepHooks};
use guidepost_core::step::{Placement, Sequence, Step};
use serde::Serialize;

use crate::completion::CompletionStore;
use crate::config::EngineConfig;
use crate::placement::{TourGeometry, compute_geometry};
use crate::timing::{ResizeDebouncer, SettleTimer, earliest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TourAdvanceReason {
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TourEvent {
    Started {
        sequence: String,
        steps: usize,
    },
    StepChanged {
        from: usize,
        to: usize,
        reason: TourAdvanceReason,
    },
    Finished {
        sequence: String,
        steps: usize,
    },
    Skipped {
        sequence: String,
        at: usize,
    },
}

/// Callbacks for the component that launched the tour.
pub trait TourObserver {
    /// The user pressed Finish on the last step.
    fn on_complete(&mut self, _sequence: &str) {}

    /// The user dismissed the tour early.
    fn on_skip(&mut self, _sequence: &str, _at: usize) {}
}

/// Which hook phase is running; only used for logging.
#[derive(Debug, Clone, Copy)]
enum HookPhase {
    Before,
    After,
}

impl HookPhase {
    fn as_str(self) -> &'static str {
        match self {
            HookPhase::Before => "before",
            HookPhase::After => "after",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TourSession {
    active: bool,
    sequence: Sequence,
    index: usize,
}

impl TourSession {
    fn reset(&mut self) {
        self.active = false;
        self.sequence = Sequence::empty();
        self.index = 0;
    }
}

/// View snapshot for rendering the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourOverlay<'a> {
    pub sequence: &'a str,
    pub step_id: &'a str,
    pub step_index: usize,
    pub step_count: usize,
    pub label: String,
    pub title: &'a str,
    pub body: &'a str,
    pub placement: Placement,
    pub progress: f64,
    pub can_retreat: bool,
    pub is_last: bool,
    pub highlight: Option<Rect>,
    pub tooltip: Option<Rect>,
}

pub struct TourEngine<D> {
    document: D,
    completion: CompletionStore,
    config: EngineConfig,
    session: TourSession,
    geometry: Option<TourGeometry>,
    settle: SettleTimer,
    resize: ResizeDebouncer,
    observer: Option<Box<dyn TourObserver>>,
}

impl<D: Document> TourEngine<D> {
    pub fn new(document: D, completion: CompletionStore, config: EngineConfig) -> Self {
        let settle = SettleTimer::new(config.settle_delay_duration());
        let resize =
            ResizeDebouncer::new(config.resize_quiet_duration(), config.resize_max_wait_duration());
        Self {
            document,
            completion,
            config,
            session: TourSession::default(),
            geometry: None,
            settle,
            resize,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: impl TourObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // --- Accessors ---------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn step_index(&self) -> usize {
        self.session.index
    }

    pub fn step_count(&self) -> usize {
        self.session.sequence.len()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.session.sequence
    }

    pub fn current_step(&self) -> Option<&Step> {
        if !self.session.active {
            return None;
        }
        self.session.sequence.get(self.session.index)
    }

    pub fn geometry(&self) -> Option<&TourGeometry> {
        self.geometry.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn completion(&self) -> &CompletionStore {
        &self.completion
    }

    pub fn has_completed_tour(&self) -> bool {
        self.completion.has_completed_tour()
    }

    pub fn is_last_step(&self) -> bool {
        self.session.active && self.session.index + 1 >= self.session.sequence.len()
    }

    pub fn can_retreat(&self) -> bool {
        self.session.active && self.session.index > 0
    }

    /// Fraction of the tour reached, counting the current step as done.
    pub fn progress(&self) -> f64 {
        let count = self.session.sequence.len();
        if !self.session.active || count == 0 {
            return 0.0;
        }
        (self.session.index + 1) as f64 / count as f64
    }

    /// "Step 2 of 5".
    pub fn step_label(&self) -> Option<String> {
        if !self.session.active {
            return None;
        }
        Some(format!(
            "Step {} of {}",
            self.session.index + 1,
            self.session.sequence.len()
        ))
    }

    // --- Navigation --------------------------------------------------------

    /// Start `sequence` from its first step, replacing any running tour.
    ///
    /// An empty sequence leaves the engine inactive.
    pub fn activate(&mut self, sequence: Sequence, now: Duration) -> Option<TourEvent> {
        self.teardown();
        if sequence.is_empty() {
            tracing::warn!(sequence = sequence.name(), "refusing to start an empty tour");
            return None;
        }
        let event = TourEvent::Started {
            sequence: sequence.name().to_owned(),
            steps: sequence.len(),
        };
        tracing::info!(sequence = sequence.name(), steps = sequence.len(), "tour started");
        self.session = TourSession {
            active: true,
            sequence,
            index: 0,
        };
        self.show_current(now);
        Some(event)
    }

    /// Forget that the user has seen the tour.
    pub fn reset_completion(&mut self) {
        if let Err(err) = self.completion.reset() {
            tracing::warn!(
                backend = self.completion.backend_name(),
                error = %err,
                "failed to clear tour completion flag"
            );
        }
    }

    /// Clear the completion flag and start `sequence`.
    pub fn replay(&mut self, sequence: Sequence, now: Duration) -> Option<TourEvent> {
        self.reset_completion();
        self.activate(sequence, now)
    }

    /// Go to the next step, or finish the tour from the last one.
    pub fn advance(&mut self, now: Duration) -> Option<TourEvent> {
        if !self.session.active {
            return None;
        }
        if self.is_last_step() {
            return Some(self.finish());
        }
        let from = self.session.index;
        self.session.index += 1;
        self.show_current(now);
        Some(TourEvent::StepChanged {
            from,
            to: self.session.index,
            reason: TourAdvanceReason::Next,
        })
    }

    /// Go back one step. No-op on the first step.
    pub fn retreat(&mut self, now: Duration) -> Option<TourEvent> {
        if !self.can_retreat() {
            return None;
        }
        let from = self.session.index;
        self.session.index -= 1;
        self.show_current(now);
        Some(TourEvent::StepChanged {
            from,
            to: self.session.index,
            reason: TourAdvanceReason::Previous,
        })
    }

    /// Dismiss the tour early. Counts as having seen it.
    pub fn skip(&mut self) -> Option<TourEvent> {
        if !self.session.active {
            return None;
        }
        let at = self.session.index;
        let sequence = self.session.sequence.name().to_owned();
        tracing::info!(sequence = %sequence, at, "tour skipped");
        self.teardown();
        self.mark_seen();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_skip(&sequence, at);
        }
        Some(TourEvent::Skipped { sequence, at })
    }

    fn finish(&mut self) -> TourEvent {
        let sequence = self.session.sequence.name().to_owned();
        let steps = self.session.sequence.len();
        tracing::info!(sequence = %sequence, steps, "tour completed");
        self.teardown();
        self.mark_seen();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_complete(&sequence);
        }
        TourEvent::Finished { sequence, steps }
    }

    fn mark_seen(&mut self) {
        if let Err(err) = self.completion.mark_completed() {
            tracing::warn!(
                backend = self.completion.backend_name(),
                error = %err,
                "failed to persist tour completion flag"
            );
        }
    }

    fn teardown(&mut self) {
        self.session.reset();
        self.geometry = None;
        self.settle.cancel();
        self.resize.cancel();
    }

    // --- Geometry ----------------------------------------------------------

    fn show_current(&mut self, now: Duration) {
        self.geometry = None;
        let hooks = self.current_step().and_then(|step| step.hooks.clone());
        tracing::debug!(
            sequence = self.session.sequence.name(),
            index = self.session.index,
            "showing tour step"
        );
        if let Some(hooks) = &hooks {
            self.run_hook(hooks, HookPhase::Before);
        }
        self.locate_positions();
        if let Some(hooks) = &hooks {
            self.run_hook(hooks, HookPhase::After);
        }
        self.settle.arm(now);
    }

    fn run_hook(&mut self, hooks: &Arc<dyn StepHooks>, phase: HookPhase) {
        let Some(step) = self.session.sequence.get(self.session.index) else {
            return;
        };
        let mut cx = HookContext::new(
            &mut self.document,
            self.session.sequence.name(),
            &step.id,
            self.session.index,
            self.session.sequence.len(),
        );
        let result: Result<(), HookError> = match phase {
            HookPhase::Before => hooks.on_before_step(&mut cx),
            HookPhase::After => hooks.on_after_step(&mut cx),
        };
        if let Err(err) = result {
            tracing::warn!(
                hook = hooks.name(),
                phase = phase.as_str(),
                step = %step.id,
                error = %err,
                "tour step hook failed"
            );
        }
    }

    /// Measure the current step's target and recompute geometry.
    ///
    /// Returns `true` when geometry was updated. When no candidate selector
    /// matches or the match measures as a non-finite rect, logs a warning and
    /// keeps the previous geometry.
    pub fn locate_positions(&mut self) -> bool {
        let Some(step) = self.current_step() else {
            return false;
        };
        let Some(target) = resolve_target(&self.document, &step.target) else {
            tracing::warn!(target_selector = %step.target, step = %step.id, "tour target not found");
            return false;
        };
        if !target.rect.is_finite() {
            tracing::warn!(
                selector = %target.selector,
                step = %step.id,
                "tour target has no finite layout"
            );
            return false;
        }
        let geometry = compute_geometry(
            target.rect,
            step.padding_or(self.config.default_padding),
            step.placement,
            self.document.viewport(),
            self.config.tooltip_size,
            self.config.spacing,
        );
        tracing::trace!(
            step = %step.id,
            selector = %target.selector,
            x = geometry.tooltip.x,
            y = geometry.tooltip.y,
            "tour geometry updated"
        );
        self.geometry = Some(geometry);
        if let Some(scroll) = self.config.scroll {
            self.document.scroll_into_view(&target.selector, scroll);
        }
        true
    }

    // --- Time --------------------------------------------------------------

    /// Record a viewport resize. Geometry is recomputed from [`tick`](Self::tick)
    /// once the resize stream goes quiet.
    pub fn notify_resize(&mut self, now: Duration) {
        if self.session.active {
            self.resize.notify(now);
        }
    }

    /// Fire due timers. Returns `true` when geometry was recomputed.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.session.active {
            return false;
        }
        let settle_due = self.settle.poll(now);
        let resize_due = self.resize.poll(now);
        if settle_due || resize_due {
            return self.locate_positions();
        }
        false
    }

    /// When the host should call [`tick`](Self::tick) next.
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.session.active {
            return None;
        }
        earliest(self.settle.deadline(), self.resize.deadline())
    }

    // --- View --------------------------------------------------------------

    pub fn overlay(&self) -> Option<TourOverlay<'_>> {
        let step = self.current_step()?;
        Some(TourOverlay {
            sequence: self.session.sequence.name(),
            step_id: &step.id,
            step_index: self.session.index,
            step_count: self.session.sequence.len(),
            label: self.step_label().unwrap_or_default(),
            title: &step.title,
            body: &step.body,
            placement: step.placement,
            progress: self.progress(),
            can_retreat: self.can_retreat(),
            is_last: self.is_last_step(),
            highlight: self.geometry.map(|g| g.highlight),
            tooltip: self.geometry.map(|g| g.tooltip),
        })
    }
}

impl<D> fmt::Debug for TourEngine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourEngine")
            .field("active", &self.session.active)
            .field("sequence", &self.session.sequence.name())
            .field("index", &self.session.index)
            .field("geometry", &self.geometry)
            .field("completion", &self.completion)
            .finish()
    }
}
