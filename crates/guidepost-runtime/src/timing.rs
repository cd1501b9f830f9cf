#![forbid(unsafe_code)]

//! Deterministic timers driven by host time.
//!
//! The host passes a monotonic `now` (time since an arbitrary origin) into
//! every call; nothing here reads a clock. That keeps the engine usable on
//! `wasm32-unknown-unknown` and makes every timing decision reproducible in
//! tests.
//!
//! - [`SettleTimer`]: one-shot re-measure shortly after a step is shown so
//!   elements revealed by a hook (an opening panel) get picked up.
//! - [`ResizeDebouncer`]: latest-wins coalescing of viewport resizes with a
//!   hard deadline so a continuous drag still recomputes periodically.
//!
//! # Invariants
//!
//! - A timer fires at most once per arm.
//! - `cancel` always leaves the timer idle.
//! - A pending resize is applied no later than `max_wait` after the first
//!   event of a burst.

use core::time::Duration;

/// One-shot timer.
#[derive(Debug, Clone, Default)]
pub struct SettleTimer {
    delay: Duration,
    due: Option<Duration>,
}

impl SettleTimer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) relative to `now`.
    pub fn arm(&mut self, now: Duration) {
        self.due = Some(now.saturating_add(self.delay));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.due
    }

    /// Returns `true` exactly once when `now` reaches the deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Resize event debouncer.
#[derive(Debug, Clone, Default)]
pub struct ResizeDebouncer {
    quiet: Duration,
    max_wait: Duration,
    first_event: Option<Duration>,
    last_event: Option<Duration>,
}

impl ResizeDebouncer {
    /// `quiet`: how long the stream must be silent before applying.
    /// `max_wait`: upper bound from the first event of a burst.
    #[must_use]
    pub const fn new(quiet: Duration, max_wait: Duration) -> Self {
        Self {
            quiet,
            max_wait,
            first_event: None,
            last_event: None,
        }
    }

    /// Record a resize event.
    pub fn notify(&mut self, now: Duration) {
        if self.first_event.is_none() {
            self.first_event = Some(now);
        }
        self.last_event = Some(now);
    }

    pub fn cancel(&mut self) {
        self.first_event = None;
        self.last_event = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }

    /// Earliest time at which [`poll`](Self::poll) could return `true`.
    pub fn deadline(&self) -> Option<Duration> {
        let last = self.last_event?;
        let first = self.first_event.unwrap_or(last);
        let quiet_due = last.saturating_add(self.quiet);
        let hard_due = first.saturating_add(self.max_wait);
        Some(quiet_due.min(hard_due))
    }

    /// Returns `true` once when the pending resize should be applied.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline() {
            Some(due) if now >= due => {
                self.cancel();
                true
            }
            _ => false,
        }
    }
}

/// Earliest of two optional deadlines.
pub fn earliest(a: Option<Duration>, b: Option<Duration>) -> Option<Duration> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
