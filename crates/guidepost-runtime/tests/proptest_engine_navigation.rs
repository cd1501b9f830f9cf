//! Property-based invariant tests for tour navigation.
//!
//! 1. While active, the step index stays within the sequence.
//! 2. Each step change moves the index by exactly one.
//! 3. A session ends at most once, and the completion flag is set when it does.
//! 4. After the session ends every navigation call is a no-op.
//! 5. Tooltip geometry for a visible target always respects the viewport
//!    margin when the viewport is large enough.

use core::time::Duration;

use guidepost_core::document::MemoryDocument;
use guidepost_core::geometry::{Rect, Size};
use guidepost_core::step::{Placement, Sequence, Step};
use guidepost_runtime::{
    CompletionStore, EngineConfig, MemoryStorage, TourAdvanceReason, TourEngine, TourEvent,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Action {
    Next,
    Previous,
    Skip,
    Resize,
    Tick(u64),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => Just(Action::Next),
        3 => Just(Action::Previous),
        1 => Just(Action::Skip),
        1 => Just(Action::Resize),
        2 => (0u64..300).prop_map(Action::Tick),
    ]
}

fn placement_strategy() -> impl Strategy<Value = Placement> {
    prop::sample::select(Placement::ALL.to_vec())
}

fn build(len: usize) -> TourEngine<MemoryDocument> {
    let mut doc = MemoryDocument::new(Size::new(1280.0, 800.0));
    let mut steps = Vec::with_capacity(len);
    for i in 0..len {
        let sel = format!("#s{i}");
        doc.insert(sel.clone(), Rect::new(40.0 * i as f64, 30.0 * i as f64, 80.0, 40.0));
        steps.push(Step::new(sel, format!("Step {i}"), "body"));
    }
    let mut engine = TourEngine::new(
        doc,
        CompletionStore::new(MemoryStorage::new()),
        EngineConfig::default(),
    );
    engine.activate(Sequence::new("prop", steps), Duration::ZERO);
    engine
}

// ═════════════════════════════════════════════════════════════════════════
// 1–4. Navigation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn navigation_keeps_index_in_bounds(
        len in 1usize..8,
        actions in prop::collection::vec(action_strategy(), 0..60),
    ) {
        let mut engine = build(len);
        let mut now = Duration::ZERO;
        let mut ended = 0u32;

        for action in actions {
            now += Duration::from_millis(7);
            let was_active = engine.is_active();
            let before = engine.step_index();
            let event = match action {
                Action::Next => engine.advance(now),
                Action::Previous => engine.retreat(now),
                Action::Skip => engine.skip(),
                Action::Resize => {
                    engine.notify_resize(now);
                    None
                }
                Action::Tick(dt) => {
                    now += Duration::from_millis(dt);
                    engine.tick(now);
                    None
                }
            };

            match event {
                Some(TourEvent::StepChanged { from, to, reason }) => {
                    prop_assert!(was_active);
                    prop_assert_eq!(from, before);
                    match reason {
                        TourAdvanceReason::Next => prop_assert_eq!(to, from + 1),
                        TourAdvanceReason::Previous => prop_assert_eq!(to + 1, from),
                    }
                }
                Some(TourEvent::Finished { steps, .. }) => {
                    prop_assert!(was_active);
                    prop_assert_eq!(steps, len);
                    prop_assert_eq!(before, len - 1);
                    ended += 1;
                }
                Some(TourEvent::Skipped { at, .. }) => {
                    prop_assert!(was_active);
                    prop_assert_eq!(at, before);
                    ended += 1;
                }
                Some(TourEvent::Started { .. }) => prop_assert!(false, "unexpected start"),
                None => {}
            }

            if engine.is_active() {
                prop_assert!(engine.step_index() < engine.step_count());
                prop_assert!(engine.current_step().is_some());
            } else {
                prop_assert_eq!(engine.step_index(), 0);
                prop_assert!(engine.geometry().is_none());
                prop_assert!(engine.next_deadline().is_none());
            }
        }

        prop_assert!(ended <= 1);
        prop_assert_eq!(engine.has_completed_tour(), ended == 1);
    }

    #[test]
    fn progress_is_monotone_while_advancing(len in 1usize..10) {
        let mut engine = build(len);
        let mut last = 0.0;
        let mut now = Duration::ZERO;
        while engine.is_active() {
            let p = engine.progress();
            prop_assert!(p > last);
            prop_assert!(p <= 1.0);
            last = p;
            now += Duration::from_millis(1);
            engine.advance(now);
        }
        prop_assert_eq!(last, 1.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Geometry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tooltip_stays_inside_viewport_margin(
        x in -500.0f64..2500.0,
        y in -500.0f64..2500.0,
        w in 0.0f64..400.0,
        h in 0.0f64..400.0,
        vw in 400.0f64..2400.0,
        vh in 300.0f64..1600.0,
        placement in placement_strategy(),
    ) {
        let mut doc = MemoryDocument::new(Size::new(vw, vh));
        doc.insert("#t", Rect::new(x, y, w, h));
        let mut engine = TourEngine::new(
            doc,
            CompletionStore::new(MemoryStorage::new()),
            EngineConfig::default(),
        );
        engine.activate(
            Sequence::new("one", vec![Step::new("#t", "T", "").placement(placement)]),
            Duration::ZERO,
        );

        let g = engine.geometry().copied().expect("target exists");
        let eps = 1e-9;
        prop_assert!(g.tooltip.left() >= 16.0 - eps);
        prop_assert!(g.tooltip.top() >= 16.0 - eps);
        prop_assert!(g.tooltip.right() <= vw - 16.0 + eps);
        prop_assert!(g.tooltip.bottom() <= vh - 16.0 + eps);
        prop_assert_eq!(g.tooltip.width, 320.0);
        prop_assert_eq!(g.tooltip.height, 200.0);
    }
}
