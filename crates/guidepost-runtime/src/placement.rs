#![forbid(unsafe_code)]

//! Highlight and tooltip placement.
//!
//! # Invariants
//!
//! 1. The highlight is the target box grown by the step padding on every side.
//! 2. The tooltip is anchored on the raw target box (not the highlight) using
//!    a fixed assumed footprint, `spacing` pixels away from the target edge.
//! 3. The anchored tooltip is then clamped into the viewport: first to at
//!    least `spacing` from the top/left edge, then to at most
//!    `viewport - footprint - spacing`. On viewports smaller than the
//!    footprint the second clamp wins.
//!
//! Everything here is a pure function of its inputs.

use guidepost_core::geometry::{Point, Rect, Size};
use guidepost_core::step::Placement;
use serde::Serialize;

/// Highlight and tooltip boxes for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TourGeometry {
    pub highlight: Rect,
    pub tooltip: Rect,
    pub placement: Placement,
}

/// Where the tooltip's top-left corner lands before clamping.
pub fn anchor_tooltip(target: Rect, placement: Placement, tooltip: Size, spacing: f64) -> Point {
    match placement {
        Placement::Top => Point::new(
            target.center_x() - tooltip.width / 2.0,
            target.top() - tooltip.height - spacing,
        ),
        Placement::Bottom => Point::new(
            target.center_x() - tooltip.width / 2.0,
            target.bottom() + spacing,
        ),
        Placement::Left => Point::new(
            target.left() - tooltip.width - spacing,
            target.center_y() - tooltip.height / 2.0,
        ),
        Placement::Right => Point::new(
            target.right() + spacing,
            target.center_y() - tooltip.height / 2.0,
        ),
    }
}

/// Compute both boxes for a measured target.
pub fn compute_geometry(
    target: Rect,
    padding: f64,
    placement: Placement,
    viewport: Size,
    tooltip: Size,
    spacing: f64,
) -> TourGeometry {
    let anchor = anchor_tooltip(target, placement, tooltip, spacing);
    let unclamped = Rect::new(anchor.x, anchor.y, tooltip.width, tooltip.height);
    TourGeometry {
        highlight: target.outset(padding),
        tooltip: unclamped.clamp_within(Rect::from_size(viewport), spacing),
        placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLTIP: Size = Size::new(320.0, 200.0);
    const SPACING: f64 = 16.0;
    const VIEWPORT: Size = Size::new(1280.0, 800.0);

    fn target() -> Rect {
        Rect::new(500.0, 300.0, 200.0, 40.0)
    }

    #[test]
    fn bottom_sits_below_and_centered() {
        let p = anchor_tooltip(target(), Placement::Bottom, TOOLTIP, SPACING);
        assert_eq!(p.y, 340.0 + SPACING);
        assert_eq!(p.x, 600.0 - 160.0);
    }

    #[test]
    fn top_sits_above_and_centered() {
        let p = anchor_tooltip(target(), Placement::Top, TOOLTIP, SPACING);
        assert_eq!(p.y, 300.0 - 200.0 - SPACING);
        assert_eq!(p.x, 440.0);
    }

    #[test]
    fn left_and_right_center_vertically() {
        let l = anchor_tooltip(target(), Placement::Left, TOOLTIP, SPACING);
        assert_eq!(l.x, 500.0 - 320.0 - SPACING);
        assert_eq!(l.y, 320.0 - 100.0);

        let r = anchor_tooltip(target(), Placement::Right, TOOLTIP, SPACING);
        assert_eq!(r.x, 700.0 + SPACING);
        assert_eq!(r.y, 220.0);
    }

    #[test]
    fn highlight_is_padded_target() {
        let g = compute_geometry(target(), 12.0, Placement::Bottom, VIEWPORT, TOOLTIP, SPACING);
        assert_eq!(g.highlight, Rect::new(488.0, 288.0, 224.0, 64.0));
        assert_eq!(g.placement, Placement::Bottom);
    }

    #[test]
    fn unclamped_when_room() {
        let g = compute_geometry(target(), 8.0, Placement::Bottom, VIEWPORT, TOOLTIP, SPACING);
        assert_eq!(g.tooltip, Rect::new(440.0, 356.0, 320.0, 200.0));
    }

    #[test]
    fn right_edge_target_is_clamped() {
        let near_edge = Rect::new(1240.0, 100.0, 30.0, 30.0);
        let g = compute_geometry(near_edge, 8.0, Placement::Bottom, VIEWPORT, TOOLTIP, SPACING);
        assert!(g.tooltip.x <= VIEWPORT.width - TOOLTIP.width - SPACING);
        assert_eq!(g.tooltip.x, 1280.0 - 320.0 - 16.0);
    }

    #[test]
    fn top_of_page_target_with_top_placement_clamps_to_spacing() {
        let header = Rect::new(0.0, 0.0, 1280.0, 56.0);
        let g = compute_geometry(header, 10.0, Placement::Top, VIEWPORT, TOOLTIP, SPACING);
        assert_eq!(g.tooltip.y, SPACING);
        assert_eq!(g.tooltip.x, 640.0 - 160.0);
    }

    #[test]
    fn left_placement_near_left_edge_clamps() {
        let sidebar = Rect::new(0.0, 0.0, 280.0, 800.0);
        let g = compute_geometry(sidebar, 10.0, Placement::Left, VIEWPORT, TOOLTIP, SPACING);
        assert_eq!(g.tooltip.x, SPACING);
        assert_eq!(g.tooltip.y, 300.0);
    }

    #[test]
    fn bottom_edge_target_clamps_up() {
        let input = Rect::new(200.0, 740.0, 800.0, 40.0);
        let g = compute_geometry(input, 10.0, Placement::Bottom, VIEWPORT, TOOLTIP, SPACING);
        assert_eq!(g.tooltip.y, 800.0 - 200.0 - 16.0);
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let g = compute_geometry(
            Rect::new(10.0, 10.0, 10.0, 10.0),
            8.0,
            Placement::Right,
            Size::new(100.0, 80.0),
            TOOLTIP,
            SPACING,
        );
        assert_eq!(g.tooltip.x, 100.0 - 320.0 - 16.0);
        assert_eq!(g.tooltip.y, 80.0 - 200.0 - 16.0);
    }
}
