//! Viewport and scroll coordinate tests
//!
//! Tests for verifying scroll clamping, visible row/column calculation,
//! bounds growth while scrolling, and coordinate transformations.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_scroll_in_range, engine, SURFACE_HEIGHT, SURFACE_WIDTH};
use proptest::prelude::*;
use xlgrid::{StateChange, VirtualBounds};

// =============================================================================
// BASIC VIEWPORT TESTS
// =============================================================================

#[test]
fn test_viewport_initial_scroll_zero() {
    let engine = engine();
    let viewport = engine.state().viewport;
    assert_eq!(viewport.scroll_x, 0.0, "Initial scroll_x should be 0");
    assert_eq!(viewport.scroll_y, 0.0, "Initial scroll_y should be 0");
    assert_eq!(engine.state().virtual_bounds, VirtualBounds::new(199, 51));
}

#[test]
fn test_visible_range_at_scroll_zero() {
    let engine = engine();
    let range = engine.visible_range();

    assert_eq!(range.start_row, 0);
    // 600 / 20 = 30 rows, plus one for the partial row at the bottom
    assert_eq!(range.end_row, 30, "Expected rows 0..=30, got {range:?}");
    assert_eq!(range.start_col, 0);
    assert_eq!(range.end_col, 8, "Expected cols 0..=8, got {range:?}");
    assert_eq!(engine.state().viewport.row_count, 31);
}

#[test]
fn test_visible_rows_after_scroll() {
    let mut engine = engine();
    // Scroll down by 10 rows (200px)
    let change = engine.scroll_by(0.0, 200.0);

    assert_eq!(change, StateChange::SCROLL);
    let range = engine.visible_range();
    assert_eq!(
        range.start_row, 10,
        "Start row should be 10 at scroll_y=200 with 20px rows"
    );
    assert_eq!(range.end_row, 40);
    assert_eq!(engine.state().viewport.start_row, 10);
}

#[test]
fn test_partial_cell_offsets() {
    let mut engine = engine();
    engine.scroll_by(150.0, 35.0);

    let range = engine.visible_range();
    assert_eq!(range.start_col, 1);
    assert_eq!(range.offset_x, -50.0, "Half of column 1 is scrolled off");
    assert_eq!(range.start_row, 1);
    assert_eq!(range.offset_y, -15.0, "15px of row 1 is scrolled off");
}

// =============================================================================
// CLAMPING TESTS
// =============================================================================

#[test]
fn test_scroll_clamps_at_origin() {
    let mut engine = engine();
    let change = engine.scroll_by(-500.0, -500.0);
    assert!(change.is_empty(), "Nothing moves past the origin");
    assert_eq!(engine.state().viewport.scroll_x, 0.0);
    assert_eq!(engine.state().viewport.scroll_y, 0.0);
}

#[test]
fn test_scroll_to_position_clamps_to_bounds() {
    let mut engine = engine();
    engine.scroll_to_position(1e9, 1e9);

    let viewport = engine.state().viewport;
    // 200 rows * 20 - 600 and 52 cols * 100 - 800
    assert_eq!(viewport.scroll_y, 3_400.0);
    assert_eq!(viewport.scroll_x, 4_400.0);
    assert_eq!(viewport.start_row, 170);
    assert_eq!(viewport.start_col, 44);
    assert_eq!(
        engine.state().virtual_bounds,
        VirtualBounds::new(199, 51),
        "Jumping the scroll position does not grow bounds"
    );
}

#[test]
fn test_non_finite_position_is_clamped() {
    let mut engine = engine();
    engine.scroll_to_position(f64::NAN, f64::INFINITY);
    let viewport = engine.state().viewport;
    assert_eq!(viewport.scroll_x, 0.0);
    assert_eq!(viewport.scroll_y, 3_400.0);
}

#[test]
fn test_resize_reclamps_scroll() {
    let mut engine = engine();
    engine.scroll_to_position(1e9, 1e9);

    let change = engine.set_viewport_dimensions(SURFACE_WIDTH + 200.0, SURFACE_HEIGHT + 200.0);

    assert!(change.contains(StateChange::VIEWPORT_SIZE | StateChange::SCROLL));
    let viewport = engine.state().viewport;
    assert_eq!(viewport.scroll_x, 4_200.0);
    assert_eq!(viewport.scroll_y, 3_200.0);
    assert_eq!(viewport.row_count, 41);
}

#[test]
fn test_degenerate_then_restored_viewport() {
    let mut engine = engine();
    engine.scroll_by(300.0, 300.0);
    engine.set_viewport_dimensions(0.0, 0.0);

    let extent = engine.state().scroll_extent();
    assert_eq!(extent.content_width, 1.0);
    assert_eq!(extent.content_height, 1.0);
    assert_eq!(engine.state().viewport.scroll_y, 0.0);
    assert!(!engine.scrollbars().vertical.visible);
    assert!(!engine.scrollbars().horizontal.visible);

    engine.set_viewport_dimensions(SURFACE_WIDTH, SURFACE_HEIGHT);
    engine.scroll_by(0.0, 300.0);
    assert_eq!(engine.state().viewport.scroll_y, 300.0);
}

// =============================================================================
// BOUNDS GROWTH TESTS
// =============================================================================

#[test]
fn test_scroll_far_from_edge_keeps_bounds() {
    let mut engine = engine();
    let change = engine.scroll_by(0.0, 200.0);
    assert!(!change.contains(StateChange::BOUNDS));
}

#[test]
fn test_wheel_at_bottom_grows_bounds() {
    let mut engine = engine();
    engine.scroll_to_position(0.0, 1e9);
    let change = engine.scroll_by(0.0, 100.0);

    assert!(change.contains(StateChange::BOUNDS | StateChange::SCROLL));
    assert_eq!(engine.state().virtual_bounds.max_row, 251);
    assert_eq!(engine.state().viewport.scroll_y, 3_500.0);
}

#[test]
fn test_arrow_down_at_bottom_grows_bounds() {
    let mut engine = engine();
    engine.select_cell(185, 0);
    engine.scroll_to_position(0.0, 1e9);
    assert_eq!(engine.state().viewport.scroll_y, 3_400.0);
    assert_eq!(engine.state().virtual_bounds, VirtualBounds::new(199, 51));

    let change = engine.move_selection(1, 0, false);

    assert!(change.contains(StateChange::BOUNDS | StateChange::SELECTION));
    assert_eq!(engine.state().virtual_bounds, VirtualBounds::new(249, 51));
    assert_eq!(engine.state().viewport.scroll_y, 3_400.0, "Row 186 was already visible");
}

#[test]
fn test_jump_to_top_at_bottom_keeps_bounds() {
    let mut engine = engine();
    engine.scroll_to_position(0.0, 1e9);
    let change = engine.scroll_to_cell(0, 0, false);

    assert!(!change.contains(StateChange::BOUNDS));
    assert_eq!(engine.state().virtual_bounds, VirtualBounds::new(199, 51));
    assert_eq!(engine.state().viewport.scroll_y, 0.0);
}

#[test]
fn test_repeated_wheel_keeps_growing() {
    let mut engine = engine();
    let mut last_max_row = engine.state().virtual_bounds.max_row;
    let mut last_scroll = 0.0;
    for _ in 0..100 {
        engine.scroll_by(0.0, 1_000.0);
        let state = engine.state();
        assert!(state.virtual_bounds.max_row >= last_max_row);
        assert!(state.viewport.scroll_y > last_scroll);
        last_max_row = state.virtual_bounds.max_row;
        last_scroll = state.viewport.scroll_y;
    }
    assert!(last_max_row > 5_000, "got {last_max_row}");
}

// =============================================================================
// DIMENSION OVERRIDE TESTS
// =============================================================================

#[test]
fn test_wide_column_extends_content() {
    let mut engine = engine();
    engine.set_column_width(0, 300.0);
    engine.scroll_to_position(1e9, 0.0);
    assert_eq!(engine.state().scroll_extent().content_width, 5_400.0);
    assert_eq!(engine.state().viewport.scroll_x, 4_600.0);
}

#[test]
fn test_tall_row_shifts_rows_below() {
    let mut engine = engine();
    engine.set_row_height(5, 100.0);
    let dims = &engine.state().dimensions;
    assert_eq!(dims.y_of(5), 100.0);
    assert_eq!(dims.y_of(10), 280.0);
    assert_eq!(dims.row_at_y(150.0), 5);
    assert_eq!(dims.row_at_y(200.0), 6);
}

// =============================================================================
// COORDINATE TRANSFORMATION TESTS
// =============================================================================

#[test]
fn test_cell_at_point_after_scroll() {
    let mut engine = engine();
    engine.scroll_by(150.0, 35.0);
    // Sheet point (210, 45)
    assert_eq!(engine.cell_at_point(110.0, 34.0), Some((2, 2)));
    // Row header
    assert_eq!(engine.cell_at_point(20.0, 300.0), None);
    // Column header
    assert_eq!(engine.cell_at_point(300.0, 10.0), None);
    // Vertical scrollbar
    assert_eq!(engine.cell_at_point(SURFACE_WIDTH - 5.0, 300.0), None);
}

#[test]
fn test_screen_sheet_round_trip() {
    let mut engine = engine();
    engine.scroll_by(437.0, 1_234.0);
    let state = engine.state();
    let chrome = state.chrome();
    let (x, y) = state.viewport.to_sheet(400.0, 300.0, &chrome).unwrap();
    assert_eq!(state.viewport.to_screen(x, y, &chrome), (400.0, 300.0));
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_scroll_stays_in_range(deltas in prop::collection::vec((-5_000.0f64..5_000.0, -5_000.0f64..5_000.0), 1..30)) {
        let mut engine = engine();
        let mut last = engine.state().virtual_bounds;
        for (dx, dy) in deltas {
            engine.scroll_by(dx, dy);
            let state = engine.state();
            assert_scroll_in_range(state);
            prop_assert!(state.virtual_bounds.max_row >= last.max_row);
            prop_assert!(state.virtual_bounds.max_col >= last.max_col);
            last = state.virtual_bounds;
        }
    }

    #[test]
    fn prop_clamping_is_idempotent(x in -1e7f64..1e7, y in -1e7f64..1e7) {
        let mut engine = engine();
        engine.scroll_to_position(x, y);
        let viewport = engine.state().viewport;
        let change = engine.scroll_to_position(viewport.scroll_x, viewport.scroll_y);
        prop_assert!(change.is_empty());
        prop_assert_eq!(engine.state().viewport, viewport);
    }
}
