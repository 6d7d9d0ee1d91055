//! Selection model tests
//!
//! Keyboard navigation, whole row/column selection, multi-range selection
//! and merge-aware extension, driven through the engine.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_cell_visible, engine, engine_with, small_config};
use test_case::test_case;
use xlgrid::{
    CellRange, GridEngine, MergeLookup, MergeTable, Selection, SelectionKind, StateChange,
    XlgridError,
};

fn selection(engine: &GridEngine) -> Selection {
    engine.state().selection.clone().expect("selection")
}

struct BrokenMerges;

impl MergeLookup for BrokenMerges {
    fn merged_regions(&self) -> xlgrid::Result<Vec<CellRange>> {
        Err(XlgridError::MergeLookup("sheet not loaded".into()))
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[test_case(1, 0 => (6, 4); "down")]
#[test_case(-1, 0 => (4, 4); "up")]
#[test_case(0, 1 => (5, 5); "right")]
#[test_case(0, -1 => (5, 3); "left")]
#[test_case(-100, -100 => (0, 0); "clamped at origin")]
fn move_from_5_4(delta_row: i64, delta_col: i64) -> (u32, u32) {
    let mut engine = engine();
    engine.select_cell(5, 4);
    engine.move_selection(delta_row, delta_col, false);
    let sel = selection(&engine);
    assert_eq!(sel.range(), CellRange::cell(sel.end_row, sel.end_col));
    sel.active_cell()
}

#[test]
fn test_move_without_selection_starts_at_origin() {
    let mut engine = engine();
    engine.move_selection(2, 1, false);
    assert_eq!(selection(&engine).active_cell(), (2, 1));
}

#[test]
fn test_move_clamps_at_grid_end() {
    let mut engine = engine_with(small_config(50, 5));
    engine.select_cell(49, 4);
    engine.move_selection(10, 10, false);
    assert_eq!(selection(&engine).active_cell(), (49, 4));
    assert_cell_visible(engine.state(), 49, 4);
}

#[test]
fn test_shift_arrow_extends_from_anchor() {
    let mut engine = engine();
    engine.select_cell(3, 3);
    engine.move_selection(2, 0, true);
    engine.move_selection(0, -1, true);

    let sel = selection(&engine);
    assert_eq!((sel.start_row, sel.start_col), (3, 3));
    assert_eq!(sel.active_cell(), (5, 2));
    assert_eq!(sel.bounds(), (3, 2, 5, 3));
}

#[test]
fn test_arrow_keys_follow_active_cell_past_bottom_edge() {
    let mut engine = engine();
    engine.select_cell(0, 0);
    for _ in 0..45 {
        engine.move_selection(1, 0, false);
        let (row, col) = selection(&engine).active_cell();
        assert_cell_visible(engine.state(), row, col);
    }
    // Row 45 sits on the bottom edge: 46 * 20 - 600
    assert_eq!(engine.state().viewport.scroll_y, 320.0);
}

#[test]
fn test_negative_coordinates_are_clamped() {
    let mut engine = engine();
    engine.set_selection(-5, -5, i64::MAX, 3, SelectionKind::Cells);
    let sel = selection(&engine);
    assert_eq!((sel.start_row, sel.start_col), (0, 0));
    assert_eq!(sel.end_row, 1_048_575);
}

// =============================================================================
// ROW / COLUMN / ALL
// =============================================================================

#[test]
fn test_select_row_spans_all_columns() {
    let mut engine = engine();
    let change = engine.select_row(7, false);
    assert_eq!(change, StateChange::SELECTION);
    let sel = selection(&engine);
    assert_eq!(sel.kind, SelectionKind::Rows);
    assert_eq!(sel.bounds(), (7, 0, 7, 16_383));
}

#[test]
fn test_select_row_extend() {
    let mut engine = engine();
    engine.select_cell(4, 2);
    engine.select_row(9, true);
    let sel = selection(&engine);
    assert_eq!(sel.bounds(), (4, 0, 9, 16_383));
}

#[test]
fn test_select_column_spans_all_rows() {
    let mut engine = engine();
    engine.select_column(5, false);
    let sel = selection(&engine);
    assert_eq!(sel.kind, SelectionKind::Columns);
    assert_eq!(sel.bounds(), (0, 5, 1_048_575, 5));
    assert_eq!(engine.state().virtual_bounds.max_row, 199, "No expansion");
}

#[test]
fn test_down_arrow_after_row_selection() {
    let mut engine = engine();
    engine.select_row(3, false);
    engine.move_selection(1, 0, false);
    assert_eq!(selection(&engine), Selection::cell(4, 0));
}

#[test]
fn test_right_arrow_after_column_selection() {
    let mut engine = engine();
    engine.select_column(3, false);
    engine.move_selection(0, 1, false);
    assert_eq!(selection(&engine), Selection::cell(0, 4));
}

#[test]
fn test_select_all_keeps_viewport() {
    let mut engine = engine();
    engine.scroll_by(500.0, 500.0);
    let before = engine.state().viewport;
    let change = engine.select_all();
    assert_eq!(change, StateChange::SELECTION);
    assert_eq!(engine.state().viewport, before);
    assert!(selection(&engine).is_full_grid(&engine.config().grid));
}

#[test]
fn test_clear_selection() {
    let mut engine = engine();
    engine.select_cell(1, 1);
    assert_eq!(engine.clear_selection(), StateChange::SELECTION);
    assert!(engine.state().selection.is_none());
    assert!(engine.clear_selection().is_empty());
}

// =============================================================================
// MULTI-RANGE
// =============================================================================

#[test]
fn test_add_range_accumulates() {
    let mut engine = engine();
    engine.select_cell(0, 0);
    engine.add_range(2, 2, 3, 3);
    engine.add_range(5, 0, 5, 0);

    let sel = selection(&engine);
    assert_eq!(sel.range(), CellRange::cell(5, 0));
    assert_eq!(
        sel.additional_ranges,
        vec![CellRange::cell(0, 0), CellRange::new(2, 2, 3, 3)]
    );
}

#[test]
fn test_add_range_cap_drops_oldest() {
    let mut config = common::config();
    config.max_additional_ranges = 2;
    let mut engine = engine_with(config);
    engine.select_cell(0, 0);
    for i in 1..=4 {
        engine.add_range(i, 0, i, 0);
    }
    let sel = selection(&engine);
    assert_eq!(
        sel.additional_ranges,
        vec![CellRange::cell(2, 0), CellRange::cell(3, 0)]
    );
}

#[test]
fn test_plain_click_drops_additional_ranges() {
    let mut engine = engine();
    engine.select_cell(0, 0);
    engine.add_range(2, 2, 2, 2);
    engine.select_cell(4, 4);
    assert!(selection(&engine).additional_ranges.is_empty());
}

#[test]
fn test_extend_keeps_additional_ranges() {
    let mut engine = engine();
    engine.select_cell(0, 0);
    engine.add_range(2, 2, 2, 2);
    engine.extend_selection(4, 4);
    let sel = selection(&engine);
    assert_eq!(sel.bounds(), (2, 2, 4, 4));
    assert_eq!(sel.additional_ranges, vec![CellRange::cell(0, 0)]);
}

// =============================================================================
// MERGES
// =============================================================================

#[test]
fn test_extend_into_merge_expands() {
    let mut engine = engine().with_merge_lookup(MergeTable::new(vec![CellRange::new(1, 1, 3, 3)]));
    engine.select_cell(0, 0);
    engine.extend_selection(2, 2);
    assert_eq!(selection(&engine).bounds(), (0, 0, 3, 3));
}

#[test]
fn test_shift_up_shrinks_past_absorbed_merge() {
    let mut engine = engine().with_merge_lookup(MergeTable::new(vec![CellRange::new(1, 1, 3, 3)]));
    engine.select_cell(0, 0);
    engine.extend_selection(2, 2);
    assert_eq!(selection(&engine).bounds(), (0, 0, 3, 3));

    let change = engine.move_selection(-1, 0, true);
    assert!(change.contains(StateChange::SELECTION));
    assert_eq!(selection(&engine).bounds(), (0, 0, 0, 3));
    assert_eq!(selection(&engine).active_cell(), (0, 3));

    engine.move_selection(-1, 0, true);
    assert_eq!(selection(&engine).bounds(), (0, 0, 0, 3), "Anchor row is the floor");

    engine.move_selection(1, 0, true);
    assert_eq!(selection(&engine).bounds(), (0, 0, 3, 3), "Growing absorbs the merge again");
}

#[test]
fn test_shift_left_shrinks_past_absorbed_merge() {
    let mut engine = engine().with_merge_lookup(MergeTable::new(vec![CellRange::new(1, 1, 3, 3)]));
    engine.select_cell(0, 0);
    engine.extend_selection(2, 2);
    engine.move_selection(0, -1, true);
    assert_eq!(selection(&engine).bounds(), (0, 0, 3, 0));
}

#[test]
fn test_chained_merges_expand_to_fixed_point() {
    let merges = vec![
        CellRange::new(1, 1, 3, 3),
        CellRange::new(3, 3, 3, 6),
        CellRange::new(0, 6, 8, 6),
    ];
    let mut engine = engine().with_merge_lookup(MergeTable::new(merges));
    engine.select_cell(0, 0);
    engine.extend_selection(1, 1);
    assert_eq!(selection(&engine).bounds(), (0, 0, 8, 6));
}

#[test]
fn test_shift_arrow_into_merge_expands() {
    let mut engine = engine().with_merge_lookup(MergeTable::new(vec![CellRange::new(2, 0, 2, 4)]));
    engine.select_cell(1, 1);
    engine.move_selection(1, 0, true);
    assert_eq!(selection(&engine).bounds(), (1, 0, 2, 4));
}

#[test]
fn test_click_inside_merge_selects_whole_region() {
    let mut engine = engine().with_merge_lookup(MergeTable::new(vec![CellRange::new(4, 4, 6, 8)]));
    engine.select_cell(5, 7);
    let sel = selection(&engine);
    assert_eq!(sel.bounds(), (4, 4, 6, 8));
    assert_eq!((sel.start_row, sel.start_col), (4, 4));
}

#[test]
fn test_failing_merge_lookup_extends_plainly() {
    let mut engine = engine().with_merge_lookup(BrokenMerges);
    engine.select_cell(0, 0);
    let change = engine.extend_selection(2, 2);
    assert!(change.contains(StateChange::SELECTION));
    assert_eq!(selection(&engine).bounds(), (0, 0, 2, 2));
}
