//! Column and row dimension tests for xlgrid
//!
//! Tests for sparse width/height overrides, offset and hit-test consistency,
//! resets to the default size, and edge cases at the far end of the grid.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use xlgrid::{Dimensions, DimensionEntry, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};

// ============================================================================
// Defaults and overrides
// ============================================================================

#[test]
fn test_default_sizes() {
    let dims = Dimensions::new(100.0, 20.0);
    assert_eq!(dims.width_of(0), 100.0);
    assert_eq!(dims.height_of(EXCEL_MAX_ROWS - 1), 20.0);
    assert_eq!(dims.x_of(10), 1_000.0);
    assert_eq!(dims.y_of(EXCEL_MAX_ROWS), 20_971_520.0);
}

#[test]
fn test_override_shifts_later_columns_only() {
    let mut dims = Dimensions::new(100.0, 20.0);
    dims.set_column_width(3, 250.0);
    assert_eq!(dims.x_of(3), 300.0);
    assert_eq!(dims.x_of(4), 550.0);
    assert_eq!(dims.x_of(EXCEL_MAX_COLS), f64::from(EXCEL_MAX_COLS) * 100.0 + 150.0);
}

#[test]
fn test_non_positive_size_resets_to_default() {
    let mut dims = Dimensions::new(100.0, 20.0);
    dims.set_row_height(7, 60.0);
    assert_eq!(dims.set_row_height(7, 0.0), Some(60.0));
    assert_eq!(dims.height_of(7), 20.0);
    dims.set_row_height(7, f64::NAN);
    assert!(dims.is_empty());
}

#[test]
fn test_set_all_drops_invalid_entries() {
    let mut dims = Dimensions::new(100.0, 20.0);
    dims.set_column_width(1, 10.0);
    let widths = BTreeMap::from([(2, 80.0), (3, -1.0), (4, f64::INFINITY)]);
    let heights = BTreeMap::from([(0, 40.0)]);
    dims.set_all(&widths, &heights);

    assert_eq!(dims.column_widths(), &BTreeMap::from([(2, 80.0)]));
    assert_eq!(dims.width_of(1), 100.0, "Previous overrides are replaced");
    assert_eq!(dims.height_of(0), 40.0);
}

#[test]
fn test_entries_and_apply_round_trip() {
    let mut dims = Dimensions::new(100.0, 20.0);
    dims.set_column_width(5, 75.0);
    dims.set_row_height(2, 33.0);
    let entries = dims.entries();
    assert_eq!(
        entries,
        vec![DimensionEntry::column(5, 75.0), DimensionEntry::row(2, 33.0)]
    );

    let mut restored = Dimensions::new(100.0, 20.0);
    for entry in &entries {
        restored.apply(entry);
    }
    assert_eq!(restored, dims);
}

// ============================================================================
// Hit testing
// ============================================================================

#[test]
fn test_hit_test_across_override() {
    let mut dims = Dimensions::new(100.0, 20.0);
    dims.set_column_width(1, 300.0);
    assert_eq!(dims.col_at_x(99.9), 0);
    assert_eq!(dims.col_at_x(100.0), 1);
    assert_eq!(dims.col_at_x(399.9), 1);
    assert_eq!(dims.col_at_x(400.0), 2);
    assert_eq!(dims.col_at_x(-5.0), 0);
}

#[test]
fn test_hit_test_far_down() {
    let mut dims = Dimensions::new(100.0, 20.0);
    dims.set_row_height(0, 40.0);
    assert_eq!(dims.row_at_y(20.0 * 900_000.0 + 20.0), 900_000);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_overrides() -> impl Strategy<Value = BTreeMap<u32, f64>> {
    prop::collection::btree_map(0u32..2_000, (1u32..400).prop_map(f64::from), 0..40)
}

proptest! {
    #[test]
    fn prop_offsets_accumulate_sizes(widths in arb_overrides(), col in 0u32..2_100) {
        let mut dims = Dimensions::new(100.0, 20.0);
        dims.set_all(&widths, &BTreeMap::new());
        prop_assert_eq!(dims.x_of(col + 1) - dims.x_of(col), dims.width_of(col));
    }

    #[test]
    fn prop_hit_test_inverts_offset(heights in arb_overrides(), row in 0u32..2_100) {
        let mut dims = Dimensions::new(100.0, 20.0);
        dims.set_all(&BTreeMap::new(), &heights);
        prop_assert_eq!(dims.row_at_y(dims.y_of(row)), row);
        let inside = dims.y_of(row) + dims.height_of(row) - 0.5;
        prop_assert_eq!(dims.row_at_y(inside), row);
    }
}
