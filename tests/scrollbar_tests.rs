//! Scrollbar metrics tests
//!
//! Thumb size and position for bounds-driven and used-range-driven content.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{engine, engine_with, small_config};
use xlgrid::Intent;

#[test]
fn test_thumb_from_virtual_bounds() {
    let engine = engine();
    let bar = engine.scrollbars().vertical;

    assert!(bar.visible);
    assert_eq!(bar.content_size, 4_000.0);
    assert_eq!(bar.track_size, 600.0);
    assert_eq!(bar.thumb_size, 90.0, "600 / 4000 of a 600px track");
    assert_eq!(bar.thumb_position, 0.0);
    assert_eq!(bar.max_scroll, 3_400.0);
}

#[test]
fn test_thumb_at_end_of_track() {
    let mut engine = engine();
    engine.scroll_to_position(0.0, 1e9);
    let bar = engine.scrollbars().vertical;
    assert_eq!(bar.thumb_position, bar.track_size - bar.thumb_size);
}

#[test]
fn test_thumb_drag_round_trip() {
    let mut engine = engine();
    let bar = engine.scrollbars().vertical;
    let target = bar.scroll_for_thumb(255.0);
    assert_eq!(target, 1_700.0);

    engine.scroll_to_position(0.0, target);
    let bar = engine.scrollbars().vertical;
    assert_eq!(engine.state().viewport.scroll_y, 1_700.0);
    assert_eq!(bar.thumb_position, 255.0);
}

#[test]
fn test_thumb_never_below_minimum() {
    let mut engine = engine();
    engine.scroll_to_cell(1_000_000, 0, false);
    let bar = engine.scrollbars().vertical;
    assert_eq!(bar.thumb_size, engine.config().scrollbar.min_thumb_size);
    assert!(bar.thumb_position <= bar.track_size - bar.thumb_size);
}

#[test]
fn test_small_grid_hides_bars() {
    let engine = engine_with(small_config(10, 4));
    let bars = engine.scrollbars();
    assert!(!bars.vertical.visible);
    assert!(!bars.horizontal.visible);
    assert_eq!(bars.vertical.thumb_size, bars.vertical.track_size);
}

#[test]
fn test_horizontal_used_range() {
    let mut engine = engine();
    engine.dispatch(Intent::SetUsedRange {
        row_count: 11,
        col_count: 6,
    });
    let bar = engine.scrollbars().horizontal;
    // max(5, 0 + 9) + 5 -> columns 0..=14
    assert_eq!(bar.content_size, 1_500.0);
    assert!(bar.visible);
}

#[test]
fn test_large_used_range_dominates() {
    let mut engine = engine();
    engine.dispatch(Intent::SetUsedRange {
        row_count: 5_000,
        col_count: 2,
    });
    let bar = engine.scrollbars().vertical;
    // Rows 0..=5009
    assert_eq!(bar.content_size, 5_010.0 * 20.0);
}

#[test]
fn test_used_range_capped_at_grid_end() {
    let mut engine = engine_with(small_config(100, 10));
    engine.dispatch(Intent::SetUsedRange {
        row_count: 100,
        col_count: 10,
    });
    let bar = engine.scrollbars().vertical;
    assert_eq!(bar.content_size, 2_000.0);
}

#[test]
fn test_thicker_scrollbar_shrinks_track() {
    let mut config = common::config();
    config.scrollbar.thickness = 34.0;
    let engine = engine_with(config);
    let bars = engine.scrollbars();
    assert_eq!(bars.vertical.track_size, 580.0);
    assert_eq!(bars.horizontal.track_size, 780.0);
}
