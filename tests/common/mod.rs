//! Common test utilities and assertion helpers.
//!
//! Engine builders with round numbers: 100x20 cells and a surface whose
//! cell area is exactly 800x600 once headers and scrollbars are taken off.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use xlgrid::{EngineConfig, GridEngine, GridState};

/// Surface width: 50px row header + 800px cells + 14px scrollbar.
pub const SURFACE_WIDTH: f64 = 864.0;

/// Surface height: 24px column header + 600px cells + 14px scrollbar.
pub const SURFACE_HEIGHT: f64 = 638.0;

pub const CELL_WIDTH: f64 = 100.0;
pub const CELL_HEIGHT: f64 = 20.0;

/// Default config with 100x20 cells.
#[must_use]
pub fn config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.grid.default_cell_width = CELL_WIDTH;
    config.grid.default_cell_height = CELL_HEIGHT;
    config
}

/// Config for a grid smaller than the initial bounds.
#[must_use]
pub fn small_config(total_rows: u32, total_cols: u32) -> EngineConfig {
    let mut config = config();
    config.grid.total_rows = total_rows;
    config.grid.total_cols = total_cols;
    config.expansion.initial_max_row = config.expansion.initial_max_row.min(total_rows - 1);
    config.expansion.initial_max_col = config.expansion.initial_max_col.min(total_cols - 1);
    config
}

/// Engine with an 800x600 cell area.
#[must_use]
pub fn engine() -> GridEngine {
    engine_with(config())
}

#[must_use]
pub fn engine_with(config: EngineConfig) -> GridEngine {
    let mut engine = GridEngine::new(config).expect("valid config");
    engine.set_viewport_dimensions(SURFACE_WIDTH, SURFACE_HEIGHT);
    engine
}

/// Assert that a cell lies fully inside the cell area.
pub fn assert_cell_visible(state: &GridState, row: u32, col: u32) {
    let extent = state.scroll_extent();
    let dims = &state.dimensions;
    let (x, y) = (dims.x_of(col), dims.y_of(row));
    let (scroll_x, scroll_y) = (state.viewport.scroll_x, state.viewport.scroll_y);
    assert!(
        state.is_cell_visible(row, col),
        "cell ({row}, {col}) at ({x}, {y}) not visible from scroll ({scroll_x}, {scroll_y}) \
         with a {}x{} cell area",
        extent.available_width,
        extent.available_height
    );
}

/// Assert that the viewport's scroll offsets are inside `[0, max]`.
pub fn assert_scroll_in_range(state: &GridState) {
    let extent = state.scroll_extent();
    let v = &state.viewport;
    assert!(
        (0.0..=extent.max_scroll_x).contains(&v.scroll_x),
        "scroll_x {} outside [0, {}]",
        v.scroll_x,
        extent.max_scroll_x
    );
    assert!(
        (0.0..=extent.max_scroll_y).contains(&v.scroll_y),
        "scroll_y {} outside [0, {}]",
        v.scroll_y,
        extent.max_scroll_y
    );
}
