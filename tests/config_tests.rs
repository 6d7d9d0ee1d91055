//! Engine configuration tests
//!
//! JSON loading with partial overrides and validation of bad values.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use test_case::test_case;
use xlgrid::{EngineConfig, GridEngine, XlgridError, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};

#[test]
fn test_empty_json_is_default() {
    let config = EngineConfig::from_json("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.grid.total_rows, EXCEL_MAX_ROWS);
    assert_eq!(config.grid.total_cols, EXCEL_MAX_COLS);
    assert_eq!(config.expansion.max_scroll_tolerance, 2.0);
}

#[test]
fn test_partial_override() {
    let config = EngineConfig::from_json(
        r#"{"grid": {"defaultCellHeight": 20}, "expansion": {"rowBuffer": 100}, "maxAdditionalRanges": 8}"#,
    )
    .unwrap();
    assert_eq!(config.grid.default_cell_height, 20.0);
    assert_eq!(config.grid.default_cell_width, 100.0);
    assert_eq!(config.expansion.row_buffer, 100);
    assert_eq!(config.expansion.col_buffer, 20);
    assert_eq!(config.max_additional_ranges, 8);
}

#[test]
fn test_overridden_buffer_drives_expansion() {
    let config = EngineConfig::from_json(r#"{"expansion": {"rowBuffer": 1000}}"#).unwrap();
    let mut engine = GridEngine::new(config).unwrap();
    engine.scroll_to_cell(10_000, 0, false);
    assert_eq!(engine.state().virtual_bounds.max_row, 11_000);
}

#[test_case(r#"{"grid": {"totalRows": 0}}"# ; "zero rows")]
#[test_case(r#"{"grid": {"totalCols": 0}}"# ; "zero cols")]
#[test_case(r#"{"grid": {"defaultCellWidth": 0}}"# ; "zero width")]
#[test_case(r#"{"grid": {"defaultCellHeight": -4}}"# ; "negative height")]
#[test_case(r#"{"scrollbar": {"minThumbSize": 0}}"# ; "zero thumb")]
#[test_case(r#"{"expansion": {"maxScrollTolerance": -1}}"# ; "negative tolerance")]
#[test_case(r#"{"grid": {"totalRows": 100}}"# ; "initial bounds outside grid")]
fn test_invalid_config_rejected(json: &str) {
    let err = EngineConfig::from_json(json).unwrap_err();
    assert!(matches!(err, XlgridError::Config(_)), "got {err:?}");
}

#[test]
fn test_malformed_json_rejected() {
    let err = EngineConfig::from_json("{grid:").unwrap_err();
    assert!(matches!(err, XlgridError::Json(_)), "got {err:?}");
}

#[test]
fn test_engine_rejects_invalid_config() {
    let mut config = EngineConfig::default();
    config.grid.row_header_width = f64::NAN;
    let err = GridEngine::new(config).unwrap_err();
    assert!(err.to_string().contains("rowHeaderWidth"), "got {err}");
}

#[test]
fn test_config_round_trips_through_json() {
    let mut config = EngineConfig::default();
    config.scrollbar.used_range_poll_ms = 500;
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"usedRangePollMs\":500"));
    assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
}
