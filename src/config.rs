//! Engine configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so a host only has to
//! spell out the fields it wants to change. [`EngineConfig::from_json`]
//! validates the result before handing it to the engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XlgridError};

/// Excel's row limit.
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;

/// Excel's column limit (XFD).
pub const EXCEL_MAX_COLS: u32 = 16_384;

/// Fixed grid geometry for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Hard ceiling on addressable rows
    pub total_rows: u32,
    /// Hard ceiling on addressable columns
    pub total_cols: u32,
    /// Width of a column without an override, in pixels
    pub default_cell_width: f64,
    /// Height of a row without an override, in pixels
    pub default_cell_height: f64,
    /// Width of the row header gutter on the left
    pub row_header_width: f64,
    /// Height of the column header band on top
    pub col_header_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            total_rows: EXCEL_MAX_ROWS,
            total_cols: EXCEL_MAX_COLS,
            default_cell_width: 100.0,
            default_cell_height: 24.0,
            row_header_width: 50.0,
            col_header_height: 24.0,
        }
    }
}

impl GridConfig {
    /// Last valid row index.
    pub fn last_row(&self) -> u32 {
        self.total_rows.saturating_sub(1)
    }

    /// Last valid column index.
    pub fn last_col(&self) -> u32 {
        self.total_cols.saturating_sub(1)
    }
}

/// How the virtual bounds grow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpansionConfig {
    /// Expand once a target lands within this many cells of the bound
    pub expansion_threshold: u32,
    /// Rows added beyond the target when expanding
    pub row_buffer: u32,
    /// Columns added beyond the target when expanding
    pub col_buffer: u32,
    /// `max_row` of a fresh document
    pub initial_max_row: u32,
    /// `max_col` of a fresh document
    pub initial_max_col: u32,
    /// Distance in pixels from the maximum scroll offset that still counts
    /// as "scrolled to the end". Absorbs fractional rounding from the host.
    pub max_scroll_tolerance: f64,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            expansion_threshold: 10,
            row_buffer: 50,
            col_buffer: 20,
            initial_max_row: 199,
            initial_max_col: 51,
            max_scroll_tolerance: 2.0,
        }
    }
}

/// Scrollbar geometry and used-range behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollbarConfig {
    /// Thickness of each scrollbar track, in pixels
    pub thickness: f64,
    /// Smallest thumb the host can still grab
    pub min_thumb_size: f64,
    /// Rows of slack below the used range
    pub row_buffer: u32,
    /// Columns of slack right of the used range
    pub col_buffer: u32,
    /// How often the host should poll the used range
    pub used_range_poll_ms: u64,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            thickness: 14.0,
            min_thumb_size: 30.0,
            row_buffer: 10,
            col_buffer: 5,
            used_range_poll_ms: 2000,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub grid: GridConfig,
    pub expansion: ExpansionConfig,
    pub scrollbar: ScrollbarConfig,
    /// Cap on ranges accumulated by multi-range selection. The oldest range
    /// is dropped once the cap is reached.
    pub max_additional_ranges: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            expansion: ExpansionConfig::default(),
            scrollbar: ScrollbarConfig::default(),
            max_additional_ranges: 64,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every size is positive and finite and that the initial
    /// bounds fit inside the grid.
    ///
    /// # Errors
    /// Returns [`XlgridError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        if grid.total_rows == 0 {
            return Err(XlgridError::Config("totalRows must be at least 1".into()));
        }
        if grid.total_cols == 0 {
            return Err(XlgridError::Config("totalCols must be at least 1".into()));
        }
        check_positive("defaultCellWidth", grid.default_cell_width)?;
        check_positive("defaultCellHeight", grid.default_cell_height)?;
        check_positive("rowHeaderWidth", grid.row_header_width)?;
        check_positive("colHeaderHeight", grid.col_header_height)?;
        check_positive("scrollbar.thickness", self.scrollbar.thickness)?;
        check_positive("scrollbar.minThumbSize", self.scrollbar.min_thumb_size)?;

        let tolerance = self.expansion.max_scroll_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(XlgridError::Config(format!(
                "expansion.maxScrollTolerance must be finite and >= 0, got {tolerance}"
            )));
        }
        if self.expansion.initial_max_row >= grid.total_rows {
            return Err(XlgridError::Config(format!(
                "expansion.initialMaxRow {} exceeds last row {}",
                self.expansion.initial_max_row,
                grid.last_row()
            )));
        }
        if self.expansion.initial_max_col >= grid.total_cols {
            return Err(XlgridError::Config(format!(
                "expansion.initialMaxCol {} exceeds last column {}",
                self.expansion.initial_max_col,
                grid.last_col()
            )));
        }
        Ok(())
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(XlgridError::Config(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{"grid": {"defaultCellWidth": 64.0}, "maxAdditionalRanges": 8}"#,
        )
        .unwrap();
        assert_eq!(config.grid.default_cell_width, 64.0);
        assert_eq!(config.grid.default_cell_height, 24.0);
        assert_eq!(config.grid.total_rows, EXCEL_MAX_ROWS);
        assert_eq!(config.max_additional_ranges, 8);
    }

    #[test]
    fn test_rejects_zero_cell_height() {
        let err = EngineConfig::from_json(r#"{"grid": {"defaultCellHeight": 0}}"#).unwrap_err();
        assert!(matches!(err, XlgridError::Config(_)));
        assert!(err.to_string().contains("defaultCellHeight"));
    }

    #[test]
    fn test_rejects_initial_bounds_outside_grid() {
        let mut config = EngineConfig::default();
        config.grid.total_rows = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, XlgridError::Json(_)));
    }
}
