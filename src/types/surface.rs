use serde::{Deserialize, Serialize};

/// Size of the host's rendering surface, headers and scrollbars included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportDimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportDimensions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl ViewportDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A surface with no usable area. Scroll math collapses to a fixed
    /// 1px-content, no-scrollbar result until the host sends a real size.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Bottom-right corner of the cells that actually hold data, as reported by
/// the backend. 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedRange {
    pub max_row: u32,
    pub max_col: u32,
}

impl UsedRange {
    /// Convert the backend's `{rowCount, colCount}` into max indices.
    pub fn from_counts(row_count: u32, col_count: u32) -> Self {
        Self {
            max_row: row_count.saturating_sub(1),
            max_col: col_count.saturating_sub(1),
        }
    }
}
