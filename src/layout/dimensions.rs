//! Row heights and column widths over a conceptually unbounded grid.
//!
//! Only overridden rows/columns are stored. Every other index resolves to
//! the default size, so offsets are `index * default` plus the deltas of the
//! overrides before `index`: O(overrides), never O(grid).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::index_from_pixels;
use crate::config::GridConfig;
use crate::types::{DimensionEntry, DimensionType};

/// Sparse per-row/per-column size overrides plus the uniform defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    default_width: f64,
    default_height: f64,
    column_widths: BTreeMap<u32, f64>,
    row_heights: BTreeMap<u32, f64>,
}

impl Dimensions {
    /// Create a resolver with no overrides.
    pub fn new(default_width: f64, default_height: f64) -> Self {
        Self {
            default_width,
            default_height,
            column_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
        }
    }

    pub fn from_grid(grid: &GridConfig) -> Self {
        Self::new(grid.default_cell_width, grid.default_cell_height)
    }

    pub fn default_width(&self) -> f64 {
        self.default_width
    }

    pub fn default_height(&self) -> f64 {
        self.default_height
    }

    /// True when no row or column has an override.
    pub fn is_empty(&self) -> bool {
        self.column_widths.is_empty() && self.row_heights.is_empty()
    }

    pub fn column_widths(&self) -> &BTreeMap<u32, f64> {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    /// Get column width at index
    pub fn width_of(&self, col: u32) -> f64 {
        size_of(&self.column_widths, self.default_width, col)
    }

    /// Get row height at index
    pub fn height_of(&self, row: u32) -> f64 {
        size_of(&self.row_heights, self.default_height, row)
    }

    /// Left edge of `col` in sheet coordinates.
    pub fn x_of(&self, col: u32) -> f64 {
        offset_of(&self.column_widths, self.default_width, col)
    }

    /// Top edge of `row` in sheet coordinates.
    pub fn y_of(&self, row: u32) -> f64 {
        offset_of(&self.row_heights, self.default_height, row)
    }

    /// Column containing sheet x coordinate `x`. Negative x maps to 0.
    pub fn col_at_x(&self, x: f64) -> u32 {
        index_at(&self.column_widths, self.default_width, x)
    }

    /// Row containing sheet y coordinate `y`. Negative y maps to 0.
    pub fn row_at_y(&self, y: f64) -> u32 {
        index_at(&self.row_heights, self.default_height, y)
    }

    /// Set a column width; a non-positive or non-finite width removes the
    /// override. Returns the previous override, if any.
    pub fn set_column_width(&mut self, col: u32, width: f64) -> Option<f64> {
        set_size(&mut self.column_widths, col, width)
    }

    /// Set a row height; a non-positive or non-finite height removes the
    /// override. Returns the previous override, if any.
    pub fn set_row_height(&mut self, row: u32, height: f64) -> Option<f64> {
        set_size(&mut self.row_heights, row, height)
    }

    /// Apply one entry from the dimension store.
    pub fn apply(&mut self, entry: &DimensionEntry) -> Option<f64> {
        match entry.dimension_type {
            DimensionType::Column => self.set_column_width(entry.index, entry.size),
            DimensionType::Row => self.set_row_height(entry.index, entry.size),
        }
    }

    /// Replace all overrides. Invalid sizes are dropped.
    pub fn set_all(&mut self, column_widths: &BTreeMap<u32, f64>, row_heights: &BTreeMap<u32, f64>) {
        self.column_widths = valid_sizes(column_widths);
        self.row_heights = valid_sizes(row_heights);
    }

    /// Remove every override.
    pub fn clear(&mut self) {
        self.column_widths.clear();
        self.row_heights.clear();
    }

    /// All overrides as store entries, columns first.
    pub fn entries(&self) -> Vec<DimensionEntry> {
        self.column_widths
            .iter()
            .map(|(&index, &size)| DimensionEntry::column(index, size))
            .chain(
                self.row_heights
                    .iter()
                    .map(|(&index, &size)| DimensionEntry::row(index, size)),
            )
            .collect()
    }
}

fn is_valid_size(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

fn valid_sizes(sizes: &BTreeMap<u32, f64>) -> BTreeMap<u32, f64> {
    sizes
        .iter()
        .filter(|(_, &size)| is_valid_size(size))
        .map(|(&index, &size)| (index, size))
        .collect()
}

fn set_size(sizes: &mut BTreeMap<u32, f64>, index: u32, size: f64) -> Option<f64> {
    if is_valid_size(size) {
        sizes.insert(index, size)
    } else {
        sizes.remove(&index)
    }
}

fn size_of(sizes: &BTreeMap<u32, f64>, default: f64, index: u32) -> f64 {
    sizes.get(&index).copied().unwrap_or(default)
}

fn offset_of(sizes: &BTreeMap<u32, f64>, default: f64, index: u32) -> f64 {
    let base = f64::from(index) * default;
    if sizes.is_empty() {
        return base;
    }
    base + sizes
        .range(..index)
        .map(|(_, &size)| size - default)
        .sum::<f64>()
}

fn index_at(sizes: &BTreeMap<u32, f64>, default: f64, pos: f64) -> u32 {
    if !pos.is_finite() || pos <= 0.0 {
        return 0;
    }
    // Walk the overrides in order; each gap between them is a run of
    // default-sized cells.
    let mut next_index: u32 = 0;
    let mut edge = 0.0;
    for (&index, &size) in sizes {
        let run = f64::from(index - next_index) * default;
        if pos < edge + run {
            return next_index.saturating_add(index_from_pixels((pos - edge) / default));
        }
        edge += run;
        if pos < edge + size {
            return index;
        }
        edge += size;
        next_index = index.saturating_add(1);
    }
    next_index.saturating_add(index_from_pixels((pos - edge) / default))
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

    fn dims() -> Dimensions {
        Dimensions::new(100.0, 20.0)
    }

    #[test]
    fn test_uniform_offsets() {
        let d = dims();
        assert_eq!(d.x_of(0), 0.0);
        assert_eq!(d.x_of(7), 700.0);
        assert_eq!(d.y_of(500_000), 10_000_000.0);
        assert_eq!(d.width_of(3), 100.0);
    }

    #[test]
    fn test_offsets_with_overrides() {
        let mut d = dims();
        d.set_column_width(2, 250.0);
        d.set_column_width(5, 40.0);
        assert_eq!(d.x_of(2), 200.0);
        assert_eq!(d.x_of(3), 450.0);
        assert_eq!(d.x_of(6), 690.0);
        for col in 0..10 {
            assert_eq!(d.x_of(col + 1) - d.x_of(col), d.width_of(col));
        }
    }

    #[test]
    fn test_reset_removes_override() {
        let mut d = dims();
        d.set_row_height(4, 60.0);
        assert_eq!(d.set_row_height(4, 0.0), Some(60.0));
        assert!(d.is_empty());
        assert_eq!(d.height_of(4), 20.0);
        d.set_row_height(4, f64::NAN);
        assert!(d.row_heights().is_empty());
    }

    #[test]
    fn test_col_at_x_uniform() {
        let d = dims();
        assert_eq!(d.col_at_x(-5.0), 0);
        assert_eq!(d.col_at_x(0.0), 0);
        assert_eq!(d.col_at_x(99.9), 0);
        assert_eq!(d.col_at_x(100.0), 1);
        assert_eq!(d.col_at_x(250.0), 2);
    }

    #[test]
    fn test_col_at_x_with_overrides() {
        let mut d = dims();
        d.set_column_width(1, 300.0);
        // col 0: [0,100) col 1: [100,400) col 2: [400,500)
        assert_eq!(d.col_at_x(50.0), 0);
        assert_eq!(d.col_at_x(100.0), 1);
        assert_eq!(d.col_at_x(399.0), 1);
        assert_eq!(d.col_at_x(400.0), 2);
        assert_eq!(d.col_at_x(1000.0), 8);
    }

    #[test]
    fn test_set_all_drops_invalid_sizes() {
        let mut d = dims();
        let cols = BTreeMap::from([(0, 80.0), (1, -3.0)]);
        let rows = BTreeMap::from([(9, 45.0), (10, f64::INFINITY)]);
        d.set_all(&cols, &rows);
        assert_eq!(d.column_widths().len(), 1);
        assert_eq!(d.row_heights().len(), 1);
        assert_eq!(d.entries().len(), 2);
    }
}
