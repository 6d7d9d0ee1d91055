use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

/// What a selection spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionKind {
    /// Standard cell selection (default)
    #[default]
    Cells,
    /// Entire row(s) selected
    Rows,
    /// Entire column(s) selected
    Columns,
}

/// A rectangle of cells. `start` and `end` may be in either order; use
/// [`CellRange::normalized`] for min/max corners.
///
/// Merged regions reported by the backend use the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// A 1x1 range.
    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row, col, row, col)
    }

    /// Same cells with `start <= end` on both axes.
    pub fn normalized(&self) -> Self {
        Self {
            start_row: self.start_row.min(self.end_row),
            start_col: self.start_col.min(self.end_col),
            end_row: self.start_row.max(self.end_row),
            end_col: self.start_col.max(self.end_col),
        }
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        let n = self.normalized();
        (n.start_row..=n.end_row).contains(&row) && (n.start_col..=n.end_col).contains(&col)
    }

    pub fn intersects(&self, other: &CellRange) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.start_row <= b.end_row
            && b.start_row <= a.end_row
            && a.start_col <= b.end_col
            && b.start_col <= a.end_col
    }

    /// Smallest normalized range covering both.
    pub fn union(&self, other: &CellRange) -> CellRange {
        let a = self.normalized();
        let b = other.normalized();
        CellRange {
            start_row: a.start_row.min(b.start_row),
            start_col: a.start_col.min(b.start_col),
            end_row: a.end_row.max(b.end_row),
            end_col: a.end_col.max(b.end_col),
        }
    }

    /// Clamp every corner into the grid.
    pub fn clamped(&self, grid: &GridConfig) -> Self {
        Self {
            start_row: self.start_row.min(grid.last_row()),
            start_col: self.start_col.min(grid.last_col()),
            end_row: self.end_row.min(grid.last_row()),
            end_col: self.end_col.min(grid.last_col()),
        }
    }
}

/// Selection state. `start_*` is the anchor, `end_*` the active cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
    pub kind: SelectionKind,
    /// Ranges accumulated by Ctrl-click, oldest first. Never scrolled into view.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_ranges: Vec<CellRange>,
}

impl Selection {
    /// A single-cell selection.
    pub fn cell(row: u32, col: u32) -> Self {
        Self::cell_range(row, col, row, col)
    }

    /// A cell range selection with anchor `(start_row, start_col)`.
    pub fn cell_range(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
            kind: SelectionKind::Cells,
            additional_ranges: Vec::new(),
        }
    }

    /// Whole rows from `start_row` to `end_row`.
    pub fn row_range(start_row: u32, end_row: u32, grid: &GridConfig) -> Self {
        Self {
            start_row: start_row.min(grid.last_row()),
            start_col: 0,
            end_row: end_row.min(grid.last_row()),
            end_col: grid.last_col(),
            kind: SelectionKind::Rows,
            additional_ranges: Vec::new(),
        }
    }

    /// Whole columns from `start_col` to `end_col`.
    pub fn column_range(start_col: u32, end_col: u32, grid: &GridConfig) -> Self {
        Self {
            start_row: 0,
            start_col: start_col.min(grid.last_col()),
            end_row: grid.last_row(),
            end_col: end_col.min(grid.last_col()),
            kind: SelectionKind::Columns,
            additional_ranges: Vec::new(),
        }
    }

    /// Every cell in the grid.
    pub fn all(grid: &GridConfig) -> Self {
        Self::cell_range(0, 0, grid.last_row(), grid.last_col())
    }

    /// Build a selection of `kind` from `range`, clamped into the grid with
    /// the row/column invariants applied.
    pub fn from_range(range: CellRange, kind: SelectionKind, grid: &GridConfig) -> Self {
        let r = range.clamped(grid);
        match kind {
            SelectionKind::Cells => Self::cell_range(r.start_row, r.start_col, r.end_row, r.end_col),
            SelectionKind::Rows => Self::row_range(r.start_row, r.end_row, grid),
            SelectionKind::Columns => Self::column_range(r.start_col, r.end_col, grid),
        }
    }

    /// The primary rectangle.
    pub fn range(&self) -> CellRange {
        CellRange::new(self.start_row, self.start_col, self.end_row, self.end_col)
    }

    /// Get normalized bounds (min_row, min_col, max_row, max_col)
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        let n = self.range().normalized();
        (n.start_row, n.start_col, n.end_row, n.end_col)
    }

    /// The active cell `(end_row, end_col)`.
    pub fn active_cell(&self) -> (u32, u32) {
        (self.end_row, self.end_col)
    }

    /// The cell keyboard navigation moves from. For whole rows this is the
    /// active row at the anchor column, for whole columns the anchor row of
    /// the active column.
    pub fn navigation_cell(&self) -> (u32, u32) {
        match self.kind {
            SelectionKind::Cells => (self.end_row, self.end_col),
            SelectionKind::Rows => (self.end_row, self.start_col),
            SelectionKind::Columns => (self.start_row, self.end_col),
        }
    }

    /// True when the primary rectangle covers the whole grid.
    pub fn is_full_grid(&self, grid: &GridConfig) -> bool {
        let (min_row, min_col, max_row, max_col) = self.bounds();
        min_row == 0 && min_col == 0 && max_row >= grid.last_row() && max_col >= grid.last_col()
    }

    /// Row, column and select-all selections never move the viewport.
    pub fn suppresses_scroll(&self, grid: &GridConfig) -> bool {
        match self.kind {
            SelectionKind::Rows | SelectionKind::Columns => true,
            SelectionKind::Cells => self.is_full_grid(grid),
        }
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

    fn grid() -> GridConfig {
        GridConfig {
            total_rows: 100,
            total_cols: 10,
            ..GridConfig::default()
        }
    }

    #[test]
    fn test_normalized_bounds() {
        let sel = Selection::cell_range(5, 4, 2, 1);
        assert_eq!(sel.bounds(), (2, 1, 5, 4));
        assert_eq!(sel.active_cell(), (2, 1));
    }

    #[test]
    fn test_row_range_spans_all_columns() {
        let sel = Selection::row_range(3, 7, &grid());
        assert_eq!(sel.start_col, 0);
        assert_eq!(sel.end_col, 9);
        assert!(sel.suppresses_scroll(&grid()));
        assert_eq!(sel.navigation_cell(), (7, 0));
    }

    #[test]
    fn test_column_range_clamps() {
        let sel = Selection::column_range(2, 500, &grid());
        assert_eq!(sel.end_col, 9);
        assert_eq!(sel.end_row, 99);
    }

    #[test]
    fn test_select_all_is_full_grid() {
        let g = grid();
        assert!(Selection::all(&g).is_full_grid(&g));
        assert!(!Selection::cell(0, 0).is_full_grid(&g));
        assert!(Selection::all(&g).suppresses_scroll(&g));
    }

    #[test]
    fn test_range_intersection_and_union() {
        let a = CellRange::new(0, 0, 2, 2);
        let b = CellRange::new(3, 3, 1, 1);
        assert!(a.intersects(&b));
        assert_eq!(a.union(&b), CellRange::new(0, 0, 3, 3));
        assert!(!a.intersects(&CellRange::cell(3, 0)));
        assert!(b.contains(2, 2));
    }
}
