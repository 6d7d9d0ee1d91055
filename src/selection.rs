//! Selection transitions.
//!
//! Every function here is pure: it takes the current selection and returns
//! the replacement, already clamped into the grid. Scrolling and bounds
//! expansion are the engine's concern.

use crate::config::GridConfig;
use crate::types::{CellRange, Selection, SelectionKind};

/// Upper bound on merge-union passes. Overlapping or cyclic region data
/// from the backend cannot spin forever.
pub const MERGE_EXPANSION_MAX_ITERATIONS: usize = 32;

/// Clamp a signed coordinate into `[0, total)`.
pub fn clamp_index(value: i64, total: u32) -> u32 {
    let last = i64::from(total.saturating_sub(1));
    u32::try_from(value.clamp(0, last)).unwrap_or(0)
}

/// Offset `index` by `delta`, clamped into `[0, total)`.
pub fn offset_index(index: u32, delta: i64, total: u32) -> u32 {
    clamp_index(i64::from(index).saturating_add(delta), total)
}

/// Replace the selection with `range` of `kind`.
pub fn set_selection(range: CellRange, kind: SelectionKind, grid: &GridConfig) -> Selection {
    Selection::from_range(range, kind, grid)
}

/// Keep the anchor and move the active cell to `(row, col)`.
///
/// Whole-row and whole-column selections stay whole: only the axis they
/// range over follows the target.
pub fn extend_selection(current: &Selection, row: u32, col: u32, grid: &GridConfig) -> Selection {
    let mut next = match current.kind {
        SelectionKind::Cells => Selection::cell_range(
            current.start_row.min(grid.last_row()),
            current.start_col.min(grid.last_col()),
            row.min(grid.last_row()),
            col.min(grid.last_col()),
        ),
        SelectionKind::Rows => Selection::row_range(current.start_row, row, grid),
        SelectionKind::Columns => Selection::column_range(current.start_col, col, grid),
    };
    next.additional_ranges.clone_from(&current.additional_ranges);
    next
}

/// Move the active cell by a delta. Without `extend` the selection collapses
/// to the new cell; with it the anchor stays and the range grows or shrinks.
pub fn move_selection(
    current: Option<&Selection>,
    delta_row: i64,
    delta_col: i64,
    extend: bool,
    grid: &GridConfig,
) -> Selection {
    let (row, col) = current.map_or((0, 0), Selection::navigation_cell);
    let row = offset_index(row, delta_row, grid.total_rows);
    let col = offset_index(col, delta_col, grid.total_cols);
    match current {
        Some(sel) if extend => {
            let mut next = Selection::cell_range(sel.start_row, sel.start_col, row, col);
            next.additional_ranges.clone_from(&sel.additional_ranges);
            next
        }
        _ => Selection::cell(row, col),
    }
}

/// Select a whole row. With `extend`, the range runs from the current anchor
/// row.
pub fn select_row(current: Option<&Selection>, row: u32, extend: bool, grid: &GridConfig) -> Selection {
    match current {
        Some(sel) if extend => Selection::row_range(sel.start_row, row, grid),
        _ => Selection::row_range(row, row, grid),
    }
}

/// Select a whole column. With `extend`, the range runs from the current
/// anchor column.
pub fn select_column(
    current: Option<&Selection>,
    col: u32,
    extend: bool,
    grid: &GridConfig,
) -> Selection {
    match current {
        Some(sel) if extend => Selection::column_range(sel.start_col, col, grid),
        _ => Selection::column_range(col, col, grid),
    }
}

/// Ctrl-click: push the current primary rectangle onto the additional ranges
/// and make `range` the new primary. Keeps at most `cap` additional ranges,
/// dropping the oldest.
pub fn add_range(
    current: Option<&Selection>,
    range: CellRange,
    cap: usize,
    grid: &GridConfig,
) -> Selection {
    let r = range.clamped(grid);
    let mut next = Selection::cell_range(r.start_row, r.start_col, r.end_row, r.end_col);
    if let Some(sel) = current {
        let mut ranges = sel.additional_ranges.clone();
        ranges.push(sel.range());
        let excess = ranges.len().saturating_sub(cap);
        ranges.drain(..excess);
        next.additional_ranges = ranges;
    }
    next
}

/// Grow `range` until no merged region crosses its edge.
pub fn expand_to_merges(range: CellRange, merges: &[CellRange]) -> CellRange {
    let mut rect = range.normalized();
    for _ in 0..MERGE_EXPANSION_MAX_ITERATIONS {
        let grown = merges
            .iter()
            .filter(|m| rect.intersects(m))
            .fold(rect, |acc, m| acc.union(m));
        if grown == rect {
            break;
        }
        rect = grown;
    }
    rect
}

/// [`extend_selection`] that also swallows every merged region the range
/// touches. The corner the drag started from stays the anchor.
pub fn extend_with_merges(
    current: &Selection,
    row: u32,
    col: u32,
    merges: &[CellRange],
    grid: &GridConfig,
) -> Selection {
    if current.kind != SelectionKind::Cells || merges.is_empty() {
        return extend_selection(current, row, col, grid);
    }
    let row = row.min(grid.last_row());
    let col = col.min(grid.last_col());
    let rect = expand_to_merges(
        CellRange::new(current.start_row, current.start_col, row, col),
        merges,
    )
    .clamped(grid);

    let (start_row, end_row) = if row >= current.start_row {
        (rect.start_row, rect.end_row)
    } else {
        (rect.end_row, rect.start_row)
    };
    let (start_col, end_col) = if col >= current.start_col {
        (rect.start_col, rect.end_col)
    } else {
        (rect.end_col, rect.start_col)
    };
    let mut next = Selection::cell_range(start_row, start_col, end_row, end_col);
    next.additional_ranges.clone_from(&current.additional_ranges);
    next
}

/// Shift+Arrow over merged cells.
///
/// When the moved corner lands inside a merge the selection already covers,
/// the corner steps past the merge in the direction of travel so the range
/// can shrink. Without that step the union pass would absorb the merge again
/// and the selection could never contract.
pub fn move_with_merges(
    current: &Selection,
    delta_row: i64,
    delta_col: i64,
    merges: &[CellRange],
    grid: &GridConfig,
) -> Selection {
    let moved = move_selection(Some(current), delta_row, delta_col, true, grid);
    let (mut row, mut col) = (moved.end_row, moved.end_col);
    if current.kind == SelectionKind::Cells {
        let (top, left, bottom, right) = current.bounds();
        let (anchor_row, anchor_col) = (current.start_row, current.start_col);
        let covered = merges.iter().map(CellRange::normalized).find(|m| {
            m.contains(row, col)
                && !m.contains(anchor_row, anchor_col)
                && m.start_row >= top
                && m.end_row <= bottom
                && m.start_col >= left
                && m.end_col <= right
        });
        if let Some(m) = covered {
            row = step_past(row, delta_row, m.start_row, m.end_row, anchor_row);
            col = step_past(col, delta_col, m.start_col, m.end_col, anchor_col);
        }
    }
    extend_with_merges(current, row, col, merges, grid)
}

/// Leave `[start, end]` on the anchor's side, never crossing the anchor.
fn step_past(index: u32, delta: i64, start: u32, end: u32, anchor: u32) -> u32 {
    if delta < 0 && start > anchor {
        start - 1
    } else if delta > 0 && end < anchor {
        end + 1
    } else {
        index
    }
}

/// A click on a merged cell selects the whole region, anchored at its
/// top-left corner.
pub fn snap_to_merge(selection: Selection, merges: &[CellRange]) -> Selection {
    if selection.kind != SelectionKind::Cells
        || selection.start_row != selection.end_row
        || selection.start_col != selection.end_col
    {
        return selection;
    }
    match merges
        .iter()
        .find(|m| m.contains(selection.start_row, selection.start_col))
    {
        Some(m) => {
            let m = m.normalized();
            Selection {
                additional_ranges: selection.additional_ranges,
                ..Selection::cell_range(m.start_row, m.start_col, m.end_row, m.end_col)
            }
        }
        None => selection,
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
            total_rows: 1_000,
            total_cols: 50,
            ..GridConfig::default()
        }
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-5, 10), 0);
        assert_eq!(clamp_index(4, 10), 4);
        assert_eq!(clamp_index(i64::MAX, 10), 9);
        assert_eq!(offset_index(3, -10, 10), 0);
    }

    #[test]
    fn test_move_collapses_without_extend() {
        let sel = Selection::cell_range(2, 2, 5, 5);
        let next = move_selection(Some(&sel), 1, -1, false, &grid());
        assert_eq!(next, Selection::cell(6, 4));
    }

    #[test]
    fn test_move_with_extend_keeps_anchor() {
        let sel = Selection::cell_range(2, 2, 5, 5);
        let next = move_selection(Some(&sel), -4, 0, true, &grid());
        assert_eq!((next.start_row, next.start_col), (2, 2));
        assert_eq!(next.active_cell(), (1, 5));
    }

    #[test]
    fn test_move_from_row_selection_yields_cells() {
        let sel = Selection::row_range(7, 7, &grid());
        let next = move_selection(Some(&sel), 1, 0, false, &grid());
        assert_eq!(next, Selection::cell(8, 0));
    }

    #[test]
    fn test_move_clamps_at_grid_edge() {
        let sel = Selection::cell(999, 49);
        let next = move_selection(Some(&sel), 5, 5, false, &grid());
        assert_eq!(next.active_cell(), (999, 49));
    }

    #[test]
    fn test_extend_row_selection_stays_rows() {
        let sel = Selection::row_range(3, 3, &grid());
        let next = extend_selection(&sel, 9, 4, &grid());
        assert_eq!(next.kind, SelectionKind::Rows);
        assert_eq!((next.start_row, next.end_row), (3, 9));
        assert_eq!(next.end_col, 49);
    }

    #[test]
    fn test_select_column_extend_from_anchor() {
        let sel = Selection::cell(4, 2);
        let next = select_column(Some(&sel), 6, true, &grid());
        assert_eq!((next.start_col, next.end_col), (2, 6));
        assert_eq!((next.start_row, next.end_row), (0, 999));
    }

    #[test]
    fn test_add_range_caps_history() {
        let g = grid();
        let mut sel = Selection::cell(0, 0);
        for i in 1..=5 {
            sel = add_range(Some(&sel), CellRange::cell(i, i), 3, &g);
        }
        assert_eq!(sel.active_cell(), (5, 5));
        assert_eq!(
            sel.additional_ranges,
            vec![CellRange::cell(2, 2), CellRange::cell(3, 3), CellRange::cell(4, 4)]
        );
    }

    #[test]
    fn test_merge_expansion_reaches_fixed_point() {
        let merges = [CellRange::new(1, 1, 3, 3), CellRange::new(3, 4, 6, 4)];
        let rect = expand_to_merges(CellRange::new(0, 0, 2, 2), &merges);
        assert_eq!(rect, CellRange::new(0, 0, 3, 3));
        let rect = expand_to_merges(CellRange::new(0, 0, 2, 4), &merges);
        assert_eq!(rect, CellRange::new(0, 0, 6, 4));
    }

    #[test]
    fn test_extend_with_merges_forward() {
        let merges = [CellRange::new(1, 1, 3, 3)];
        let sel = Selection::cell(0, 0);
        let next = extend_with_merges(&sel, 2, 2, &merges, &grid());
        assert_eq!((next.start_row, next.start_col), (0, 0));
        assert_eq!(next.active_cell(), (3, 3));
    }

    #[test]
    fn test_extend_with_merges_backward_keeps_anchor_corner() {
        let merges = [CellRange::new(1, 1, 3, 3)];
        let sel = Selection::cell(5, 5);
        let next = extend_with_merges(&sel, 2, 2, &merges, &grid());
        assert_eq!((next.start_row, next.start_col), (5, 5));
        assert_eq!(next.active_cell(), (1, 1));
    }

    #[test]
    fn test_move_with_merges_shrinks_past_covered_merge() {
        let merges = [CellRange::new(1, 1, 3, 3)];
        let g = grid();
        let sel = extend_with_merges(&Selection::cell(0, 0), 2, 2, &merges, &g);
        assert_eq!(sel.bounds(), (0, 0, 3, 3));

        let up = move_with_merges(&sel, -1, 0, &merges, &g);
        assert_eq!(up.bounds(), (0, 0, 0, 3));
        assert_eq!((up.start_row, up.start_col), (0, 0));

        let left = move_with_merges(&sel, 0, -1, &merges, &g);
        assert_eq!(left.bounds(), (0, 0, 3, 0));
    }

    #[test]
    fn test_move_with_merges_shrinks_toward_bottom_anchor() {
        let merges = [CellRange::new(1, 1, 3, 3)];
        let g = grid();
        let sel = extend_with_merges(&Selection::cell(5, 5), 2, 2, &merges, &g);
        assert_eq!(sel.active_cell(), (1, 1));

        let down = move_with_merges(&sel, 1, 0, &merges, &g);
        assert_eq!(down.bounds(), (4, 1, 5, 5));
        assert_eq!((down.start_row, down.start_col), (5, 5));
    }

    #[test]
    fn test_move_with_merges_keeps_merge_holding_anchor() {
        let merges = [CellRange::new(1, 1, 3, 3)];
        let g = grid();
        let sel = snap_to_merge(Selection::cell(2, 2), &merges);
        let up = move_with_merges(&sel, -1, 0, &merges, &g);
        assert_eq!(up.bounds(), (1, 1, 3, 3));
    }

    #[test]
    fn test_move_with_merges_grows_into_new_merge() {
        let merges = [CellRange::new(2, 0, 2, 4)];
        let next = move_with_merges(&Selection::cell(1, 1), 1, 0, &merges, &grid());
        assert_eq!(next.bounds(), (1, 0, 2, 4));
    }

    #[test]
    fn test_snap_to_merge() {
        let merges = [CellRange::new(4, 4, 6, 8)];
        let sel = snap_to_merge(Selection::cell(5, 5), &merges);
        assert_eq!(sel.bounds(), (4, 4, 6, 8));
        assert_eq!((sel.start_row, sel.start_col), (4, 4));
        let untouched = snap_to_merge(Selection::cell(0, 0), &merges);
        assert_eq!(untouched, Selection::cell(0, 0));
    }
}
