//! Scroll adjustments that bring a target cell fully into view.

use serde::{Deserialize, Serialize};

use super::{Dimensions, ScrollExtent, Viewport};

/// A scroll offset to move to. Not yet clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollTarget {
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Pixel rectangle of a cell in sheet coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellRect {
    pub fn of(row: u32, col: u32, dims: &Dimensions) -> Self {
        Self {
            x: dims.x_of(col),
            y: dims.y_of(row),
            width: dims.width_of(col),
            height: dims.height_of(row),
        }
    }
}

/// Minimal scroll that makes `(row, col)` fully visible, or `None` when it
/// already is.
///
/// A cell before the visible window aligns to the near edge; one past it
/// aligns to the far edge, unless the cell is larger than the window, in
/// which case it aligns to the near edge so repeated calls don't oscillate.
pub fn ensure_visible(
    row: u32,
    col: u32,
    viewport: &Viewport,
    extent: &ScrollExtent,
    dims: &Dimensions,
) -> Option<ScrollTarget> {
    let cell = CellRect::of(row, col, dims);
    let x = minimal_axis_scroll(viewport.scroll_x, extent.available_width, cell.x, cell.width);
    let y = minimal_axis_scroll(viewport.scroll_y, extent.available_height, cell.y, cell.height);
    if x.is_none() && y.is_none() {
        return None;
    }
    Some(ScrollTarget {
        scroll_x: x.unwrap_or(viewport.scroll_x),
        scroll_y: y.unwrap_or(viewport.scroll_y),
    })
}

fn minimal_axis_scroll(scroll: f64, available: f64, start: f64, size: f64) -> Option<f64> {
    let end = start + size;
    if start < scroll {
        Some(start)
    } else if end > scroll + available {
        if size > available {
            // Already at the near edge.
            (start > scroll).then_some(start)
        } else {
            Some(end - available)
        }
    } else {
        None
    }
}

/// Scroll position computed from scratch for a cell, used for large jumps
/// where the incremental [`ensure_visible`] may undershoot.
///
/// With `center`, the cell is centered on both axes. Otherwise axes where the
/// cell is already fully visible keep their offset and the rest put the cell
/// at the top/left edge.
pub fn calculate_scroll_for_cell(
    row: u32,
    col: u32,
    center: bool,
    viewport: &Viewport,
    extent: &ScrollExtent,
    dims: &Dimensions,
) -> ScrollTarget {
    let cell = CellRect::of(row, col, dims);
    if center {
        return ScrollTarget {
            scroll_x: cell.x + cell.width / 2.0 - extent.available_width / 2.0,
            scroll_y: cell.y + cell.height / 2.0 - extent.available_height / 2.0,
        };
    }
    let scroll_x = if axis_visible(viewport.scroll_x, extent.available_width, cell.x, cell.width) {
        viewport.scroll_x
    } else {
        cell.x
    };
    let scroll_y = if axis_visible(viewport.scroll_y, extent.available_height, cell.y, cell.height) {
        viewport.scroll_y
    } else {
        cell.y
    };
    ScrollTarget { scroll_x, scroll_y }
}

/// Whether `(row, col)` lies fully inside the visible window.
pub fn is_cell_visible(
    row: u32,
    col: u32,
    viewport: &Viewport,
    extent: &ScrollExtent,
    dims: &Dimensions,
) -> bool {
    let cell = CellRect::of(row, col, dims);
    axis_visible(viewport.scroll_x, extent.available_width, cell.x, cell.width)
        && axis_visible(viewport.scroll_y, extent.available_height, cell.y, cell.height)
}

fn axis_visible(scroll: f64, available: f64, start: f64, size: f64) -> bool {
    start >= scroll && start + size <= scroll + available
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

    fn extent() -> ScrollExtent {
        ScrollExtent {
            available_width: 800.0,
            available_height: 600.0,
            content_width: 10_000.0,
            content_height: 100_000.0,
            max_scroll_x: 9_200.0,
            max_scroll_y: 99_400.0,
        }
    }

    fn at(scroll_x: f64, scroll_y: f64) -> Viewport {
        Viewport {
            scroll_x,
            scroll_y,
            ..Viewport::default()
        }
    }

    #[test]
    fn test_visible_cell_needs_no_scroll() {
        let dims = Dimensions::new(100.0, 20.0);
        assert_eq!(ensure_visible(5, 3, &at(0.0, 0.0), &extent(), &dims), None);
    }

    #[test]
    fn test_cell_below_aligns_bottom_edge() {
        let dims = Dimensions::new(100.0, 20.0);
        let target = ensure_visible(30, 0, &at(0.0, 0.0), &extent(), &dims).unwrap();
        assert_eq!(target.scroll_y, 620.0 - 600.0);
        assert_eq!(target.scroll_x, 0.0);
    }

    #[test]
    fn test_cell_above_aligns_top_edge() {
        let dims = Dimensions::new(100.0, 20.0);
        let target = ensure_visible(10, 0, &at(0.0, 400.0), &extent(), &dims).unwrap();
        assert_eq!(target.scroll_y, 200.0);
    }

    #[test]
    fn test_oversized_cell_aligns_near_edge() {
        let mut dims = Dimensions::new(100.0, 20.0);
        dims.set_column_width(12, 2_000.0);
        let target = ensure_visible(0, 12, &at(0.0, 0.0), &extent(), &dims).unwrap();
        assert_eq!(target.scroll_x, 1_200.0);
        // Already aligned: the far edge is still out of view but we stay put.
        assert_eq!(ensure_visible(0, 12, &at(1_200.0, 0.0), &extent(), &dims), None);
    }

    #[test]
    fn test_forced_scroll_puts_cell_at_top() {
        let dims = Dimensions::new(100.0, 20.0);
        let target = calculate_scroll_for_cell(5_000, 2, false, &at(0.0, 0.0), &extent(), &dims);
        assert_eq!(target.scroll_y, 100_000.0);
        assert_eq!(target.scroll_x, 0.0);
    }

    #[test]
    fn test_forced_scroll_centered() {
        let dims = Dimensions::new(100.0, 20.0);
        let target = calculate_scroll_for_cell(100, 20, true, &at(0.0, 0.0), &extent(), &dims);
        assert_eq!(target.scroll_y, 2_010.0 - 300.0);
        assert_eq!(target.scroll_x, 2_050.0 - 400.0);
    }

    #[test]
    fn test_is_cell_visible() {
        let dims = Dimensions::new(100.0, 20.0);
        assert!(is_cell_visible(29, 7, &at(0.0, 0.0), &extent(), &dims));
        assert!(!is_cell_visible(30, 7, &at(0.0, 0.0), &extent(), &dims));
        assert!(!is_cell_visible(0, 8, &at(0.0, 0.0), &extent(), &dims));
    }
}
