//! Scroll offsets, scroll limits and the visible cell window.

use serde::{Deserialize, Serialize};

use super::{index_from_pixels, Dimensions, VirtualBounds};
use crate::config::{EngineConfig, GridConfig};
use crate::types::ViewportDimensions;

/// Viewport state - the visible window into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Horizontal scroll position in sheet coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in sheet coordinates
    pub scroll_y: f64,
    /// First fully or partially visible row
    pub start_row: u32,
    /// First fully or partially visible column
    pub start_col: u32,
    /// Rows drawn, including one for partial overdraw
    pub row_count: u32,
    /// Columns drawn, including one for partial overdraw
    pub col_count: u32,
}

/// Fixed-size decorations around the cell area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chrome {
    pub row_header_width: f64,
    pub col_header_height: f64,
    pub scrollbar_thickness: f64,
}

impl Chrome {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            row_header_width: config.grid.row_header_width,
            col_header_height: config.grid.col_header_height,
            scrollbar_thickness: config.scrollbar.thickness,
        }
    }

    /// Cell area left after headers and scrollbars, never negative.
    pub fn available(&self, view: &ViewportDimensions) -> (f64, f64) {
        if view.is_degenerate() {
            return (0.0, 0.0);
        }
        (
            (view.width - self.row_header_width - self.scrollbar_thickness).max(0.0),
            (view.height - self.col_header_height - self.scrollbar_thickness).max(0.0),
        )
    }
}

/// Content size and scroll limits implied by the virtual bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollExtent {
    pub available_width: f64,
    pub available_height: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub max_scroll_x: f64,
    pub max_scroll_y: f64,
}

impl ScrollExtent {
    /// Limits for the given bounds. A degenerate viewport yields 1px of
    /// content and no scroll range.
    pub fn compute(
        bounds: &VirtualBounds,
        view: &ViewportDimensions,
        dims: &Dimensions,
        chrome: &Chrome,
    ) -> Self {
        if view.is_degenerate() {
            return Self::degenerate();
        }
        let (available_width, available_height) = chrome.available(view);
        let content_width = dims.x_of(bounds.max_col.saturating_add(1));
        let content_height = dims.y_of(bounds.max_row.saturating_add(1));
        Self {
            available_width,
            available_height,
            content_width,
            content_height,
            max_scroll_x: non_negative(content_width - available_width),
            max_scroll_y: non_negative(content_height - available_height),
        }
    }

    pub fn degenerate() -> Self {
        Self {
            available_width: 0.0,
            available_height: 0.0,
            content_width: 1.0,
            content_height: 1.0,
            max_scroll_x: 0.0,
            max_scroll_y: 0.0,
        }
    }
}

/// Result of [`clamp_scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampedScroll {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub start_row: u32,
    pub start_col: u32,
}

/// Visible window for a scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRange {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: u32,
    pub end_col: u32,
    /// Negative sub-cell remainder for smooth horizontal scrolling
    pub offset_x: f64,
    /// Negative sub-cell remainder for smooth vertical scrolling
    pub offset_y: f64,
}

impl VisibleRange {
    pub fn row_count(&self) -> u32 {
        self.end_row.saturating_sub(self.start_row).saturating_add(1)
    }

    pub fn col_count(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col).saturating_add(1)
    }
}

/// Clamp a requested scroll offset into `[0, max]` for the current bounds.
///
/// `start_row`/`start_col` use the default cell size: a cheap index estimate
/// for bookkeeping. Exact placement goes through [`Dimensions`] at render time.
pub fn clamp_scroll(
    scroll_x: f64,
    scroll_y: f64,
    bounds: &VirtualBounds,
    view: &ViewportDimensions,
    dims: &Dimensions,
    chrome: &Chrome,
) -> ClampedScroll {
    let extent = ScrollExtent::compute(bounds, view, dims, chrome);
    let scroll_x = clamp_offset(scroll_x, extent.max_scroll_x);
    let scroll_y = clamp_offset(scroll_y, extent.max_scroll_y);
    ClampedScroll {
        scroll_x,
        scroll_y,
        start_row: index_from_pixels(scroll_y / dims.default_height()).min(bounds.max_row),
        start_col: index_from_pixels(scroll_x / dims.default_width()).min(bounds.max_col),
    }
}

/// Rows and columns to draw for a scroll position.
///
/// The count per axis is `ceil(available / default) + 1`; the extra cell
/// covers the partially visible one at the far edge.
pub fn scroll_to_visible_range(
    scroll_x: f64,
    scroll_y: f64,
    view: &ViewportDimensions,
    dims: &Dimensions,
    chrome: &Chrome,
    grid: &GridConfig,
) -> VisibleRange {
    if view.is_degenerate() {
        return VisibleRange {
            start_row: 0,
            end_row: 0,
            start_col: 0,
            end_col: 0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }
    let (available_width, available_height) = chrome.available(view);
    let scroll_x = clamp_offset(scroll_x, f64::MAX);
    let scroll_y = clamp_offset(scroll_y, f64::MAX);
    let default_width = dims.default_width();
    let default_height = dims.default_height();

    let start_row = index_from_pixels(scroll_y / default_height).min(grid.last_row());
    let start_col = index_from_pixels(scroll_x / default_width).min(grid.last_col());
    let rows = index_from_pixels((available_height / default_height).ceil()).saturating_add(1);
    let cols = index_from_pixels((available_width / default_width).ceil()).saturating_add(1);

    VisibleRange {
        start_row,
        end_row: start_row.saturating_add(rows - 1).min(grid.last_row()),
        start_col,
        end_col: start_col.saturating_add(cols - 1).min(grid.last_col()),
        offset_x: -(scroll_x % default_width),
        offset_y: -(scroll_y % default_height),
    }
}

impl Viewport {
    /// Viewport at a clamped scroll position.
    pub fn from_scroll(clamped: ClampedScroll, visible: &VisibleRange) -> Self {
        Self {
            scroll_x: clamped.scroll_x,
            scroll_y: clamped.scroll_y,
            start_row: clamped.start_row,
            start_col: clamped.start_col,
            row_count: visible.row_count(),
            col_count: visible.col_count(),
        }
    }

    /// Convert a point on the surface (headers included) to sheet
    /// coordinates. `None` over the headers.
    pub fn to_sheet(&self, screen_x: f64, screen_y: f64, chrome: &Chrome) -> Option<(f64, f64)> {
        if !(screen_x.is_finite() && screen_y.is_finite()) {
            return None;
        }
        if screen_x < chrome.row_header_width || screen_y < chrome.col_header_height {
            return None;
        }
        Some((
            screen_x - chrome.row_header_width + self.scroll_x,
            screen_y - chrome.col_header_height + self.scroll_y,
        ))
    }

    /// Convert sheet coordinates to a point on the surface.
    pub fn to_screen(&self, x: f64, y: f64, chrome: &Chrome) -> (f64, f64) {
        (
            x - self.scroll_x + chrome.row_header_width,
            y - self.scroll_y + chrome.col_header_height,
        )
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Clamp to `[0, max]`, mapping NaN to 0.
pub(crate) fn clamp_offset(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, non_negative(max))
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

    fn chrome() -> Chrome {
        Chrome {
            row_header_width: 50.0,
            col_header_height: 30.0,
            scrollbar_thickness: 10.0,
        }
    }

    #[test]
    fn test_extent_from_bounds() {
        let dims = Dimensions::new(100.0, 20.0);
        let view = ViewportDimensions::new(860.0, 640.0);
        let extent = ScrollExtent::compute(&VirtualBounds::new(99, 9), &view, &dims, &chrome());
        assert_eq!(extent.available_width, 800.0);
        assert_eq!(extent.available_height, 600.0);
        assert_eq!(extent.content_height, 2000.0);
        assert_eq!(extent.max_scroll_y, 1400.0);
        assert_eq!(extent.max_scroll_x, 200.0);
    }

    #[test]
    fn test_clamp_scroll_limits() {
        let dims = Dimensions::new(100.0, 20.0);
        let view = ViewportDimensions::new(860.0, 640.0);
        let bounds = VirtualBounds::new(99, 9);
        let c = clamp_scroll(-50.0, 99_999.0, &bounds, &view, &dims, &chrome());
        assert_eq!(c.scroll_x, 0.0);
        assert_eq!(c.scroll_y, 1400.0);
        assert_eq!(c.start_row, 70);
        assert_eq!(c.start_col, 0);
    }

    #[test]
    fn test_clamp_scroll_nan() {
        let dims = Dimensions::new(100.0, 20.0);
        let c = clamp_scroll(
            f64::NAN,
            f64::INFINITY,
            &VirtualBounds::new(99, 9),
            &ViewportDimensions::new(860.0, 640.0),
            &dims,
            &chrome(),
        );
        assert_eq!(c.scroll_x, 0.0);
        assert_eq!(c.scroll_y, 1400.0);
    }

    #[test]
    fn test_degenerate_viewport() {
        let dims = Dimensions::new(100.0, 20.0);
        let view = ViewportDimensions::new(-1.0, 0.0);
        let extent = ScrollExtent::compute(&VirtualBounds::new(99, 9), &view, &dims, &chrome());
        assert_eq!(extent.content_width, 1.0);
        assert_eq!(extent.max_scroll_y, 0.0);
        let c = clamp_scroll(300.0, 300.0, &VirtualBounds::new(99, 9), &view, &dims, &chrome());
        assert_eq!((c.scroll_x, c.scroll_y), (0.0, 0.0));
    }

    #[test]
    fn test_visible_range_with_partial_row() {
        let dims = Dimensions::new(100.0, 20.0);
        let view = ViewportDimensions::new(860.0, 640.0);
        let range = scroll_to_visible_range(150.0, 35.0, &view, &dims, &chrome(), &GridConfig::default());
        assert_eq!(range.start_row, 1);
        assert_eq!(range.end_row, 31);
        assert_eq!(range.start_col, 1);
        assert_eq!(range.end_col, 9);
        assert_eq!(range.offset_x, -50.0);
        assert_eq!(range.offset_y, -15.0);
    }

    #[test]
    fn test_visible_range_stops_at_grid_edge() {
        let grid = GridConfig {
            total_rows: 10,
            total_cols: 3,
            ..GridConfig::default()
        };
        let dims = Dimensions::new(100.0, 20.0);
        let range = scroll_to_visible_range(
            0.0,
            0.0,
            &ViewportDimensions::new(860.0, 640.0),
            &dims,
            &chrome(),
            &grid,
        );
        assert_eq!(range.end_row, 9);
        assert_eq!(range.end_col, 2);
    }

    #[test]
    fn test_to_sheet_and_back() {
        let viewport = Viewport {
            scroll_x: 200.0,
            scroll_y: 40.0,
            ..Viewport::default()
        };
        let c = chrome();
        assert_eq!(viewport.to_sheet(10.0, 100.0, &c), None);
        let (x, y) = viewport.to_sheet(60.0, 50.0, &c).unwrap();
        assert_eq!((x, y), (210.0, 60.0));
        assert_eq!(viewport.to_screen(x, y, &c), (60.0, 50.0));
    }
}
