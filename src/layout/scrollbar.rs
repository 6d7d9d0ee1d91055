//! Scrollbar thumb geometry.
//!
//! The thumb reflects the data, not the addressable grid: content extends to
//! the used range or to wherever the user has scrolled, whichever is further,
//! plus a small buffer. Scrolling back inside the used range shrinks the
//! track again, the way Excel does.

use serde::{Deserialize, Serialize};

use super::{clamp_offset, Chrome, Dimensions, Viewport, VirtualBounds};
use crate::config::{GridConfig, ScrollbarConfig};
use crate::types::{UsedRange, ViewportDimensions};

/// Geometry of one scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollbarMetrics {
    /// False when there is nothing to scroll
    pub visible: bool,
    /// Content length the thumb represents, in pixels
    pub content_size: f64,
    /// Track length, equal to the visible cell area
    pub track_size: f64,
    pub thumb_size: f64,
    /// Thumb offset from the start of the track
    pub thumb_position: f64,
    pub max_scroll: f64,
}

impl ScrollbarMetrics {
    fn hidden(track_size: f64) -> Self {
        Self {
            visible: false,
            content_size: 1.0,
            track_size,
            thumb_size: track_size,
            thumb_position: 0.0,
            max_scroll: 0.0,
        }
    }

    fn compute(scroll: f64, available: f64, content: f64, min_thumb: f64) -> Self {
        let max_scroll = (content - available).max(0.0);
        if !(max_scroll > 0.0 && available > 0.0) {
            return Self {
                content_size: content.max(1.0),
                ..Self::hidden(available)
            };
        }
        let progress = (scroll / max_scroll).clamp(0.0, 1.0);
        let thumb_size = ((available / content) * available)
            .max(min_thumb)
            .min(available);
        Self {
            visible: true,
            content_size: content,
            track_size: available,
            thumb_size,
            thumb_position: progress * (available - thumb_size),
            max_scroll,
        }
    }

    /// Scroll offset for a thumb dragged to `thumb_position`.
    pub fn scroll_for_thumb(&self, thumb_position: f64) -> f64 {
        let travel = self.track_size - self.thumb_size;
        if !(self.visible && travel > 0.0) {
            return 0.0;
        }
        clamp_offset(thumb_position, travel) / travel * self.max_scroll
    }
}

/// Both scrollbars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scrollbars {
    pub vertical: ScrollbarMetrics,
    pub horizontal: ScrollbarMetrics,
}

/// Everything the scrollbar math reads.
#[derive(Debug, Clone, Copy)]
pub struct ScrollbarInputs<'a> {
    pub bounds: &'a VirtualBounds,
    pub dims: &'a Dimensions,
    pub used_range: Option<&'a UsedRange>,
    pub viewport: &'a Viewport,
    pub view: &'a ViewportDimensions,
    pub chrome: &'a Chrome,
    pub grid: &'a GridConfig,
    pub config: &'a ScrollbarConfig,
}

/// Compute thumb geometry. Without a used range the bars fall back to the
/// virtual bounds.
pub fn compute_scrollbars(inputs: &ScrollbarInputs<'_>) -> Scrollbars {
    if inputs.view.is_degenerate() {
        return Scrollbars {
            vertical: ScrollbarMetrics::hidden(0.0),
            horizontal: ScrollbarMetrics::hidden(0.0),
        };
    }
    let (available_width, available_height) = inputs.chrome.available(inputs.view);
    let viewport = inputs.viewport;

    let (max_row, max_col) = match inputs.used_range {
        Some(used) => (
            effective_max(
                used.max_row,
                viewport.start_row,
                viewport.row_count,
                inputs.config.row_buffer,
                inputs.grid.last_row(),
            ),
            effective_max(
                used.max_col,
                viewport.start_col,
                viewport.col_count,
                inputs.config.col_buffer,
                inputs.grid.last_col(),
            ),
        ),
        None => (inputs.bounds.max_row, inputs.bounds.max_col),
    };

    let content_height = inputs.dims.y_of(max_row.saturating_add(1));
    let content_width = inputs.dims.x_of(max_col.saturating_add(1));
    Scrollbars {
        vertical: ScrollbarMetrics::compute(
            viewport.scroll_y,
            available_height,
            content_height,
            inputs.config.min_thumb_size,
        ),
        horizontal: ScrollbarMetrics::compute(
            viewport.scroll_x,
            available_width,
            content_width,
            inputs.config.min_thumb_size,
        ),
    }
}

/// `max(used, position + visible) + buffer`, clamped to the grid.
pub fn effective_max(used_max: u32, start: u32, visible_count: u32, buffer: u32, last: u32) -> u32 {
    used_max
        .max(start.saturating_add(visible_count))
        .saturating_add(buffer)
        .min(last)
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
    fn test_effective_max_tracks_scroll_position() {
        assert_eq!(effective_max(10, 0, 21, 10, 1_000), 31);
        assert_eq!(effective_max(500, 0, 21, 10, 1_000), 510);
        assert_eq!(effective_max(10, 900, 31, 10, 1_000), 941);
        assert_eq!(effective_max(999, 990, 31, 10, 1_000), 1_000);
    }

    #[test]
    fn test_thumb_geometry() {
        let m = ScrollbarMetrics::compute(700.0, 600.0, 2_000.0, 30.0);
        assert!(m.visible);
        assert_eq!(m.max_scroll, 1_400.0);
        assert_eq!(m.thumb_size, 180.0);
        assert_eq!(m.thumb_position, 0.5 * 420.0);
        assert_eq!(m.scroll_for_thumb(m.thumb_position), 700.0);
    }

    #[test]
    fn test_min_thumb_size() {
        let m = ScrollbarMetrics::compute(0.0, 600.0, 20_000_000.0, 30.0);
        assert_eq!(m.thumb_size, 30.0);
    }

    #[test]
    fn test_no_scroll_hides_bar() {
        let m = ScrollbarMetrics::compute(0.0, 600.0, 400.0, 30.0);
        assert!(!m.visible);
        assert_eq!(m.thumb_position, 0.0);
        assert_eq!(m.scroll_for_thumb(100.0), 0.0);
    }

    #[test]
    fn test_used_range_smaller_than_viewport() {
        let dims = Dimensions::new(100.0, 20.0);
        let viewport = Viewport {
            row_count: 31,
            col_count: 9,
            ..Viewport::default()
        };
        let inputs = ScrollbarInputs {
            bounds: &VirtualBounds::new(199, 51),
            dims: &dims,
            used_range: Some(&UsedRange {
                max_row: 10,
                max_col: 5,
            }),
            viewport: &viewport,
            view: &ViewportDimensions::new(860.0, 640.0),
            chrome: &chrome(),
            grid: &GridConfig::default(),
            config: &ScrollbarConfig::default(),
        };
        let bars = compute_scrollbars(&inputs);
        // Rows 0..=41 -> 840px; never less than the 600px window.
        assert_eq!(bars.vertical.content_size, 840.0);
        assert!(bars.vertical.content_size >= bars.vertical.track_size);
        assert_eq!(bars.horizontal.content_size, 1_500.0);
    }

    #[test]
    fn test_without_used_range_uses_bounds() {
        let dims = Dimensions::new(100.0, 20.0);
        let viewport = Viewport::default();
        let inputs = ScrollbarInputs {
            bounds: &VirtualBounds::new(199, 51),
            dims: &dims,
            used_range: None,
            viewport: &viewport,
            view: &ViewportDimensions::new(860.0, 640.0),
            chrome: &chrome(),
            grid: &GridConfig::default(),
            config: &ScrollbarConfig::default(),
        };
        let bars = compute_scrollbars(&inputs);
        assert_eq!(bars.vertical.content_size, 4_000.0);
        assert_eq!(bars.horizontal.content_size, 5_200.0);
    }
}
