//! Virtual bounds: the addressable sub-rectangle of the full grid.
//!
//! Content size and scroll limits derive from these bounds rather than from
//! `totalRows x totalCols`, so the grid never materializes a million rows.
//! Bounds only grow on this path; shrinking happens through
//! [`VirtualBounds::initial`] (new document) or [`VirtualBounds::clamped`]
//! (explicit load of a known extent).

use serde::{Deserialize, Serialize};

use crate::config::{ExpansionConfig, GridConfig};

/// Highest row and column currently addressable for scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualBounds {
    pub max_row: u32,
    pub max_col: u32,
}

/// Inputs to one expansion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpansionRequest {
    pub target_row: u32,
    pub target_col: u32,
    /// The viewport sits at its maximum vertical scroll
    pub at_max_scroll_y: bool,
    /// The viewport sits at its maximum horizontal scroll
    pub at_max_scroll_x: bool,
}

impl ExpansionRequest {
    /// Expansion toward a target cell, ignoring scroll position.
    pub fn toward(target_row: u32, target_col: u32) -> Self {
        Self {
            target_row,
            target_col,
            ..Self::default()
        }
    }
}

impl VirtualBounds {
    pub fn new(max_row: u32, max_col: u32) -> Self {
        Self { max_row, max_col }
    }

    /// Bounds of a fresh document.
    pub fn initial(expansion: &ExpansionConfig, grid: &GridConfig) -> Self {
        Self::new(expansion.initial_max_row, expansion.initial_max_col).clamped(grid)
    }

    /// Clamp into `[0, totalRows) x [0, totalCols)`.
    pub fn clamped(self, grid: &GridConfig) -> Self {
        Self {
            max_row: self.max_row.min(grid.last_row()),
            max_col: self.max_col.min(grid.last_col()),
        }
    }

    /// Grow toward `request`. Each axis expands when its target comes within
    /// `expansion_threshold` of the current bound, or when the viewport is
    /// already scrolled to the end of that axis. Never shrinks.
    pub fn expand(
        self,
        request: ExpansionRequest,
        expansion: &ExpansionConfig,
        grid: &GridConfig,
    ) -> Self {
        let max_row = expand_axis(
            self.max_row,
            request.target_row,
            request.at_max_scroll_y,
            expansion.expansion_threshold,
            expansion.row_buffer,
            grid.last_row(),
        );
        let max_col = expand_axis(
            self.max_col,
            request.target_col,
            request.at_max_scroll_x,
            expansion.expansion_threshold,
            expansion.col_buffer,
            grid.last_col(),
        );
        Self { max_row, max_col }
    }
}

fn expand_axis(current: u32, target: u32, at_max_scroll: bool, threshold: u32, buffer: u32, last: u32) -> u32 {
    let near_edge = target >= current.saturating_sub(threshold);
    if !(near_edge || at_max_scroll) {
        return current;
    }
    let grown = target.max(current).saturating_add(buffer).min(last);
    grown.max(current)
}

/// Whether `scroll` is at `max_scroll` within `tolerance` pixels.
pub fn is_at_max_scroll(scroll: f64, max_scroll: f64, tolerance: f64) -> bool {
    scroll >= max_scroll - tolerance
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

    fn setup() -> (ExpansionConfig, GridConfig) {
        (ExpansionConfig::default(), GridConfig::default())
    }

    #[test]
    fn test_initial_bounds() {
        let (exp, grid) = setup();
        let b = VirtualBounds::initial(&exp, &grid);
        assert_eq!(b, VirtualBounds::new(199, 51));
    }

    #[test]
    fn test_target_far_from_edge_keeps_bounds() {
        let (exp, grid) = setup();
        let b = VirtualBounds::new(199, 51);
        assert_eq!(b.expand(ExpansionRequest::toward(50, 5), &exp, &grid), b);
    }

    #[test]
    fn test_target_near_edge_expands_with_buffer() {
        let (exp, grid) = setup();
        let b = VirtualBounds::new(199, 51).expand(ExpansionRequest::toward(190, 45), &exp, &grid);
        assert_eq!(b.max_row, 249);
        assert_eq!(b.max_col, 71);
    }

    #[test]
    fn test_jump_far_beyond_bounds() {
        let (exp, grid) = setup();
        let b = VirtualBounds::new(199, 51).expand(ExpansionRequest::toward(500_000, 0), &exp, &grid);
        assert_eq!(b.max_row, 500_050);
        assert_eq!(b.max_col, 51);
    }

    #[test]
    fn test_at_max_scroll_expands_even_when_target_is_far() {
        let (exp, grid) = setup();
        let request = ExpansionRequest {
            target_row: 0,
            target_col: 0,
            at_max_scroll_y: true,
            at_max_scroll_x: false,
        };
        let b = VirtualBounds::new(199, 51).expand(request, &exp, &grid);
        assert_eq!(b.max_row, 249);
        assert_eq!(b.max_col, 51);
    }

    #[test]
    fn test_expansion_stops_at_grid_edge() {
        let (exp, grid) = setup();
        let b = VirtualBounds::new(1_048_570, 16_380).expand(
            ExpansionRequest::toward(1_048_575, 16_383),
            &exp,
            &grid,
        );
        assert_eq!(b, VirtualBounds::new(1_048_575, 16_383));
    }

    #[test]
    fn test_max_scroll_tolerance() {
        assert!(is_at_max_scroll(998.5, 1000.0, 2.0));
        assert!(!is_at_max_scroll(990.0, 1000.0, 2.0));
        assert!(is_at_max_scroll(0.0, 0.0, 2.0));
    }
}
