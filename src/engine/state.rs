//! The engine snapshot and its pure transition function.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::intent::{Intent, StateChange};
use crate::config::EngineConfig;
use crate::layout::{
    calculate_scroll_for_cell, clamp_scroll, compute_scrollbars, ensure_visible,
    is_at_max_scroll, is_cell_visible, scroll_to_visible_range, Chrome, Dimensions,
    ExpansionRequest, ScrollExtent, ScrollbarInputs, Scrollbars, Viewport, VirtualBounds,
    VisibleRange,
};
use crate::selection::{self, clamp_index};
use crate::types::{CellRange, Selection, UsedRange, ViewportDimensions};

/// Data fetched from collaborators before a transition runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionContext<'a> {
    /// Merged regions relevant to the intent. `None` when the host has no
    /// merge lookup or the lookup failed.
    pub merges: Option<&'a [CellRange]>,
}

/// Read-only snapshot of the whole engine.
///
/// Never mutated in place: [`GridState::apply`] returns a new snapshot.
/// Config and dimensions sit behind `Arc` so scroll-only transitions stay
/// cheap to clone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    pub config: Arc<EngineConfig>,
    pub virtual_bounds: VirtualBounds,
    pub viewport: Viewport,
    pub viewport_dimensions: ViewportDimensions,
    pub selection: Option<Selection>,
    pub dimensions: Arc<Dimensions>,
    /// Last used range reported by the backend
    pub used_range: Option<UsedRange>,
}

impl GridState {
    /// State of a fresh document.
    pub fn new(config: EngineConfig) -> Self {
        Self::build(Arc::new(config), ViewportDimensions::default())
    }

    /// A fresh document with the same config and surface size.
    pub fn fresh(&self) -> Self {
        Self::build(Arc::clone(&self.config), self.viewport_dimensions)
    }

    fn build(config: Arc<EngineConfig>, viewport_dimensions: ViewportDimensions) -> Self {
        let mut state = Self {
            virtual_bounds: VirtualBounds::initial(&config.expansion, &config.grid),
            viewport: Viewport::default(),
            viewport_dimensions,
            selection: None,
            dimensions: Arc::new(Dimensions::from_grid(&config.grid)),
            used_range: None,
            config,
        };
        state.commit_scroll(0.0, 0.0);
        state
    }

    pub fn chrome(&self) -> Chrome {
        Chrome::from_config(&self.config)
    }

    /// Content size and scroll limits for the current bounds.
    pub fn scroll_extent(&self) -> ScrollExtent {
        ScrollExtent::compute(
            &self.virtual_bounds,
            &self.viewport_dimensions,
            &self.dimensions,
            &self.chrome(),
        )
    }

    /// Rows and columns the host should draw.
    pub fn visible_range(&self) -> VisibleRange {
        scroll_to_visible_range(
            self.viewport.scroll_x,
            self.viewport.scroll_y,
            &self.viewport_dimensions,
            &self.dimensions,
            &self.chrome(),
            &self.config.grid,
        )
    }

    pub fn scrollbars(&self) -> Scrollbars {
        compute_scrollbars(&ScrollbarInputs {
            bounds: &self.virtual_bounds,
            dims: &self.dimensions,
            used_range: self.used_range.as_ref(),
            viewport: &self.viewport,
            view: &self.viewport_dimensions,
            chrome: &self.chrome(),
            grid: &self.config.grid,
            config: &self.config.scrollbar,
        })
    }

    /// Whether `(row, col)` is fully inside the cell area.
    pub fn is_cell_visible(&self, row: u32, col: u32) -> bool {
        is_cell_visible(row, col, &self.viewport, &self.scroll_extent(), &self.dimensions)
    }

    /// Hit test a point on the surface. `None` over headers, scrollbars or
    /// outside the surface.
    pub fn cell_at_point(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        if self.viewport_dimensions.is_degenerate() {
            return None;
        }
        let chrome = self.chrome();
        let (available_width, available_height) = chrome.available(&self.viewport_dimensions);
        if x >= chrome.row_header_width + available_width
            || y >= chrome.col_header_height + available_height
        {
            return None;
        }
        let (sheet_x, sheet_y) = self.viewport.to_sheet(x, y, &chrome)?;
        let grid = &self.config.grid;
        Some((
            self.dimensions.row_at_y(sheet_y).min(grid.last_row()),
            self.dimensions.col_at_x(sheet_x).min(grid.last_col()),
        ))
    }

    /// Apply one intent. Returns the next snapshot and what changed.
    pub fn apply(&self, intent: &Intent, ctx: &TransitionContext<'_>) -> (Self, StateChange) {
        trace!(?intent, "apply intent");
        let mut next = self.clone();
        next.reduce(intent, ctx);
        let change = self.diff(&next);
        (next, change)
    }

    fn diff(&self, next: &Self) -> StateChange {
        let mut change = StateChange::empty();
        change.set(StateChange::SCROLL, self.viewport != next.viewport);
        change.set(StateChange::BOUNDS, self.virtual_bounds != next.virtual_bounds);
        change.set(StateChange::SELECTION, self.selection != next.selection);
        change.set(
            StateChange::DIMENSIONS,
            !Arc::ptr_eq(&self.dimensions, &next.dimensions) && self.dimensions != next.dimensions,
        );
        change.set(
            StateChange::VIEWPORT_SIZE,
            self.viewport_dimensions != next.viewport_dimensions,
        );
        change.set(StateChange::USED_RANGE, self.used_range != next.used_range);
        change
    }

    fn reduce(&mut self, intent: &Intent, ctx: &TransitionContext<'_>) {
        let config = Arc::clone(&self.config);
        let grid = &config.grid;
        match *intent {
            Intent::SetSelection {
                start_row,
                start_col,
                end_row,
                end_col,
                kind,
            } => {
                let range = CellRange::new(
                    clamp_index(start_row, grid.total_rows),
                    clamp_index(start_col, grid.total_cols),
                    clamp_index(end_row, grid.total_rows),
                    clamp_index(end_col, grid.total_cols),
                );
                let mut next = selection::set_selection(range, kind, grid);
                if let Some(merges) = ctx.merges {
                    next = selection::snap_to_merge(next, merges);
                }
                self.select(next);
            }
            Intent::ExtendSelection { row, col } => {
                let row = clamp_index(row, grid.total_rows);
                let col = clamp_index(col, grid.total_cols);
                let current = self
                    .selection
                    .clone()
                    .unwrap_or_else(|| Selection::cell(0, 0));
                let next = match ctx.merges {
                    Some(merges) => selection::extend_with_merges(&current, row, col, merges, grid),
                    None => selection::extend_selection(&current, row, col, grid),
                };
                self.select(next);
            }
            Intent::MoveSelection {
                delta_row,
                delta_col,
                extend,
            } => {
                let next = match (extend, self.selection.as_ref(), ctx.merges) {
                    (true, Some(current), Some(merges)) => {
                        selection::move_with_merges(current, delta_row, delta_col, merges, grid)
                    }
                    (_, current, _) => {
                        selection::move_selection(current, delta_row, delta_col, extend, grid)
                    }
                };
                self.select(next);
            }
            Intent::SelectRow { row, extend } => {
                let row = clamp_index(row, grid.total_rows);
                let next = selection::select_row(self.selection.as_ref(), row, extend, grid);
                self.select(next);
            }
            Intent::SelectColumn { col, extend } => {
                let col = clamp_index(col, grid.total_cols);
                let next = selection::select_column(self.selection.as_ref(), col, extend, grid);
                self.select(next);
            }
            Intent::SelectAll => self.select(Selection::all(grid)),
            Intent::ClearSelection => self.selection = None,
            Intent::AddRange {
                start_row,
                start_col,
                end_row,
                end_col,
            } => {
                let range = CellRange::new(
                    clamp_index(start_row, grid.total_rows),
                    clamp_index(start_col, grid.total_cols),
                    clamp_index(end_row, grid.total_rows),
                    clamp_index(end_col, grid.total_cols),
                );
                self.selection = Some(selection::add_range(
                    self.selection.as_ref(),
                    range,
                    config.max_additional_ranges,
                    grid,
                ));
            }
            Intent::ScrollBy { dx, dy } => self.scroll_by(finite_or_zero(dx), finite_or_zero(dy)),
            Intent::ScrollToCell { row, col, center } => self.scroll_to_cell(
                clamp_index(row, grid.total_rows),
                clamp_index(col, grid.total_cols),
                center,
            ),
            Intent::ScrollToPosition { x, y } => self.commit_scroll(x, y),
            Intent::SetViewportDimensions { width, height } => {
                let view = ViewportDimensions::new(width, height);
                if view.is_degenerate() {
                    warn!(width, height, "degenerate viewport dimensions");
                }
                self.viewport_dimensions =
                    ViewportDimensions::new(finite_or_zero(width), finite_or_zero(height));
                self.recommit();
            }
            Intent::SetColumnWidth { col, width } => {
                let col = clamp_index(col, grid.total_cols);
                Arc::make_mut(&mut self.dimensions).set_column_width(col, width);
                self.recommit();
            }
            Intent::SetRowHeight { row, height } => {
                let row = clamp_index(row, grid.total_rows);
                Arc::make_mut(&mut self.dimensions).set_row_height(row, height);
                self.recommit();
            }
            Intent::SetAllDimensions {
                ref column_widths,
                ref row_heights,
            } => {
                Arc::make_mut(&mut self.dimensions).set_all(column_widths, row_heights);
                self.recommit();
            }
            Intent::SetVirtualBounds { max_row, max_col } => {
                self.virtual_bounds = VirtualBounds::new(
                    clamp_index(max_row, grid.total_rows),
                    clamp_index(max_col, grid.total_cols),
                );
                self.recommit();
            }
            Intent::ResetVirtualBounds => {
                self.virtual_bounds = VirtualBounds::initial(&config.expansion, grid);
                self.recommit();
            }
            Intent::SetUsedRange {
                row_count,
                col_count,
            } => self.used_range = Some(UsedRange::from_counts(row_count, col_count)),
        }
    }

    /// Install a selection, then grow the bounds and scroll so its active
    /// cell is visible. Row, column and select-all selections leave the
    /// viewport alone.
    fn select(&mut self, next: Selection) {
        let large_jump = self
            .selection
            .as_ref()
            .is_some_and(|prev| is_large_jump(prev.active_cell(), next.active_cell()));
        let suppress = next.suppresses_scroll(&self.config.grid);
        let (row, col) = next.active_cell();
        let (_, _, max_row, max_col) = next.bounds();
        self.selection = Some(next);
        if suppress {
            return;
        }
        self.grow_toward(max_row, max_col);
        self.reveal(row, col, large_jump);
    }

    /// Scroll so `(row, col)` is fully visible. Large jumps recompute the
    /// position from scratch instead of nudging.
    fn reveal(&mut self, row: u32, col: u32, large_jump: bool) {
        let extent = self.scroll_extent();
        let forced = || calculate_scroll_for_cell(row, col, false, &self.viewport, &extent, &self.dimensions);
        let target = if large_jump {
            debug!(row, col, "large jump, recomputing scroll");
            Some(forced())
        } else {
            ensure_visible(row, col, &self.viewport, &extent, &self.dimensions).or_else(|| {
                (!is_cell_visible(row, col, &self.viewport, &extent, &self.dimensions))
                    .then(forced)
            })
        };
        if let Some(target) = target {
            self.commit_scroll(target.scroll_x, target.scroll_y);
        }
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        let target_x = self.viewport.scroll_x + dx;
        let target_y = self.viewport.scroll_y + dy;
        self.commit_scroll(target_x, target_y);

        let (at_max_x, at_max_y) = self.at_max_scroll();
        let before = self.virtual_bounds;
        self.grow_bounds(ExpansionRequest {
            target_row: self.viewport.start_row.saturating_add(self.viewport.row_count),
            target_col: self.viewport.start_col.saturating_add(self.viewport.col_count),
            at_max_scroll_y: at_max_y && dy > 0.0,
            at_max_scroll_x: at_max_x && dx > 0.0,
        });
        if self.virtual_bounds != before {
            self.commit_scroll(target_x, target_y);
        }
    }

    fn scroll_to_cell(&mut self, row: u32, col: u32, center: bool) {
        self.grow_toward(row, col);
        let target = calculate_scroll_for_cell(
            row,
            col,
            center,
            &self.viewport,
            &self.scroll_extent(),
            &self.dimensions,
        );
        self.commit_scroll(target.scroll_x, target.scroll_y);
    }

    /// `(x, y)` at-max flags. Never true for a degenerate surface.
    fn at_max_scroll(&self) -> (bool, bool) {
        if self.viewport_dimensions.is_degenerate() {
            return (false, false);
        }
        let extent = self.scroll_extent();
        let tolerance = self.config.expansion.max_scroll_tolerance;
        (
            is_at_max_scroll(self.viewport.scroll_x, extent.max_scroll_x, tolerance),
            is_at_max_scroll(self.viewport.scroll_y, extent.max_scroll_y, tolerance),
        )
    }

    /// Grow the bounds toward a target cell. Sitting at maximum scroll also
    /// counts as reaching the edge, unless the target lies before the
    /// visible window on that axis.
    fn grow_toward(&mut self, row: u32, col: u32) {
        let (at_max_x, at_max_y) = self.at_max_scroll();
        let before = self.virtual_bounds;
        self.grow_bounds(ExpansionRequest {
            target_row: row,
            target_col: col,
            at_max_scroll_y: at_max_y && row >= self.viewport.start_row,
            at_max_scroll_x: at_max_x && col >= self.viewport.start_col,
        });
        if self.virtual_bounds != before {
            self.recommit();
        }
    }

    fn grow_bounds(&mut self, request: ExpansionRequest) {
        let grown = self
            .virtual_bounds
            .expand(request, &self.config.expansion, &self.config.grid);
        if grown != self.virtual_bounds {
            debug!(
                max_row = grown.max_row,
                max_col = grown.max_col,
                "virtual bounds expanded"
            );
            self.virtual_bounds = grown;
        }
    }

    fn commit_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        let chrome = self.chrome();
        let clamped = clamp_scroll(
            scroll_x,
            scroll_y,
            &self.virtual_bounds,
            &self.viewport_dimensions,
            &self.dimensions,
            &chrome,
        );
        let visible = scroll_to_visible_range(
            clamped.scroll_x,
            clamped.scroll_y,
            &self.viewport_dimensions,
            &self.dimensions,
            &chrome,
            &self.config.grid,
        );
        self.viewport = Viewport::from_scroll(clamped, &visible);
    }

    /// Re-clamp the current scroll after bounds, sizes or the surface changed.
    fn recommit(&mut self) {
        self.commit_scroll(self.viewport.scroll_x, self.viewport.scroll_y);
    }
}

fn is_large_jump(from: (u32, u32), to: (u32, u32)) -> bool {
    from.0.abs_diff(to.0) > 1 || from.1.abs_diff(to.1) > 1
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
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
    use crate::types::SelectionKind;

    fn state() -> GridState {
        let mut config = EngineConfig::default();
        config.grid.default_cell_height = 20.0;
        let (state, _) = GridState::new(config).apply(
            &Intent::SetViewportDimensions {
                width: 864.0,
                height: 638.0,
            },
            &TransitionContext::default(),
        );
        state
    }

    fn apply(state: &GridState, intent: Intent) -> (GridState, StateChange) {
        state.apply(&intent, &TransitionContext::default())
    }

    #[test]
    fn test_fresh_state() {
        let s = GridState::new(EngineConfig::default());
        assert_eq!(s.virtual_bounds, VirtualBounds::new(199, 51));
        assert_eq!(s.viewport.scroll_x, 0.0);
        assert!(s.selection.is_none());
        assert!(s.dimensions.is_empty());
    }

    #[test]
    fn test_cell_area_is_800_by_600() {
        let extent = state().scroll_extent();
        assert_eq!(extent.available_width, 800.0);
        assert_eq!(extent.available_height, 600.0);
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let s = state();
        let (next, change) = apply(&s, Intent::ScrollBy { dx: 0.0, dy: 200.0 });
        assert_eq!(s.viewport.scroll_y, 0.0);
        assert_eq!(next.viewport.scroll_y, 200.0);
        assert_eq!(next.viewport.start_row, 10);
        assert_eq!(change, StateChange::SCROLL);
    }

    #[test]
    fn test_move_down_nudges_scroll_by_one_row() {
        let (s, _) = apply(
            &state(),
            Intent::SetSelection {
                start_row: 29,
                start_col: 0,
                end_row: 29,
                end_col: 0,
                kind: SelectionKind::Cells,
            },
        );
        assert_eq!(s.viewport.scroll_y, 0.0);
        let (s, change) = apply(
            &s,
            Intent::MoveSelection {
                delta_row: 1,
                delta_col: 0,
                extend: false,
            },
        );
        assert_eq!(s.viewport.scroll_y, 20.0);
        assert!(change.contains(StateChange::SELECTION | StateChange::SCROLL));
    }

    #[test]
    fn test_large_jump_puts_cell_at_top() {
        let (s, _) = apply(
            &state(),
            Intent::SetSelection {
                start_row: 0,
                start_col: 0,
                end_row: 0,
                end_col: 0,
                kind: SelectionKind::Cells,
            },
        );
        let (s, change) = apply(
            &s,
            Intent::MoveSelection {
                delta_row: 150,
                delta_col: 0,
                extend: false,
            },
        );
        assert_eq!(s.viewport.scroll_y, 3_000.0);
        assert!(s.is_cell_visible(150, 0));
        assert!(!change.contains(StateChange::BOUNDS));
    }

    #[test]
    fn test_select_row_does_not_scroll() {
        let (s, _) = apply(&state(), Intent::ScrollBy { dx: 300.0, dy: 400.0 });
        let (next, change) = apply(&s, Intent::SelectRow { row: 3, extend: false });
        assert_eq!(next.viewport, s.viewport);
        assert_eq!(next.virtual_bounds, s.virtual_bounds);
        assert_eq!(change, StateChange::SELECTION);
    }

    #[test]
    fn test_clear_selection() {
        let (s, _) = apply(&state(), Intent::SelectAll);
        let (s, change) = apply(&s, Intent::ClearSelection);
        assert!(s.selection.is_none());
        assert_eq!(change, StateChange::SELECTION);
    }

    #[test]
    fn test_scroll_by_at_max_expands_bounds() {
        let s = state();
        let max = s.scroll_extent().max_scroll_y;
        let (s, _) = apply(&s, Intent::ScrollToPosition { x: 0.0, y: max });
        let before = s.virtual_bounds.max_row;
        let (s, change) = apply(&s, Intent::ScrollBy { dx: 0.0, dy: 60.0 });
        assert!(change.contains(StateChange::BOUNDS));
        assert!(s.virtual_bounds.max_row > before);
        assert_eq!(s.viewport.scroll_y, max + 60.0);
    }

    #[test]
    fn test_nan_delta_is_ignored() {
        let (s, _) = apply(&state(), Intent::ScrollBy { dx: 0.0, dy: 100.0 });
        let (next, change) = apply(
            &s,
            Intent::ScrollBy {
                dx: f64::NAN,
                dy: f64::INFINITY,
            },
        );
        assert_eq!(next.viewport, s.viewport);
        assert!(!change.contains(StateChange::SCROLL));
    }

    #[test]
    fn test_degenerate_viewport_collapses_scroll() {
        let (s, _) = apply(&state(), Intent::ScrollBy { dx: 300.0, dy: 400.0 });
        let (s, change) = apply(
            &s,
            Intent::SetViewportDimensions {
                width: 0.0,
                height: f64::NAN,
            },
        );
        assert!(change.contains(StateChange::VIEWPORT_SIZE | StateChange::SCROLL));
        assert_eq!((s.viewport.scroll_x, s.viewport.scroll_y), (0.0, 0.0));
        assert_eq!(s.scroll_extent().content_width, 1.0);
        assert!(!s.scrollbars().vertical.visible);
        assert_eq!(s.cell_at_point(100.0, 100.0), None);
    }

    #[test]
    fn test_column_width_change_reported_once() {
        let (s, change) = apply(&state(), Intent::SetColumnWidth { col: 2, width: 150.0 });
        assert_eq!(change, StateChange::DIMENSIONS);
        assert_eq!(s.dimensions.width_of(2), 150.0);
        let (_, change) = apply(&s, Intent::SetColumnWidth { col: 2, width: 150.0 });
        assert!(change.is_empty());
    }

    #[test]
    fn test_shrinking_bounds_reclamps_scroll() {
        let (s, _) = apply(&state(), Intent::ScrollBy { dx: 0.0, dy: 3_000.0 });
        let (s, change) = apply(&s, Intent::SetVirtualBounds { max_row: 40, max_col: 10 });
        assert!(change.contains(StateChange::BOUNDS | StateChange::SCROLL));
        // 41 rows -> 820px of content in a 600px window.
        assert_eq!(s.viewport.scroll_y, 220.0);
    }

    #[test]
    fn test_cell_at_point() {
        let (s, _) = apply(&state(), Intent::ScrollBy { dx: 150.0, dy: 30.0 });
        assert_eq!(s.cell_at_point(51.0, 25.0), Some((1, 1)));
        assert_eq!(s.cell_at_point(10.0, 100.0), None);
        assert_eq!(s.cell_at_point(855.0, 100.0), None);
    }

    #[test]
    fn test_fresh_keeps_surface() {
        let (s, _) = apply(&state(), Intent::SetRowHeight { row: 4, height: 60.0 });
        let fresh = s.fresh();
        assert!(fresh.dimensions.is_empty());
        assert_eq!(fresh.viewport_dimensions, s.viewport_dimensions);
    }
}
