//! The grid engine: owns the current snapshot, the collaborators and the
//! change subscribers.
//!
//! All state transitions live in [`GridState::apply`]. The engine only
//! gathers collaborator data beforehand, swaps in the new snapshot and
//! fans the resulting [`StateChange`] out to subscribers.

mod intent;
mod state;

use std::collections::BTreeMap;

use tracing::{debug, warn};

pub use intent::{Intent, StateChange};
pub use state::{GridState, TransitionContext};

use crate::collab::{DimensionStore, MergeLookup, UsedRangeSource};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::layout::{Scrollbars, VisibleRange};
use crate::selection::clamp_index;
use crate::types::{CellRange, DimensionEntry, DimensionType, SelectionKind};

/// Change callback registered through [`GridEngine::subscribe`].
pub type Subscriber = Box<dyn FnMut(&GridState, StateChange)>;

/// Handle returned by [`GridEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Stateful front of the engine.
pub struct GridEngine {
    state: GridState,
    merges: Option<Box<dyn MergeLookup>>,
    used_range_source: Option<Box<dyn UsedRangeSource>>,
    dimension_store: Option<Box<dyn DimensionStore>>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl std::fmt::Debug for GridEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("state", &self.state)
            .field("merges", &self.merges.is_some())
            .field("used_range_source", &self.used_range_source.is_some())
            .field("dimension_store", &self.dimension_store.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::from_state(GridState::new(EngineConfig::default()))
    }
}

impl GridEngine {
    /// Create an engine for a fresh document.
    ///
    /// # Errors
    /// Returns an error if the config fails validation.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_state(GridState::new(config)))
    }

    fn from_state(state: GridState) -> Self {
        Self {
            state,
            merges: None,
            used_range_source: None,
            dimension_store: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_merge_lookup(mut self, lookup: impl MergeLookup + 'static) -> Self {
        self.merges = Some(Box::new(lookup));
        self
    }

    pub fn with_used_range_source(mut self, source: impl UsedRangeSource + 'static) -> Self {
        self.used_range_source = Some(Box::new(source));
        self
    }

    pub fn with_dimension_store(mut self, store: impl DimensionStore + 'static) -> Self {
        self.dimension_store = Some(Box::new(store));
        self
    }

    /// Replace or remove the merge lookup, e.g. on sheet switch.
    pub fn set_merge_lookup(&mut self, lookup: Option<Box<dyn MergeLookup>>) {
        self.merges = lookup;
    }

    pub fn set_used_range_source(&mut self, source: Option<Box<dyn UsedRangeSource>>) {
        self.used_range_source = source;
    }

    pub fn set_dimension_store(&mut self, store: Option<Box<dyn DimensionStore>>) {
        self.dimension_store = store;
    }

    /// Current snapshot.
    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.state.config
    }

    pub fn scrollbars(&self) -> Scrollbars {
        self.state.scrollbars()
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.state.visible_range()
    }

    /// Cell under a point on the surface, headers excluded.
    pub fn cell_at_point(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        self.state.cell_at_point(x, y)
    }

    /// Register a change callback. It runs after every intent that changed
    /// something.
    pub fn subscribe(&mut self, callback: impl FnMut(&GridState, StateChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Apply one intent and notify subscribers.
    pub fn dispatch(&mut self, intent: Intent) -> StateChange {
        let merges = self.merges_for(&intent);
        let ctx = TransitionContext {
            merges: merges.as_deref(),
        };
        let (next, change) = self.state.apply(&intent, &ctx);
        self.state = next;

        if change.contains(StateChange::DIMENSIONS) {
            self.persist_dimension(&intent);
        }
        if !change.is_empty() {
            debug!(?change, "state changed");
            self.notify(change);
        }
        change
    }

    /// Start over for a new document: initial bounds, no selection, no
    /// overrides. Config, surface size, collaborators and subscribers stay.
    pub fn reset(&mut self) -> StateChange {
        let next = self.state.fresh();
        let mut change = StateChange::empty();
        change.set(StateChange::SCROLL, next.viewport != self.state.viewport);
        change.set(StateChange::BOUNDS, next.virtual_bounds != self.state.virtual_bounds);
        change.set(StateChange::SELECTION, next.selection != self.state.selection);
        change.set(StateChange::DIMENSIONS, next.dimensions != self.state.dimensions);
        change.set(StateChange::USED_RANGE, next.used_range != self.state.used_range);
        self.state = next;
        if !change.is_empty() {
            self.notify(change);
        }
        change
    }

    /// Read every saved override from the dimension store and install it.
    /// A failing store leaves the current dimensions in place.
    pub fn load_dimensions(&mut self) -> StateChange {
        let Some(store) = self.dimension_store.as_ref() else {
            return StateChange::empty();
        };
        let entries = match store.load_all() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "failed to load dimensions");
                return StateChange::empty();
            }
        };
        debug!(count = entries.len(), "loaded dimensions");
        let mut column_widths = BTreeMap::new();
        let mut row_heights = BTreeMap::new();
        for entry in entries {
            match entry.dimension_type {
                DimensionType::Column => column_widths.insert(entry.index, entry.size),
                DimensionType::Row => row_heights.insert(entry.index, entry.size),
            };
        }
        self.dispatch(Intent::SetAllDimensions {
            column_widths,
            row_heights,
        })
    }

    /// Poll the used-range source. On failure the previous used range is
    /// kept.
    pub fn refresh_used_range(&mut self) -> StateChange {
        let Some(source) = self.used_range_source.as_ref() else {
            return StateChange::empty();
        };
        let counts = source.used_range_counts();
        match counts {
            Ok((row_count, col_count)) => self.dispatch(Intent::SetUsedRange {
                row_count,
                col_count,
            }),
            Err(e) => {
                warn!(error = %e, "used range lookup failed");
                StateChange::empty()
            }
        }
    }

    pub fn set_selection(
        &mut self,
        start_row: i64,
        start_col: i64,
        end_row: i64,
        end_col: i64,
        kind: SelectionKind,
    ) -> StateChange {
        self.dispatch(Intent::SetSelection {
            start_row,
            start_col,
            end_row,
            end_col,
            kind,
        })
    }

    /// Select a single cell.
    pub fn select_cell(&mut self, row: i64, col: i64) -> StateChange {
        self.set_selection(row, col, row, col, SelectionKind::Cells)
    }

    pub fn extend_selection(&mut self, row: i64, col: i64) -> StateChange {
        self.dispatch(Intent::ExtendSelection { row, col })
    }

    pub fn move_selection(&mut self, delta_row: i64, delta_col: i64, extend: bool) -> StateChange {
        self.dispatch(Intent::MoveSelection {
            delta_row,
            delta_col,
            extend,
        })
    }

    pub fn select_row(&mut self, row: i64, extend: bool) -> StateChange {
        self.dispatch(Intent::SelectRow { row, extend })
    }

    pub fn select_column(&mut self, col: i64, extend: bool) -> StateChange {
        self.dispatch(Intent::SelectColumn { col, extend })
    }

    pub fn select_all(&mut self) -> StateChange {
        self.dispatch(Intent::SelectAll)
    }

    pub fn clear_selection(&mut self) -> StateChange {
        self.dispatch(Intent::ClearSelection)
    }

    pub fn add_range(&mut self, start_row: i64, start_col: i64, end_row: i64, end_col: i64) -> StateChange {
        self.dispatch(Intent::AddRange {
            start_row,
            start_col,
            end_row,
            end_col,
        })
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> StateChange {
        self.dispatch(Intent::ScrollBy { dx, dy })
    }

    pub fn scroll_to_cell(&mut self, row: i64, col: i64, center: bool) -> StateChange {
        self.dispatch(Intent::ScrollToCell { row, col, center })
    }

    pub fn scroll_to_position(&mut self, x: f64, y: f64) -> StateChange {
        self.dispatch(Intent::ScrollToPosition { x, y })
    }

    pub fn set_viewport_dimensions(&mut self, width: f64, height: f64) -> StateChange {
        self.dispatch(Intent::SetViewportDimensions { width, height })
    }

    pub fn set_column_width(&mut self, col: i64, width: f64) -> StateChange {
        self.dispatch(Intent::SetColumnWidth { col, width })
    }

    pub fn set_row_height(&mut self, row: i64, height: f64) -> StateChange {
        self.dispatch(Intent::SetRowHeight { row, height })
    }

    pub fn set_all_dimensions(
        &mut self,
        column_widths: BTreeMap<u32, f64>,
        row_heights: BTreeMap<u32, f64>,
    ) -> StateChange {
        self.dispatch(Intent::SetAllDimensions {
            column_widths,
            row_heights,
        })
    }

    pub fn set_virtual_bounds(&mut self, max_row: i64, max_col: i64) -> StateChange {
        self.dispatch(Intent::SetVirtualBounds { max_row, max_col })
    }

    pub fn reset_virtual_bounds(&mut self) -> StateChange {
        self.dispatch(Intent::ResetVirtualBounds)
    }

    /// Merged regions the transition for `intent` needs, if any. Lookup
    /// failures degrade to `None`.
    fn merges_for(&self, intent: &Intent) -> Option<Vec<CellRange>> {
        let lookup = self.merges.as_ref()?;
        let grid = &self.state.config.grid;
        match *intent {
            Intent::SetSelection {
                start_row,
                start_col,
                end_row,
                end_col,
                kind: SelectionKind::Cells,
            } if start_row == end_row && start_col == end_col => {
                let row = clamp_index(start_row, grid.total_rows);
                let col = clamp_index(start_col, grid.total_cols);
                match lookup.merge_info(row, col) {
                    Ok(region) => region.map(|r| vec![r]),
                    Err(e) => {
                        warn!(row, col, error = %e, "merge lookup failed");
                        None
                    }
                }
            }
            Intent::ExtendSelection { .. } | Intent::MoveSelection { extend: true, .. } => {
                match lookup.merged_regions() {
                    Ok(regions) => Some(regions),
                    Err(e) => {
                        warn!(error = %e, "merge lookup failed, extending without merges");
                        None
                    }
                }
            }
            _ => None,
        }
    }

    fn persist_dimension(&mut self, intent: &Intent) {
        let Some(store) = self.dimension_store.as_mut() else {
            return;
        };
        let grid = &self.state.config.grid;
        let entry = match *intent {
            Intent::SetColumnWidth { col, width } => {
                DimensionEntry::column(clamp_index(col, grid.total_cols), width)
            }
            Intent::SetRowHeight { row, height } => {
                DimensionEntry::row(clamp_index(row, grid.total_rows), height)
            }
            _ => return,
        };
        if let Err(e) = store.persist(&entry) {
            warn!(index = entry.index, error = %e, "failed to persist dimension");
        }
    }

    fn notify(&mut self, change: StateChange) {
        for (_, callback) in &mut self.subscribers {
            callback(&self.state, change);
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
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::collab::{MemoryDimensionStore, MergeTable};
    use crate::error::XlgridError;

    struct OfflineStore;

    impl DimensionStore for OfflineStore {
        fn load_all(&self) -> Result<Vec<DimensionEntry>> {
            Err(XlgridError::Dimensions("offline".into()))
        }

        fn persist(&mut self, _entry: &DimensionEntry) -> Result<()> {
            Err(XlgridError::Dimensions("offline".into()))
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.grid.default_cell_width = 0.0;
        assert!(GridEngine::new(config).is_err());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut engine = GridEngine::default();
        let sink = Rc::clone(&seen);
        let id = engine.subscribe(move |state, change| {
            sink.borrow_mut().push((change, state.viewport.scroll_y));
        });

        engine.scroll_by(0.0, 48.0);
        engine.scroll_by(0.0, 0.0);
        assert_eq!(*seen.borrow(), vec![(StateChange::SCROLL, 48.0)]);

        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        engine.scroll_by(0.0, 48.0);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_click_on_merge_selects_region() {
        let mut engine =
            GridEngine::default().with_merge_lookup(MergeTable::new(vec![CellRange::new(2, 2, 4, 3)]));
        engine.select_cell(3, 3);
        let sel = engine.state().selection.clone().unwrap();
        assert_eq!(sel.bounds(), (2, 2, 4, 3));
    }

    #[test]
    fn test_resize_is_persisted() {
        let store = Rc::new(RefCell::new(MemoryDimensionStore::default()));

        struct Shared(Rc<RefCell<MemoryDimensionStore>>);
        impl DimensionStore for Shared {
            fn load_all(&self) -> Result<Vec<DimensionEntry>> {
                self.0.borrow().load_all()
            }
            fn persist(&mut self, entry: &DimensionEntry) -> Result<()> {
                self.0.borrow_mut().persist(entry)
            }
        }

        let mut engine = GridEngine::default().with_dimension_store(Shared(Rc::clone(&store)));
        engine.set_column_width(3, 140.0);
        engine.set_row_height(7, 48.0);
        engine.set_column_width(3, -1.0);
        assert_eq!(store.borrow().entries(), &[DimensionEntry::row(7, 48.0)]);
    }

    #[test]
    fn test_load_dimensions() {
        let store = MemoryDimensionStore::new(vec![
            DimensionEntry::column(1, 200.0),
            DimensionEntry::row(0, 40.0),
        ]);
        let mut engine = GridEngine::default().with_dimension_store(store);
        let change = engine.load_dimensions();
        assert!(change.contains(StateChange::DIMENSIONS));
        assert_eq!(engine.state().dimensions.x_of(2), 300.0);
        assert_eq!(engine.state().dimensions.y_of(1), 40.0);
    }

    #[test]
    fn test_failing_store_degrades() {
        let mut engine = GridEngine::default().with_dimension_store(OfflineStore);
        assert!(engine.load_dimensions().is_empty());
        let change = engine.set_column_width(0, 90.0);
        assert_eq!(change, StateChange::DIMENSIONS);
        assert_eq!(engine.state().dimensions.width_of(0), 90.0);
    }

    #[test]
    fn test_refresh_used_range() {
        let mut engine = GridEngine::default()
            .with_used_range_source(|| -> Result<(u32, u32)> { Ok((11, 6)) });
        assert_eq!(engine.refresh_used_range(), StateChange::USED_RANGE);
        let used = engine.state().used_range.unwrap();
        assert_eq!((used.max_row, used.max_col), (10, 5));
        assert!(engine.refresh_used_range().is_empty());
    }

    #[test]
    fn test_failing_used_range_keeps_previous() {
        let mut engine = GridEngine::default();
        engine.dispatch(Intent::SetUsedRange {
            row_count: 5,
            col_count: 5,
        });
        engine.set_used_range_source(Some(Box::new(|| -> Result<(u32, u32)> {
            Err(XlgridError::UsedRange("timeout".into()))
        })));
        assert!(engine.refresh_used_range().is_empty());
        assert_eq!(engine.state().used_range.unwrap().max_row, 4);
    }

    #[test]
    fn test_reset() {
        let mut engine = GridEngine::default();
        engine.scroll_to_cell(5_000, 30, false);
        engine.set_row_height(2, 50.0);
        let change = engine.reset();
        assert!(change.contains(StateChange::BOUNDS | StateChange::SCROLL | StateChange::DIMENSIONS));
        assert_eq!(engine.state().viewport.scroll_y, 0.0);
        assert!(engine.state().dimensions.is_empty());
    }
}
