//! xlgrid - viewport and selection engine for huge spreadsheet grids
//!
//! Keeps a scrollable, selectable view over a grid of up to Excel's
//! 1,048,576 x 16,384 cells without materializing rows or columns:
//! - Sparse row/column size overrides over uniform defaults
//! - Virtual bounds that grow as the user scrolls or jumps
//! - Scroll clamping, visible window and smooth-scroll offsets
//! - Minimal scrolling to keep the active cell visible
//! - Cell, row, column and multi-range selection with merge expansion
//! - Excel-like scrollbars driven by the used range
//!
//! Rendering, formulas and file I/O belong to the host.
//!
//! # Usage (Rust)
//!
//! ```
//! use xlgrid::{EngineConfig, GridEngine};
//!
//! let mut engine = GridEngine::new(EngineConfig::default()).unwrap();
//! engine.set_viewport_dimensions(1280.0, 720.0);
//! engine.scroll_to_cell(500_000, 0, false);
//! assert!(engine.state().virtual_bounds.max_row >= 500_000);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { XlGrid } from 'xlgrid';
//! await init();
//! const grid = new XlGrid({ grid: { defaultCellHeight: 20 } });
//! grid.dispatch({ type: 'scrollToCell', row: 500000, col: 0 });
//! const snapshot = grid.snapshot();
//! ```

// State and intents
pub mod config;
pub mod engine;
pub mod error;
pub mod types;

// Geometry and selection math
pub mod layout;
pub mod selection;

// Host integration
pub mod collab;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use bindings::XlGrid;

pub use collab::{DimensionStore, MemoryDimensionStore, MergeLookup, MergeTable, UsedRangeSource};
pub use config::{
    EngineConfig, ExpansionConfig, GridConfig, ScrollbarConfig, EXCEL_MAX_COLS, EXCEL_MAX_ROWS,
};
pub use engine::{GridEngine, GridState, Intent, StateChange, SubscriptionId};
pub use error::{Result, XlgridError};
pub use layout::{Dimensions, ScrollbarMetrics, Scrollbars, Viewport, VirtualBounds, VisibleRange};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
