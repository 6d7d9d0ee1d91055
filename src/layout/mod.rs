//! Layout math for a virtual grid.
//!
//! This module handles:
//! - Row/column sizes and offsets over sparse overrides
//! - Virtual bounds that grow on demand
//! - Scroll clamping and the visible cell window
//! - Minimal scroll adjustments to reveal a cell
//! - Scrollbar thumb geometry

mod bounds;
mod dimensions;
mod scrollbar;
mod viewport;
mod visibility;

pub use bounds::{is_at_max_scroll, ExpansionRequest, VirtualBounds};
pub use dimensions::Dimensions;
pub use scrollbar::{compute_scrollbars, effective_max, ScrollbarInputs, ScrollbarMetrics, Scrollbars};
pub(crate) use viewport::clamp_offset;
pub use viewport::{
    clamp_scroll, scroll_to_visible_range, Chrome, ClampedScroll, ScrollExtent, Viewport,
    VisibleRange,
};
pub use visibility::{
    calculate_scroll_for_cell, ensure_visible, is_cell_visible, CellRect, ScrollTarget,
};

/// Floor a non-negative pixel quotient to an index, saturating at `u32::MAX`.
/// NaN and negative values map to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn index_from_pixels(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.floor().min(f64::from(u32::MAX)) as u32
}
