//! The mutation surface of the engine.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::types::SelectionKind;

/// One discrete user or host action.
///
/// Coordinates are signed so callers can pass anything; the engine clamps
/// rather than rejects. Deserializes from `{"type": "moveSelection", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Replace the selection with a rectangle.
    SetSelection {
        start_row: i64,
        start_col: i64,
        end_row: i64,
        end_col: i64,
        #[serde(default)]
        kind: SelectionKind,
    },
    /// Keep the anchor, move the active cell.
    ExtendSelection { row: i64, col: i64 },
    /// Arrow-key style navigation.
    MoveSelection {
        delta_row: i64,
        delta_col: i64,
        #[serde(default)]
        extend: bool,
    },
    SelectRow {
        row: i64,
        #[serde(default)]
        extend: bool,
    },
    SelectColumn {
        col: i64,
        #[serde(default)]
        extend: bool,
    },
    SelectAll,
    ClearSelection,
    /// Ctrl-click: keep the current rectangle as an additional range.
    AddRange {
        start_row: i64,
        start_col: i64,
        end_row: i64,
        end_col: i64,
    },
    ScrollBy { dx: f64, dy: f64 },
    ScrollToCell {
        row: i64,
        col: i64,
        #[serde(default)]
        center: bool,
    },
    ScrollToPosition { x: f64, y: f64 },
    SetViewportDimensions { width: f64, height: f64 },
    /// A non-positive width resets the column to the default.
    SetColumnWidth { col: i64, width: f64 },
    /// A non-positive height resets the row to the default.
    SetRowHeight { row: i64, height: f64 },
    /// Replace every override, e.g. on document load.
    SetAllDimensions {
        #[serde(default)]
        column_widths: BTreeMap<u32, f64>,
        #[serde(default)]
        row_heights: BTreeMap<u32, f64>,
    },
    /// Explicit known extent, e.g. the used range of a loaded document.
    SetVirtualBounds { max_row: i64, max_col: i64 },
    /// Back to the bounds of a fresh document.
    ResetVirtualBounds,
    /// Latest `(rowCount, colCount)` polled from the backend.
    SetUsedRange { row_count: u32, col_count: u32 },
}

impl Intent {
    /// Whether this intent can change the selection.
    pub fn touches_selection(&self) -> bool {
        matches!(
            self,
            Intent::SetSelection { .. }
                | Intent::ExtendSelection { .. }
                | Intent::MoveSelection { .. }
                | Intent::SelectRow { .. }
                | Intent::SelectColumn { .. }
                | Intent::SelectAll
                | Intent::ClearSelection
                | Intent::AddRange { .. }
        )
    }
}

bitflags! {
    /// Which parts of the snapshot an applied intent changed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateChange: u32 {
        const SCROLL = 1;
        const BOUNDS = 1 << 1;
        const SELECTION = 1 << 2;
        const DIMENSIONS = 1 << 3;
        const VIEWPORT_SIZE = 1 << 4;
        const USED_RANGE = 1 << 5;
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

    #[test]
    fn test_intent_from_json() {
        let intent: Intent =
            serde_json::from_str(r#"{"type": "moveSelection", "deltaRow": -3, "deltaCol": 0}"#)
                .unwrap();
        assert_eq!(
            intent,
            Intent::MoveSelection {
                delta_row: -3,
                delta_col: 0,
                extend: false
            }
        );
    }

    #[test]
    fn test_selection_kind_in_json() {
        let intent: Intent = serde_json::from_str(
            r#"{"type": "setSelection", "startRow": 0, "startCol": 2, "endRow": 0, "endCol": 2, "kind": "columns"}"#,
        )
        .unwrap();
        assert!(matches!(
            intent,
            Intent::SetSelection {
                kind: SelectionKind::Columns,
                ..
            }
        ));
        assert!(intent.touches_selection());
    }

    #[test]
    fn test_dimension_maps_from_json() {
        let intent: Intent = serde_json::from_str(
            r#"{"type": "setAllDimensions", "columnWidths": {"3": 140.5}}"#,
        )
        .unwrap();
        let Intent::SetAllDimensions {
            column_widths,
            row_heights,
        } = intent
        else {
            panic!("wrong variant");
        };
        assert_eq!(column_widths.get(&3), Some(&140.5));
        assert!(row_heights.is_empty());
    }

    #[test]
    fn test_unit_variant_from_json() {
        let intent: Intent = serde_json::from_str(r#"{"type": "selectAll"}"#).unwrap();
        assert_eq!(intent, Intent::SelectAll);
        assert!(!Intent::ResetVirtualBounds.touches_selection());
    }
}
