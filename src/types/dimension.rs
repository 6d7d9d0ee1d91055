use serde::{Deserialize, Serialize};

/// Axis of a dimension override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionType {
    Row,
    Column,
}

/// One row height or column width, as exchanged with the dimension store.
/// A non-positive `size` means "back to default".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionEntry {
    pub index: u32,
    pub size: f64,
    pub dimension_type: DimensionType,
}

impl DimensionEntry {
    pub fn column(index: u32, size: f64) -> Self {
        Self {
            index,
            size,
            dimension_type: DimensionType::Column,
        }
    }

    pub fn row(index: u32, size: f64) -> Self {
        Self {
            index,
            size,
            dimension_type: DimensionType::Row,
        }
    }

    /// Whether this entry records an override rather than a reset.
    pub fn is_override(&self) -> bool {
        self.size.is_finite() && self.size > 0.0
    }
}
