//! Structured error types for xlgrid.
//!
//! Engine transitions never fail; these errors only surface from config
//! loading and from the external collaborators in [`crate::collab`].

/// All errors that can occur around the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum XlgridError {
    /// Invalid engine configuration.
    #[error("Invalid config: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Merge-region lookup failed.
    #[error("Merge lookup failed: {0}")]
    MergeLookup(String),

    /// Used-range lookup failed.
    #[error("Used range lookup failed: {0}")]
    UsedRange(String),

    /// Loading or persisting row/column dimensions failed.
    #[error("Dimension store: {0}")]
    Dimensions(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlgridError>;

#[cfg(target_arch = "wasm32")]
impl From<XlgridError> for wasm_bindgen::JsValue {
    fn from(e: XlgridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
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
    fn test_error_messages_name_the_source() {
        let err = XlgridError::MergeLookup("sheet not loaded".into());
        assert_eq!(err.to_string(), "Merge lookup failed: sheet not loaded");
        let err = XlgridError::Dimensions("quota".into());
        assert_eq!(err.to_string(), "Dimension store: quota");
    }

    #[test]
    fn test_json_errors_convert() {
        let parse: Result<u32> = serde_json::from_str::<u32>("nope").map_err(XlgridError::from);
        assert!(matches!(parse, Err(XlgridError::Json(_))));
    }
}
