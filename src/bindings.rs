//! WebAssembly bindings.
//!
//! The host drives the engine with JSON-shaped intents and reads snapshots
//! back as plain JS objects.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::collab::MergeTable;
use crate::config::EngineConfig;
use crate::engine::{GridEngine, Intent, SubscriptionId};
use crate::types::CellRange;

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Grid engine handle for JavaScript.
#[wasm_bindgen]
pub struct XlGrid {
    engine: GridEngine,
    change_subscription: Option<SubscriptionId>,
}

#[wasm_bindgen]
impl XlGrid {
    /// Create an engine. `config` may be `undefined` or a partial config
    /// object; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the config is malformed or invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<XlGrid, JsValue> {
        console_error_panic_hook::set_once();

        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
        };
        Ok(XlGrid {
            engine: GridEngine::new(config)?,
            change_subscription: None,
        })
    }

    /// Apply one intent, e.g. `{type: "moveSelection", deltaRow: 1, deltaCol: 0}`.
    /// Returns the change bitset.
    ///
    /// # Errors
    /// Returns an error if `intent` is not a known intent shape.
    #[wasm_bindgen]
    pub fn dispatch(&mut self, intent: JsValue) -> Result<u32, JsValue> {
        let intent: Intent = serde_wasm_bindgen::from_value(intent)
            .map_err(|e| JsValue::from_str(&format!("Invalid intent: {e}")))?;
        Ok(self.engine.dispatch(intent).bits())
    }

    /// The full state snapshot.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.state())
    }

    /// Vertical and horizontal thumb geometry.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen]
    pub fn scrollbars(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.scrollbars())
    }

    /// Rows and columns to draw, with smooth-scroll offsets.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen]
    pub fn visible_range(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.visible_range())
    }

    /// `[row, col]` under a surface point, or `undefined` over the headers.
    #[wasm_bindgen]
    pub fn cell_at_point(&self, x: f64, y: f64) -> Option<Vec<u32>> {
        self.engine
            .cell_at_point(x, y)
            .map(|(row, col)| vec![row, col])
    }

    /// Replace the merged regions of the active sheet. `regions` is an
    /// array of `{startRow, startCol, endRow, endCol}`.
    ///
    /// # Errors
    /// Returns an error if `regions` has the wrong shape.
    #[wasm_bindgen]
    pub fn set_merged_regions(&mut self, regions: JsValue) -> Result<(), JsValue> {
        let regions: Vec<CellRange> = serde_wasm_bindgen::from_value(regions)
            .map_err(|e| JsValue::from_str(&format!("Invalid merged regions: {e}")))?;
        self.engine
            .set_merge_lookup(Some(Box::new(MergeTable::new(regions))));
        Ok(())
    }

    /// Called with the change bitset after every intent that changed
    /// something. Pass `undefined` to remove.
    #[wasm_bindgen]
    pub fn set_change_callback(&mut self, callback: Option<Function>) {
        if let Some(id) = self.change_subscription.take() {
            self.engine.unsubscribe(id);
        }
        if let Some(callback) = callback {
            let id = self.engine.subscribe(move |_state, change| {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from(change.bits()));
            });
            self.change_subscription = Some(id);
        }
    }

    /// Start over for a new document.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> u32 {
        self.engine.reset().bits()
    }
}
