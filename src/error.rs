//! Structured error types for progrid.
//!
//! The engines themselves never fail; these errors only surface at the data
//! boundaries (decoding rows, column definitions and options).

/// All errors that can occur while loading data into the grid core.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// JSON decoding error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Row data was not an array of objects.
    #[error("Invalid row data: {0}")]
    InvalidRows(String),

    /// A column definition could not be resolved.
    #[error("Invalid column definition: {0}")]
    InvalidColumn(String),

    /// Conversion to or from a JavaScript value failed.
    #[error("JS conversion: {0}")]
    Js(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for GridError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Js(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
