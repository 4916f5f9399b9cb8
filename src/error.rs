//! Structured error types for scigrid.
//!
//! Only construction-time failures are fatal. Interaction paths degrade
//! silently and never surface these to the host.

/// All errors that can occur while building or driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The canvas 2D context could not be acquired.
    #[error("Canvas error: {0}")]
    Canvas(String),

    /// A DOM element could not be created or attached.
    #[error("DOM error: {0}")]
    Dom(String),

    /// A config object or patch did not match the recognized options.
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// Conversion between Rust and JS values failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The data provider object is missing a required method.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for GridError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
