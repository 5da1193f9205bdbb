// Typed errors with thiserror. Surface meaningful messages to JS.
// Errors stay local to the component that raised them.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Engine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load frame {frame_number}. Check console & path: {path_prefix}")]
    FrameLoad {
        frame_number: u32,
        path_prefix: String,
    },

    #[error("Element with ID \"{0}\" not found")]
    MissingElement(String),

    #[error("Browser API error: {0}")]
    Dom(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
