//! Shared helpers for WASM API operations
//!
//! This module contains common patterns for logging, serialization,
//! deserialization and error conversion across all API operations.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::errors::EditorError;

// ============================================================================
// Logging Macros
// ============================================================================
//
// Messages go through the `log` facade; on wasm32 `console_log` forwards
// them to the browser console, natively they reach whatever logger the host
// installed.

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        ::log::debug!("[WASM] {}", format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        ::log::info!("[WASM] {}", format!($($arg)*))
    };
}

/// Log a warning message with [WASM] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        ::log::warn!("[WASM] ⚠️ {}", format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        ::log::error!("[WASM] ❌ {}", format!($($arg)*))
    };
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        wasm_error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        wasm_error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert an editor error to a JsValue
pub fn editor_error(err: EditorError) -> JsValue {
    wasm_error!("{}", err);
    JsValue::from_str(&err.to_string())
}

/// Convert a validation failure to a JsValue
pub fn validation_error(msg: impl Into<String>) -> JsValue {
    let msg = msg.into();
    wasm_error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Treat a missing window as a no-op; everything else is an error.
/// The host may fire handlers for windows it is still tearing down.
pub fn ignore_missing<T: Default>(result: Result<T, EditorError>) -> Result<T, JsValue> {
    match result {
        Ok(value) => Ok(value),
        Err(EditorError::MissingContainer(id)) => {
            wasm_warn!("ignoring event for missing window '{}'", id);
            Ok(T::default())
        }
        Err(e) => Err(editor_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_missing_swallows_only_missing_window() {
        let missing: Result<bool, EditorError> = Err(EditorError::MissingContainer("w".to_string()));
        assert_eq!(ignore_missing(missing).ok(), Some(false));

        let ok: Result<bool, EditorError> = Ok(true);
        assert_eq!(ignore_missing(ok).ok(), Some(true));
    }
}
