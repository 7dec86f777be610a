//! Virtual keyboard layouts
//!
//! A layout is a list of rows of `KeyMapping`s loaded from YAML. The
//! default layout is embedded in the binary and parsed once.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EditorError, EditorResult};

const DEFAULT_LAYOUT_YAML: &str = include_str!("layouts/default.yaml");

static DEFAULT_LAYOUT: Lazy<KeyboardLayout> = Lazy::new(|| {
    KeyboardLayout::from_yaml_str(DEFAULT_LAYOUT_YAML).unwrap_or_else(|e| {
        log::error!("[WASM] embedded keyboard layout is invalid: {}", e);
        KeyboardLayout::default()
    })
});

/// Mappings for one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMapping {
    /// Key label (what the key produces unmodified)
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// Non-Latin mapping used when the secondary language is active
    #[serde(default, alias = "fourth", skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub rows: Vec<Vec<KeyMapping>>,
}

impl KeyboardLayout {
    pub fn from_yaml_str(yaml: &str) -> EditorResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Find the mapping for a key label (case-insensitive)
    pub fn find(&self, key: &str) -> Option<&KeyMapping> {
        let wanted = key.to_lowercase();
        self.rows
            .iter()
            .flatten()
            .find(|mapping| mapping.key.to_lowercase() == wanted)
    }

    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// The embedded default layout
pub fn default_layout() -> &'static KeyboardLayout {
    &DEFAULT_LAYOUT
}
