//! Editor configuration
//!
//! Every field has a default, so an empty YAML/JSON document is a valid
//! configuration. The keyboard layout falls back to the embedded default.

use serde::{Deserialize, Serialize};

use crate::errors::{EditorError, EditorResult};
use crate::input::layout::{default_layout, KeyboardLayout};

/// Inline style applied to emoji images
pub const DEFAULT_EMOJI_STYLE: &str =
    "width:20px;height:20px;display:inline-block;vertical-align:middle;margin:0 2px;";

/// Alt text marking an inserted emoji image
pub const EMOJI_ALT: &str = "emoji";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum undo snapshots per window (`None` = unbounded)
    pub undo_limit: Option<usize>,

    /// Number of spaces inserted by Tab
    pub tab_width: usize,

    /// Inline style for emoji images
    pub emoji_style: String,

    /// Leave physical Enter/Tab to the platform (arrows always are).
    /// Only for hosts that read the edited DOM back; off by default so
    /// line breaks and indents land in the content tree.
    pub native_navigation_keys: bool,

    /// Virtual keyboard layout; `None` uses the embedded default
    pub layout: Option<KeyboardLayout>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: None,
            tab_width: 4,
            emoji_style: DEFAULT_EMOJI_STYLE.to_string(),
            native_navigation_keys: false,
            layout: None,
        }
    }
}

impl EditorConfig {
    pub fn from_yaml_str(yaml: &str) -> EditorResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| EditorError::Config(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Text inserted for a structural Tab
    pub fn tab_text(&self) -> String {
        " ".repeat(self.tab_width)
    }

    /// Active keyboard layout
    pub fn layout(&self) -> &KeyboardLayout {
        self.layout.as_ref().unwrap_or_else(|| default_layout())
    }
}
