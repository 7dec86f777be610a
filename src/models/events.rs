use serde::{Deserialize, Serialize};

use super::WindowId;
use crate::selection::SelectionAddress;

/// Notifications from the core to the host UI
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorEvent {
    /// Window content changed (edit, undo, clear, open)
    ContentChanged { window_id: WindowId, content: String },

    /// A fresh selection address was captured
    SelectionChanged {
        window_id: WindowId,
        address: SelectionAddress,
    },

    /// Find/replace applied `count` replacements
    ReplaceCompleted { window_id: WindowId, count: usize },

    /// Find/replace or search found nothing
    NoMatches { window_id: WindowId, pattern: String },

    /// Pattern failed to compile
    InvalidPattern { window_id: WindowId, message: String },

    /// Search results changed; `current` is the selected match index
    SearchUpdated {
        window_id: WindowId,
        count: usize,
        current: Option<usize>,
    },

    ActiveWindowChanged { window_id: Option<WindowId> },

    WindowClosed { window_id: WindowId },

    FileSaved { window_id: WindowId, file_name: String },

    /// A handler failed in a way the user should see
    Error { message: String },
}
