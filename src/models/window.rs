//! Editable window state
//!
//! An `EditableWindow` is one open editing surface: its content tree, undo
//! log, live selection and the last captured selection address. It is the
//! Rust-owned source of truth for that window.

use serde::{Deserialize, Serialize};

use super::WindowId;
use crate::content::{Container, LiveRange};
use crate::editing::search::SearchState;
use crate::selection::{self, Fidelity, SelectionAddress};
use crate::undo::UndoLog;

/// Title shown for windows without a bound file
pub const UNTITLED: &str = "Untitled";

#[derive(Clone, Debug)]
pub struct EditableWindow {
    pub id: WindowId,

    /// Bound file name (`None` = untitled)
    pub file_name: Option<String>,

    pub container: Container,

    pub undo: UndoLog,

    /// Live selection (if the surface has one)
    pub selection: Option<LiveRange>,

    /// Address captured after the last edit or selection change
    pub last_address: Option<SelectionAddress>,

    /// Active search results (if any)
    pub search: Option<SearchState>,
}

/// Serializable summary of a window for the host
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub file_name: Option<String>,
    pub title: String,
    pub can_undo: bool,
}

impl EditableWindow {
    /// Create an empty untitled window
    pub fn new(id: impl Into<WindowId>, undo_limit: Option<usize>) -> Self {
        Self {
            id: id.into(),
            file_name: None,
            container: Container::new(),
            undo: UndoLog::with_limit(undo_limit),
            selection: None,
            last_address: None,
            search: None,
        }
    }

    /// Create a window bound to a file with existing content
    pub fn with_file(
        id: impl Into<WindowId>,
        file_name: impl Into<String>,
        content: &str,
        undo_limit: Option<usize>,
    ) -> Self {
        let mut window = Self::new(id, undo_limit);
        window.file_name = Some(file_name.into());
        window.container.set_html(content);
        window
    }

    pub fn title(&self) -> &str {
        self.file_name.as_deref().unwrap_or(UNTITLED)
    }

    pub fn content(&self) -> String {
        self.container.to_html()
    }

    pub fn selection(&self) -> Option<&LiveRange> {
        self.selection.as_ref()
    }

    /// Set the live selection; an invalid range is dropped
    pub fn set_selection(&mut self, selection: Option<LiveRange>) {
        self.selection = selection.filter(|range| {
            self.container.is_valid_point(range.start) && self.container.is_valid_point(range.end)
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Replace the whole content (no undo snapshot); the selection is dropped
    pub fn replace_content(&mut self, html: &str) {
        self.container.set_html(html);
        self.selection = None;
        self.search = None;
    }

    /// Capture the current selection as an address and remember it
    pub fn capture_address(&mut self) -> Option<SelectionAddress> {
        let address = selection::capture(&self.container, self.selection.as_ref());
        if address.is_some() {
            self.last_address = address.clone();
        }
        address
    }

    /// Restore the live selection from an address
    pub fn restore_address(&mut self, address: Option<&SelectionAddress>) -> Option<Fidelity> {
        let restored = selection::restore(&self.container, address)?;
        self.selection = Some(restored.range);
        Some(restored.fidelity)
    }

    /// Place the caret at the end of the content
    pub fn caret_to_end(&mut self) {
        self.selection = Some(LiveRange::caret(self.container.end_point()));
    }

    pub fn info(&self) -> WindowInfo {
        WindowInfo {
            id: self.id.clone(),
            file_name: self.file_name.clone(),
            title: self.title().to_string(),
            can_undo: self.undo.can_undo(),
        }
    }
}
