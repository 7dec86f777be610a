//! Edit operations engine
//!
//! Every operation follows the same sequence: check preconditions, push an
//! undo snapshot, mutate the container, set the new live selection. An
//! operation that returns an error has neither pushed a snapshot nor
//! mutated content. Capturing the selection address and persisting the
//! content afterwards is the session's job.
//!
//! ## Modules
//!
//! - `insert`: text, inline objects (emoji), line breaks, tabs
//! - `delete`: delete backward, clear all, undo
//! - `format`: inline formatting commands
//! - `find_replace`: regex find/replace over the selection or document
//! - `search`: case-insensitive search with result navigation
//! - `sign`: signature blocks

pub mod insert;
pub mod delete;
pub mod format;
pub mod find_replace;
pub mod search;
pub mod sign;

pub use insert::{insert_inline_object, insert_line_break, insert_tab, insert_text, InlineObject};
pub use delete::{clear_all, delete_backward, undo};
pub use format::{apply_inline_format, FontSize, FormatCommand};
pub use find_replace::{find_replace, ReplaceOutcome, ReplaceScope};
pub use search::{find_matches, search, search_next, search_previous, SearchMatch, SearchState};
pub use sign::{sign, SignatureContext};

use crate::content::LiveRange;
use crate::errors::{EditorError, EditorResult};
use crate::models::EditableWindow;

/// Live selection of a window, collapsed or not
pub(crate) fn live_selection(window: &EditableWindow) -> EditorResult<LiveRange> {
    window
        .selection
        .filter(|range| {
            window.container.is_valid_point(range.start) && window.container.is_valid_point(range.end)
        })
        .ok_or_else(|| EditorError::NoSelection(window.id.clone()))
}

/// Live selection of a window that must cover something
pub(crate) fn live_range(window: &EditableWindow) -> EditorResult<LiveRange> {
    let range = live_selection(window)?;
    if range.is_collapsed() {
        return Err(EditorError::EmptySelection(window.id.clone()));
    }
    Ok(range)
}

/// Push the pre-edit content; search results go stale with it
pub(crate) fn snapshot(window: &mut EditableWindow) {
    let content = window.content();
    window.undo.push(content);
    window.search = None;
}
