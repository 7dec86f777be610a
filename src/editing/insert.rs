use serde::{Deserialize, Serialize};

use super::{live_selection, snapshot};
use crate::config::{EditorConfig, DEFAULT_EMOJI_STYLE, EMOJI_ALT};
use crate::content::{Element, LiveRange, NodeKind};
use crate::errors::EditorResult;
use crate::models::EditableWindow;

/// A non-text inline node (an emoji image)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineObject {
    pub src: String,
    pub alt: String,
    pub style: String,
}

impl InlineObject {
    pub fn emoji(src: impl Into<String>) -> Self {
        Self::emoji_with_style(src, DEFAULT_EMOJI_STYLE)
    }

    pub fn emoji_with_style(src: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: EMOJI_ALT.to_string(),
            style: style.into(),
        }
    }

    fn element(&self) -> Element {
        let mut img = Element::new("img").with_attr("src", self.src.as_str());
        if !self.alt.is_empty() {
            img.set_attr("alt", self.alt.as_str());
        }
        if !self.style.is_empty() {
            img.set_attr("style", self.style.as_str());
        }
        img
    }
}

/// Replace the selection with `text`; the caret ends right after it
pub fn insert_text(window: &mut EditableWindow, text: &str) -> EditorResult<()> {
    let range = live_selection(window)?;
    if text.is_empty() && range.is_collapsed() {
        return Ok(());
    }

    snapshot(window);
    let caret = window.container.delete_range(range);
    let caret = window.container.insert_text_at(caret, text);
    window.selection = Some(LiveRange::caret(caret));
    Ok(())
}

/// Replace the selection with an inline object followed by one space
pub fn insert_inline_object(window: &mut EditableWindow, object: &InlineObject) -> EditorResult<()> {
    let range = live_selection(window)?;

    snapshot(window);
    let caret = window.container.delete_range(range);
    let (_, after) = window.container.insert_node_at(caret, NodeKind::Element(object.element()));
    // trailing space keeps following text from touching the object
    let caret = window.container.insert_text_at(after, " ");
    window.selection = Some(LiveRange::caret(caret));
    Ok(())
}

/// Structural Enter: a `<br>` at the caret
pub fn insert_line_break(window: &mut EditableWindow) -> EditorResult<()> {
    let range = live_selection(window)?;

    snapshot(window);
    let caret = window.container.delete_range(range);
    let (_, after) = window.container.insert_node_at(caret, NodeKind::element("br"));
    window.selection = Some(LiveRange::caret(after));
    Ok(())
}

/// Structural Tab: the configured indent at the caret
pub fn insert_tab(window: &mut EditableWindow, config: &EditorConfig) -> EditorResult<()> {
    insert_text(window, &config.tab_text())
}
