//! Signature blocks
//!
//! A selection with visible text is replaced by a bordered block holding a
//! copy of it plus the signature line; otherwise a signature line is
//! appended to the end of the content.

use serde::Serialize;

use super::{live_selection, snapshot};
use crate::content::{DomPoint, LiveRange};
use crate::errors::EditorResult;
use crate::models::EditableWindow;

const SIGNED_BLOCK_TEMPLATE: &str = include_str!("templates/signed_block.html.mustache");
const SIGNATURE_TEMPLATE: &str = include_str!("templates/signature.html.mustache");

#[derive(Serialize, Debug, Clone)]
pub struct SignatureContext {
    /// Escaped on render
    pub signer: String,
    pub date: String,
    pub has_date: bool,
    /// Signed fragment, inserted as markup
    pub content: Option<String>,
}

impl SignatureContext {
    pub fn new(signer: &str, date: &str) -> Self {
        Self {
            signer: signer.trim().to_string(),
            date: date.trim().to_string(),
            has_date: !date.trim().is_empty(),
            content: None,
        }
    }
}

fn render(template: &str, context: &SignatureContext) -> EditorResult<String> {
    let template = mustache::compile_str(template)?;
    let rendered = template.render_to_string(context)?;
    Ok(rendered.trim().to_string())
}

/// Text inside the selection, if it has any visible characters
fn selected_text(window: &EditableWindow) -> Option<LiveRange> {
    let range = live_selection(window).ok().filter(|r| !r.is_collapsed())?;
    let container = &window.container;
    let start = container.text_offset_of(range.start);
    let end = container.text_offset_of(range.end);
    let text: String = container
        .text_content(container.root())
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(range)
    }
}

/// Sign the selection or the whole document. An empty signer is a no-op
/// and returns `false`.
pub fn sign(window: &mut EditableWindow, signer: &str, date: &str) -> EditorResult<bool> {
    if signer.trim().is_empty() {
        return Ok(false);
    }
    let mut context = SignatureContext::new(signer, date);

    match selected_text(window) {
        Some(range) => {
            let (start, end) = window.container.split_at_boundaries(range);
            context.content = Some(window.container.fragment_html(start, end));
            let html = render(SIGNED_BLOCK_TEMPLATE, &context)?;

            snapshot(window);
            let caret = window.container.delete_range(LiveRange { start, end });
            let caret = window.container.insert_html_at(caret, &html);
            window.selection = Some(LiveRange::caret(caret));
        }
        None => {
            let html = render(SIGNATURE_TEMPLATE, &context)?;

            snapshot(window);
            let root = window.container.root();
            let at_end = DomPoint::new(root, window.container.children(root).len());
            let caret = window.container.insert_html_at(at_end, &html);
            window.selection = Some(LiveRange::caret(caret));
        }
    }
    Ok(true)
}
