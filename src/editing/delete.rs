use super::{live_selection, snapshot};
use crate::content::{DomPoint, LiveRange};
use crate::errors::EditorResult;
use crate::models::EditableWindow;

/// Delete the selection, or one unit before a collapsed caret.
///
/// Returns `false` for the no-op at the start of the content, in which case
/// no undo snapshot is pushed.
pub fn delete_backward(window: &mut EditableWindow) -> EditorResult<bool> {
    let range = live_selection(window)?;

    if !range.is_collapsed() {
        snapshot(window);
        let caret = window.container.delete_range(range);
        window.selection = Some(LiveRange::caret(caret));
        return Ok(true);
    }

    // delete_before only mutates when something precedes the caret
    let before = window.content();
    match window.container.delete_before(range.start) {
        Some(caret) => {
            window.undo.push(before);
            window.search = None;
            window.selection = Some(LiveRange::caret(caret));
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Empty the window (the host has already confirmed)
pub fn clear_all(window: &mut EditableWindow) {
    snapshot(window);
    window.container.clear();
    window.selection = Some(LiveRange::caret(DomPoint::new(window.container.root(), 0)));
}

/// Restore the most recent snapshot. The caret goes to the end of the
/// restored content. Returns `false` when there is nothing to undo.
pub fn undo(window: &mut EditableWindow) -> bool {
    let Some(snapshot) = window.undo.pop() else {
        return false;
    };
    window.replace_content(&snapshot.content);
    window.caret_to_end();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::insert::insert_text;

    fn window_with(html: &str) -> EditableWindow {
        let mut window = EditableWindow::with_file("textWindow1", "doc", html, None);
        window.caret_to_end();
        window
    }

    #[test]
    fn test_delete_one_character() {
        let mut window = window_with("abc");
        assert!(delete_backward(&mut window).unwrap());
        assert_eq!(window.content(), "ab");
        assert_eq!(window.undo.undo_count(), 1);
    }

    #[test]
    fn test_delete_at_start_is_noop() {
        let mut window = window_with("abc");
        let text = window.container.child(window.container.root(), 0).unwrap();
        window.set_selection(Some(LiveRange::caret(DomPoint::new(text, 0))));

        assert!(!delete_backward(&mut window).unwrap());
        assert_eq!(window.content(), "abc");
        assert!(!window.undo.can_undo());
    }

    #[test]
    fn test_delete_in_empty_window_is_noop() {
        let mut window = window_with("");
        assert!(!delete_backward(&mut window).unwrap());
        assert!(!window.undo.can_undo());
    }

    #[test]
    fn test_delete_selection() {
        let mut window = window_with("a<b>bc</b>d");
        let root = window.container.root();
        let a = window.container.child(root, 0).unwrap();
        let d = window.container.child(root, 2).unwrap();
        window.set_selection(Some(LiveRange::new(
            &window.container,
            DomPoint::new(a, 1),
            DomPoint::new(d, 0),
        )));

        assert!(delete_backward(&mut window).unwrap());
        assert_eq!(window.content(), "ad");
    }

    #[test]
    fn test_delete_whole_emoji() {
        let mut window = window_with("x<img src=\"e.png\" alt=\"emoji\">");
        assert!(delete_backward(&mut window).unwrap());
        assert_eq!(window.content(), "x");
    }

    #[test]
    fn test_clear_all_is_undoable() {
        let mut window = window_with("<b>keep</b>");
        clear_all(&mut window);
        assert_eq!(window.content(), "");
        assert!(undo(&mut window));
        assert_eq!(window.content(), "<b>keep</b>");
    }

    #[test]
    fn test_undo_restores_in_order() {
        let mut window = window_with("");
        for ch in ["a", "b", "c"] {
            insert_text(&mut window, ch).unwrap();
        }
        assert!(undo(&mut window));
        assert!(undo(&mut window));
        assert_eq!(window.content(), "a");

        // caret lands at end of content
        let caret = window.selection().unwrap().start;
        assert_eq!(window.container.text_offset_of(caret), 1);
    }

    #[test]
    fn test_undo_empty_log() {
        let mut window = window_with("abc");
        assert!(!undo(&mut window));
        assert_eq!(window.content(), "abc");
    }
}
