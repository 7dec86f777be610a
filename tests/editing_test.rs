// Edit operations engine: undo, deletion, formatting, find/replace, signing

use richtext_editor_wasm::content::{DomPoint, LiveRange};
use richtext_editor_wasm::editing::{
    apply_inline_format, delete_backward, find_replace, insert_inline_object, insert_line_break,
    insert_text, sign, undo, FormatCommand, InlineObject, ReplaceOutcome, ReplaceScope,
};
use richtext_editor_wasm::errors::EditorError;
use richtext_editor_wasm::models::EditableWindow;

fn window_with(html: &str) -> EditableWindow {
    let mut window = EditableWindow::with_file("textWindow1", "doc", html, None);
    window.caret_to_end();
    window
}

fn select_text(window: &mut EditableWindow, start: usize, end: usize) {
    let c = &window.container;
    let range = LiveRange::new(c, c.point_at_text_offset(start), c.point_at_text_offset(end));
    window.set_selection(Some(range));
}

#[test]
fn test_typing_then_two_undos() {
    let mut window = window_with("");
    for ch in ["a", "b", "c"] {
        insert_text(&mut window, ch).unwrap();
    }
    assert_eq!(window.content(), "abc");

    assert!(undo(&mut window));
    assert!(undo(&mut window));
    assert_eq!(window.content(), "a");
}

#[test]
fn test_undo_on_empty_log_is_noop() {
    let mut window = window_with("keep");
    assert!(!undo(&mut window));
    assert!(!undo(&mut window));
    assert_eq!(window.content(), "keep");
}

#[test]
fn test_undo_puts_caret_at_end() {
    let mut window = window_with("xy");
    select_text(&mut window, 0, 0);
    insert_text(&mut window, "a").unwrap();
    assert_eq!(window.content(), "axy");

    undo(&mut window);
    let end = window.container.end_point();
    assert_eq!(window.selection().unwrap().start, end);
}

#[test]
fn test_delete_at_start_pushes_no_undo() {
    let mut window = window_with("abc");
    select_text(&mut window, 0, 0);

    assert!(!delete_backward(&mut window).unwrap());
    assert_eq!(window.content(), "abc");
    assert_eq!(window.undo.undo_count(), 0);
}

#[test]
fn test_delete_selection() {
    let mut window = window_with("hello world");
    select_text(&mut window, 5, 11);
    assert!(delete_backward(&mut window).unwrap());
    assert_eq!(window.content(), "hello");
}

#[test]
fn test_line_break_and_emoji() {
    let mut window = window_with("a");
    insert_line_break(&mut window).unwrap();
    insert_inline_object(&mut window, &InlineObject::emoji_with_style("smile.png", "width:20px")).unwrap();

    assert_eq!(
        window.content(),
        r#"a<br><img src="smile.png" alt="emoji" style="width:20px"> "#
    );
    assert_eq!(window.undo.undo_count(), 2);
}

#[test]
fn test_find_replace_whole_document() {
    let mut window = window_with("hello world");
    let outcome = find_replace(&mut window, "o", "0", ReplaceScope::Document).unwrap();

    assert_eq!(outcome, ReplaceOutcome::Replaced(2));
    assert_eq!(window.content(), "hell0 w0rld");
    assert!(window.undo.can_undo());
}

#[test]
fn test_find_replace_no_matches_keeps_undo_log() {
    let mut window = window_with("hello");
    let outcome = find_replace(&mut window, "z+", "y", ReplaceScope::Document).unwrap();

    assert_eq!(outcome, ReplaceOutcome::NoMatches);
    assert_eq!(window.content(), "hello");
    assert!(!window.undo.can_undo());
}

#[test]
fn test_find_replace_invalid_pattern() {
    let mut window = window_with("hello");
    let err = find_replace(&mut window, "(", "x", ReplaceScope::Document).unwrap_err();
    assert!(matches!(err, EditorError::InvalidPattern(_)));
    assert_eq!(window.content(), "hello");
}

#[test]
fn test_bold_wraps_selection() {
    let mut window = window_with("hello world");
    select_text(&mut window, 0, 5);

    apply_inline_format(&mut window, &FormatCommand::Bold).unwrap();
    assert_eq!(window.content(), "<b>hello</b> world");
}

#[test]
fn test_format_without_selection_fails() {
    let mut window = window_with("hello");
    select_text(&mut window, 2, 2);
    let err = apply_inline_format(&mut window, &FormatCommand::Italic).unwrap_err();
    assert_eq!(err, EditorError::EmptySelection("textWindow1".to_string()));
    assert!(!window.undo.can_undo());
}

#[test]
fn test_sign_document_appends_signature() {
    let mut window = window_with("Agreed.");
    assert!(sign(&mut window, "Dana", "").unwrap());
    assert!(window.content().starts_with("Agreed."));
    assert!(window.content().contains("Dana"));
    assert!(!window.content().contains(" on "));

    // empty signer does nothing
    let before = window.content();
    assert!(!sign(&mut window, "", "1/1/2024").unwrap());
    assert_eq!(window.content(), before);
}

#[test]
fn test_caret_after_insert_is_valid() {
    let mut window = window_with("<b>bold</b>");
    let b = window.container.child(window.container.root(), 0).unwrap();
    let text = window.container.child(b, 0).unwrap();
    window.set_selection(Some(LiveRange::caret(DomPoint::new(text, 2))));

    insert_text(&mut window, "X").unwrap();
    assert_eq!(window.content(), "<b>boXld</b>");
    let caret = window.selection().unwrap().start;
    assert!(window.container.is_valid_point(caret));
    assert_eq!(caret, DomPoint::new(text, 3));
}
