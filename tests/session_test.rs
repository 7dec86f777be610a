// Session flows: key routing, windows, files, search and persistence across reloads

use richtext_editor_wasm::editing::{FormatCommand, ReplaceOutcome, ReplaceScope};
use richtext_editor_wasm::input::{KeyAction, KeySource};
use richtext_editor_wasm::persistence::{FileStore, MemoryStore, UserStore};
use richtext_editor_wasm::selection::PathPoint;
use richtext_editor_wasm::{EditorConfig, EditorError, EditorEvent, EditorSession};
use tempfile::TempDir;

fn session() -> EditorSession {
    EditorSession::new("alice", Box::new(MemoryStore::with_user("alice")), EditorConfig::default())
}

fn type_text(session: &mut EditorSession, text: &str) {
    for ch in text.chars() {
        let key = if ch == ' ' { "Space".to_string() } else { ch.to_string() };
        session.on_key_press(&key, KeySource::Virtual).unwrap();
    }
}

fn file_session(dir: &TempDir) -> EditorSession {
    let path = dir.path().join("users.json");
    let mut store = FileStore::new(&path);
    if !store.has_user("alice").unwrap() {
        store.add_user("alice", "secret").unwrap();
    }
    EditorSession::new("alice", Box::new(store), EditorConfig::default())
}

#[test]
fn test_virtual_shift_and_language() {
    let mut s = session();
    s.on_key_press("Shift", KeySource::Virtual).unwrap();
    s.on_key_press("a", KeySource::Virtual).unwrap();
    s.on_key_release("Shift");
    s.on_key_press("a", KeySource::Virtual).unwrap();

    s.router_mut().modifiers_mut().toggle_language();
    s.on_key_press("a", KeySource::Virtual).unwrap();

    assert_eq!(s.content("textWindow1").as_deref(), Some("Aaש"));
}

#[test]
fn test_physical_undo_chord() {
    let mut s = session();
    type_text(&mut s, "abc");

    s.on_key_press("Control", KeySource::Physical).unwrap();
    assert_eq!(s.on_key_press("z", KeySource::Physical).unwrap(), KeyAction::Undo);
    assert_eq!(s.on_key_press("z", KeySource::Physical).unwrap(), KeyAction::Undo);
    s.on_key_release("Control");

    assert_eq!(s.content("textWindow1").as_deref(), Some("a"));
}

#[test]
fn test_backspace_and_enter() {
    let mut s = session();
    type_text(&mut s, "ab");
    s.on_key_press("Backspace", KeySource::Virtual).unwrap();
    s.on_key_press("Enter", KeySource::Virtual).unwrap();
    s.on_key_press("Tab", KeySource::Virtual).unwrap();

    assert_eq!(s.content("textWindow1").as_deref(), Some("a<br>    "));
}

#[test]
fn test_undo_with_nothing_to_undo() {
    let mut s = session();
    s.take_events();
    assert!(!s.on_undo("textWindow1").unwrap());
    assert!(s.take_events().is_empty());
}

#[test]
fn test_find_replace_events() {
    let mut s = session();
    type_text(&mut s, "hello world");
    s.take_events();

    let outcome = s.on_find_replace("o", "0", ReplaceScope::Document).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Replaced(2));
    assert_eq!(s.content("textWindow1").as_deref(), Some("hell0 w0rld"));
    assert!(s
        .take_events()
        .iter()
        .any(|e| matches!(e, EditorEvent::ReplaceCompleted { count: 2, .. })));

    assert_eq!(
        s.on_find_replace("q", "x", ReplaceScope::Document).unwrap(),
        ReplaceOutcome::NoMatches
    );
    assert!(matches!(s.take_events().as_slice(), [EditorEvent::NoMatches { .. }]));

    assert!(matches!(
        s.on_find_replace("(", "x", ReplaceScope::Document),
        Err(EditorError::InvalidPattern(_))
    ));
    assert!(matches!(s.take_events().as_slice(), [EditorEvent::InvalidPattern { .. }]));
    assert_eq!(s.content("textWindow1").as_deref(), Some("hell0 w0rld"));
}

#[test]
fn test_format_command_on_selection() {
    let mut s = session();
    type_text(&mut s, "hello world");
    s.set_selection_offsets("textWindow1", 6, 11).unwrap();

    s.on_format_command(&FormatCommand::Underline).unwrap();
    assert_eq!(s.content("textWindow1").as_deref(), Some("hello <u>world</u>"));
}

#[test]
fn test_search_cycles_matches() {
    let mut s = session();
    type_text(&mut s, "Abc abc ABC");

    assert_eq!(s.search("abc").unwrap(), 3);
    assert_eq!(s.search_next().unwrap(), Some(1));
    assert_eq!(s.search_next().unwrap(), Some(2));
    assert_eq!(s.search_next().unwrap(), Some(0));
    assert_eq!(s.search_previous().unwrap(), Some(2));

    s.take_events();
    assert_eq!(s.search("zzz").unwrap(), 0);
    assert!(s
        .take_events()
        .iter()
        .any(|e| matches!(e, EditorEvent::NoMatches { .. })));
}

#[test]
fn test_close_active_window_moves_focus() {
    let mut s = session();
    let second = s.add_window();
    assert_eq!(s.active_window_id(), Some(&second));

    s.close_window(&second).unwrap();
    assert_eq!(s.active_window_id().map(String::as_str), Some("textWindow1"));

    s.close_window("textWindow1").unwrap();
    assert_eq!(s.active_window_id(), None);
    assert_eq!(s.windows().count(), 0);
}

#[test]
fn test_events_for_missing_window_change_nothing() {
    let mut s = session();
    type_text(&mut s, "x");
    s.take_events();

    assert!(matches!(s.on_undo("nope"), Err(EditorError::MissingContainer(_))));
    assert!(matches!(s.on_window_blur("nope"), Err(EditorError::MissingContainer(_))));
    assert!(matches!(s.set_selection_offsets("nope", 0, 0), Err(EditorError::MissingContainer(_))));
    assert!(s.take_events().is_empty());
    assert_eq!(s.content("textWindow1").as_deref(), Some("x"));
}

#[test]
fn test_clear_is_undoable() {
    let mut s = session();
    type_text(&mut s, "draft");
    s.on_clear_requested("textWindow1").unwrap();
    assert_eq!(s.content("textWindow1").as_deref(), Some(""));

    assert!(s.on_undo("textWindow1").unwrap());
    assert_eq!(s.content("textWindow1").as_deref(), Some("draft"));
}

#[test]
fn test_save_and_open_file() {
    let mut s = session();
    type_text(&mut s, "first");
    s.save_window("textWindow1", Some("one.txt")).unwrap();

    let other = s.add_window();
    type_text(&mut s, "second");
    s.save_window(&other, Some("two.txt")).unwrap();

    assert_eq!(s.list_files().unwrap(), vec!["one.txt".to_string(), "two.txt".to_string()]);

    // opening loads into the active window
    let id = s.open_file("one.txt").unwrap();
    assert_eq!(id, other);
    assert_eq!(s.content(&other).as_deref(), Some("first"));
    assert_eq!(s.window(&other).unwrap().title(), "one.txt");
}

#[test]
fn test_edits_to_saved_file_persist_immediately() {
    let dir = TempDir::new().unwrap();
    let mut s = file_session(&dir);
    type_text(&mut s, "v1");
    s.save_window("textWindow1", Some("doc")).unwrap();
    type_text(&mut s, "!");

    let store = FileStore::new(dir.path().join("users.json"));
    let files = store.load("alice").unwrap();
    assert_eq!(files.get("doc").map(String::as_str), Some("v1!"));
}

#[test]
fn test_caret_restored_after_reload() {
    let dir = TempDir::new().unwrap();
    {
        let mut s = file_session(&dir);
        type_text(&mut s, "hello");
        s.save_window("textWindow1", Some("notes")).unwrap();
        s.set_selection_offsets("textWindow1", 2, 2).unwrap();
        s.on_window_blur("textWindow1").unwrap();
    }

    let mut s = file_session(&dir);
    s.open_file("notes").unwrap();
    type_text(&mut s, "X");
    assert_eq!(s.content("textWindow1").as_deref(), Some("heXllo"));
}

#[test]
fn test_stale_caret_after_reload_goes_to_end() {
    let dir = TempDir::new().unwrap();
    {
        let mut s = file_session(&dir);
        type_text(&mut s, "hello");
        s.save_window("textWindow1", Some("notes")).unwrap();
        s.set_selection_offsets("textWindow1", 1, 1).unwrap();
    }

    // content changed outside the session
    let mut store = FileStore::new(dir.path().join("users.json"));
    store.save("alice", "notes", "hello world").unwrap();

    let mut s = file_session(&dir);
    s.open_file("notes").unwrap();
    type_text(&mut s, "!");
    assert_eq!(s.content("textWindow1").as_deref(), Some("hello world!"));
}

#[test]
fn test_persistence_failure_is_reported_as_event() {
    // the session user has no record in the store
    let mut s = EditorSession::new("ghost", Box::new(MemoryStore::new()), EditorConfig::default());
    s.window_mut("textWindow1").unwrap().file_name = Some("doc".to_string());

    type_text(&mut s, "a");
    assert_eq!(s.content("textWindow1").as_deref(), Some("a"));
    assert!(s
        .take_events()
        .iter()
        .any(|e| matches!(e, EditorEvent::Error { .. })));
}

#[test]
fn test_config_from_yaml() {
    let config = EditorConfig::from_yaml_str("undo_limit: 2\ntab_width: 2\n").unwrap();
    let mut s = EditorSession::new("alice", Box::new(MemoryStore::with_user("alice")), config);

    type_text(&mut s, "abcd");
    s.on_key_press("Tab", KeySource::Virtual).unwrap();
    assert_eq!(s.content("textWindow1").as_deref(), Some("abcd  "));

    assert!(s.on_undo("textWindow1").unwrap());
    assert!(s.on_undo("textWindow1").unwrap());
    assert!(!s.on_undo("textWindow1").unwrap());
    assert_eq!(s.content("textWindow1").as_deref(), Some("abc"));
}

#[test]
fn test_physical_listener_registered_once() {
    let mut s = session();
    assert!(s.register_physical_listener());
    assert!(!s.register_physical_listener());
}

#[test]
fn test_physical_enter_and_tab_reach_the_content() {
    let mut s = session();
    s.on_key_press("a", KeySource::Physical).unwrap();
    assert_eq!(s.on_key_press("Enter", KeySource::Physical).unwrap(), KeyAction::LineBreak);
    s.tick();
    s.on_key_press("b", KeySource::Physical).unwrap();
    assert_eq!(s.on_key_press("Tab", KeySource::Physical).unwrap(), KeyAction::Tab);

    assert_eq!(s.content("textWindow1").as_deref(), Some("a<br>b    "));
    assert_eq!(s.router().pending_deferred(), 0);
}

#[test]
fn test_path_selection_after_line_break() {
    let mut s = session();
    type_text(&mut s, "a");
    s.on_key_press("Enter", KeySource::Virtual).unwrap();
    type_text(&mut s, "b");

    // start of the second line
    let start = PathPoint::new(vec![], 2);
    s.set_selection_path("textWindow1", &start, &start).unwrap();
    type_text(&mut s, "x");
    assert_eq!(s.content("textWindow1").as_deref(), Some("a<br>xb"));
}

#[test]
fn test_path_selection_after_emoji() {
    let mut s = session();
    type_text(&mut s, "hi");
    s.on_emoji_selected("smile.png").unwrap();

    let after_emoji = PathPoint::new(vec![], 2);
    s.set_selection_path("textWindow1", &after_emoji, &after_emoji).unwrap();
    type_text(&mut s, "x");

    let content = s.content("textWindow1").unwrap();
    assert!(content.starts_with("hi<img src=\"smile.png\""));
    assert!(content.ends_with(">x "));
}

#[test]
fn test_text_offsets_resolve_before_line_break() {
    let mut s = session();
    type_text(&mut s, "a");
    s.on_key_press("Enter", KeySource::Virtual).unwrap();
    type_text(&mut s, "b");

    s.set_selection_offsets("textWindow1", 1, 1).unwrap();
    type_text(&mut s, "x");
    assert_eq!(s.content("textWindow1").as_deref(), Some("ax<br>b"));
}

#[test]
fn test_find_replace_keeps_caret_after_line_break() {
    let mut s = session();
    type_text(&mut s, "a");
    s.on_key_press("Enter", KeySource::Physical).unwrap();

    s.on_find_replace("a", "z", ReplaceScope::Document).unwrap();
    type_text(&mut s, "q");
    assert_eq!(s.content("textWindow1").as_deref(), Some("z<br>q"));
}

#[test]
fn test_path_selection_for_missing_window() {
    let mut s = session();
    let point = PathPoint::new(vec![0], 0);
    assert!(matches!(
        s.set_selection_path("nope", &point, &point),
        Err(EditorError::MissingContainer(_))
    ));
}
