//! WASM API for the editor session
//!
//! JavaScript drives the editor through these camelCase exports. The
//! session is owned here in WASM memory; the host only forwards events
//! (keys, clicks, focus changes, native selection changes) and renders what
//! `takeEvents` returns.

use lazy_static::lazy_static;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, editor_error, ignore_missing, serialize, validation_error};
use crate::config::EditorConfig;
use crate::editing::{FormatCommand, ReplaceOutcome, ReplaceScope};
use crate::input::{KeyAction, KeySource};
use crate::persistence::UserStore;
use crate::selection::PathPoint;
use crate::session::EditorSession;
use crate::{wasm_info, wasm_log};

// WASM-owned session (canonical source of truth)
lazy_static! {
    static ref SESSION: Mutex<Option<EditorSession>> = Mutex::new(None);
}

fn with_session<T>(f: impl FnOnce(&mut EditorSession) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mut guard = SESSION
        .lock()
        .map_err(|e| validation_error(format!("Session lock poisoned: {}", e)))?;
    let session = guard
        .as_mut()
        .ok_or_else(|| validation_error("Session not initialized"))?;
    f(session)
}

#[cfg(target_arch = "wasm32")]
fn default_store(_user: &str) -> Box<dyn UserStore + Send> {
    Box::new(crate::persistence::LocalStorageStore::new())
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store(user: &str) -> Box<dyn UserStore + Send> {
    Box::new(crate::persistence::MemoryStore::with_user(user))
}

fn parse_source(source: &str) -> Result<KeySource, JsValue> {
    match source.to_ascii_lowercase().as_str() {
        "virtual" => Ok(KeySource::Virtual),
        "physical" => Ok(KeySource::Physical),
        other => Err(validation_error(format!("Unknown key source: '{}'", other))),
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

/// Start a session for a logged-in user. `configYaml` overrides defaults.
#[wasm_bindgen(js_name = initSession)]
pub fn init_session(user: &str, config_yaml: Option<String>) -> Result<(), JsValue> {
    wasm_info!("initSession called: user={}", user);

    let config = match config_yaml.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(yaml) => EditorConfig::from_yaml_str(yaml).map_err(editor_error)?,
        None => EditorConfig::default(),
    };
    let session = EditorSession::new(user, default_store(user), config);

    let mut guard = SESSION
        .lock()
        .map_err(|e| validation_error(format!("Session lock poisoned: {}", e)))?;
    *guard = Some(session);
    Ok(())
}

/// Register a new user (signup)
#[wasm_bindgen(js_name = addUser)]
pub fn add_user(user: &str, credential_secret: &str) -> Result<(), JsValue> {
    let mut store = default_store(user);
    store.add_user(user, credential_secret).map_err(|e| editor_error(e.into()))
}

/// Returns `true` only the first time; install the physical keyboard
/// listener when it does.
#[wasm_bindgen(js_name = registerPhysicalListener)]
pub fn register_physical_listener() -> Result<bool, JsValue> {
    with_session(|s| Ok(s.register_physical_listener()))
}

/// Drain pending events (content, selection, search, window changes)
#[wasm_bindgen(js_name = takeEvents)]
pub fn take_events() -> Result<JsValue, JsValue> {
    with_session(|s| serialize(&s.take_events(), "Serialization error"))
}

/// Run deferred work; call on the tick after native key handling
#[wasm_bindgen]
pub fn tick() -> Result<(), JsValue> {
    with_session(|s| {
        s.tick();
        Ok(())
    })
}

// ============================================================================
// Input
// ============================================================================

/// Key press from the virtual or physical keyboard. Returns whether the
/// editor consumed the key (the host should then prevent the default).
#[wasm_bindgen(js_name = onKeyPress)]
pub fn on_key_press(key: &str, source: &str) -> Result<bool, JsValue> {
    let source = parse_source(source)?;
    with_session(|s| {
        let action = ignore_missing(s.on_key_press(key, source).map(Some))?;
        wasm_log!("onKeyPress '{}' -> {:?}", key, action);
        Ok(!matches!(action, None | Some(KeyAction::Native) | Some(KeyAction::Ignored)))
    })
}

#[wasm_bindgen(js_name = onKeyRelease)]
pub fn on_key_release(key: &str) -> Result<(), JsValue> {
    with_session(|s| {
        s.on_key_release(key);
        Ok(())
    })
}

#[wasm_bindgen(js_name = onEmojiSelected)]
pub fn on_emoji_selected(src: &str) -> Result<(), JsValue> {
    with_session(|s| ignore_missing(s.on_emoji_selected(src)))
}

/// Apply an inline format (`bold`, `foreColor`, `fontSize`, ...)
#[wasm_bindgen(js_name = onFormatCommand)]
pub fn on_format_command(command: &str, value: Option<String>) -> Result<(), JsValue> {
    let command = FormatCommand::parse(command, value.as_deref())
        .ok_or_else(|| validation_error(format!("Unknown format command: '{}'", command)))?;
    with_session(|s| ignore_missing(s.on_format_command(&command)))
}

/// Replace every match of `pattern`; returns the replacement count
#[wasm_bindgen(js_name = onFindReplace)]
pub fn on_find_replace(pattern: &str, replacement: &str, scope: JsValue) -> Result<usize, JsValue> {
    let scope: ReplaceScope = if scope.is_undefined() || scope.is_null() {
        ReplaceScope::default()
    } else {
        deserialize(scope, "Invalid replace scope")?
    };
    with_session(|s| {
        let outcome = ignore_missing(s.on_find_replace(pattern, replacement, scope).map(Some))?;
        Ok(match outcome {
            Some(ReplaceOutcome::Replaced(count)) => count,
            _ => 0,
        })
    })
}

#[wasm_bindgen(js_name = onUndo)]
pub fn on_undo(window_id: &str) -> Result<bool, JsValue> {
    with_session(|s| ignore_missing(s.on_undo(window_id)))
}

/// Empty a window; the host asks the user for confirmation first
#[wasm_bindgen(js_name = onClearRequested)]
pub fn on_clear_requested(window_id: &str) -> Result<(), JsValue> {
    with_session(|s| ignore_missing(s.on_clear_requested(window_id)))
}

#[wasm_bindgen(js_name = onWindowFocus)]
pub fn on_window_focus(window_id: &str) -> Result<(), JsValue> {
    with_session(|s| ignore_missing(s.on_window_focus(window_id)))
}

#[wasm_bindgen(js_name = onWindowBlur)]
pub fn on_window_blur(window_id: &str) -> Result<(), JsValue> {
    with_session(|s| ignore_missing(s.on_window_blur(window_id)))
}

/// Native selection change, as character offsets of the text content
#[wasm_bindgen(js_name = setSelection)]
pub fn set_selection(window_id: &str, start: usize, end: usize) -> Result<(), JsValue> {
    with_session(|s| ignore_missing(s.set_selection_offsets(window_id, start, end)))
}

/// Native selection change as `{path, offset}` boundary points (child
/// indices from the window root, as read off the DOM selection)
#[wasm_bindgen(js_name = setSelectionPath)]
pub fn set_selection_path(window_id: &str, start: JsValue, end: JsValue) -> Result<(), JsValue> {
    let start: PathPoint = deserialize(start, "Invalid selection start")?;
    let end: PathPoint = if end.is_undefined() || end.is_null() {
        start.clone()
    } else {
        deserialize(end, "Invalid selection end")?
    };
    with_session(|s| ignore_missing(s.set_selection_path(window_id, &start, &end)))
}

// ============================================================================
// Search and signing
// ============================================================================

#[wasm_bindgen]
pub fn search(pattern: &str) -> Result<usize, JsValue> {
    with_session(|s| s.search(pattern).map_err(editor_error))
}

#[wasm_bindgen(js_name = searchNext)]
pub fn search_next() -> Result<Option<usize>, JsValue> {
    with_session(|s| s.search_next().map_err(editor_error))
}

#[wasm_bindgen(js_name = searchPrevious)]
pub fn search_previous() -> Result<Option<usize>, JsValue> {
    with_session(|s| s.search_previous().map_err(editor_error))
}

/// Sign the selection (or the document); `date` defaults to today
#[wasm_bindgen]
pub fn sign(signer: &str, date: Option<String>) -> Result<bool, JsValue> {
    with_session(|s| ignore_missing(s.sign(signer, date.as_deref())))
}

// ============================================================================
// Windows and files
// ============================================================================

#[wasm_bindgen(js_name = addWindow)]
pub fn add_window() -> Result<String, JsValue> {
    with_session(|s| Ok(s.add_window()))
}

#[wasm_bindgen(js_name = closeWindow)]
pub fn close_window(window_id: &str) -> Result<(), JsValue> {
    with_session(|s| ignore_missing(s.close_window(window_id)))
}

#[wasm_bindgen(js_name = openFile)]
pub fn open_file(file_name: &str) -> Result<String, JsValue> {
    with_session(|s| s.open_file(file_name).map_err(editor_error))
}

/// Save a window; untitled windows need `fileName`
#[wasm_bindgen(js_name = saveWindow)]
pub fn save_window(window_id: &str, file_name: Option<String>) -> Result<String, JsValue> {
    with_session(|s| s.save_window(window_id, file_name.as_deref()).map_err(editor_error))
}

#[wasm_bindgen(js_name = listFiles)]
pub fn list_files() -> Result<JsValue, JsValue> {
    with_session(|s| {
        let files = s.list_files().map_err(editor_error)?;
        serialize(&files, "Serialization error")
    })
}

#[wasm_bindgen(js_name = listWindows)]
pub fn list_windows() -> Result<JsValue, JsValue> {
    with_session(|s| {
        let windows: Vec<_> = s.windows().map(|w| w.info()).collect();
        serialize(&windows, "Serialization error")
    })
}

#[wasm_bindgen(js_name = filterWindows)]
pub fn filter_windows(query: &str) -> Result<JsValue, JsValue> {
    with_session(|s| serialize(&s.filter_windows(query), "Serialization error"))
}

#[wasm_bindgen(js_name = getContent)]
pub fn get_content(window_id: &str) -> Result<Option<String>, JsValue> {
    with_session(|s| Ok(s.content(window_id)))
}
