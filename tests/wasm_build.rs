//! WASM build test
//!
//! This module tests that the WASM module can be built and the exported
//! session API works in a browser.

#![cfg(target_arch = "wasm32")]

use richtext_editor_wasm::api::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_session_initialization() {
    assert!(init_session("wasm-user", None).is_ok());
}

#[wasm_bindgen_test]
fn test_typing_through_exports() {
    init_session("wasm-user", None).unwrap();
    assert!(on_key_press("h", "virtual").unwrap());
    assert!(on_key_press("i", "virtual").unwrap());
    assert_eq!(get_content("textWindow1").unwrap().as_deref(), Some("hi"));
}

#[wasm_bindgen_test]
fn test_unknown_window_is_ignored() {
    init_session("wasm-user", None).unwrap();
    assert!(on_window_focus("missing").is_ok());
    assert!(on_undo("missing").is_ok());
}

#[wasm_bindgen_test]
fn test_bad_key_source_is_rejected() {
    init_session("wasm-user", None).unwrap();
    assert!(on_key_press("a", "telepathic").is_err());
}
