//! Rich-text Editor WASM Module
//!
//! Core of a multi-window rich-text editor. Content lives in an arena tree
//! owned by Rust; selections survive re-renders and reloads as serializable
//! addresses; every edit is undoable and persisted per user.
//!
//! ## Modules
//!
//! - `content`: content tree, DOM-style points and ranges, tree mutation
//! - `selection`: selection addresses (capture) and the restorer
//! - `undo`: per-window snapshot log
//! - `editing`: the edit operations engine
//! - `input`: keyboard layouts, modifier state, key routing
//! - `persistence`: per-user document and selection stores
//! - `session`: host-facing handlers tying the above together
//! - `api`: wasm-bindgen exports

pub mod api;
pub mod config;
pub mod content;
pub mod editing;
pub mod errors;
pub mod input;
pub mod models;
pub mod persistence;
pub mod selection;
pub mod session;
pub mod undo;

// Re-export commonly used types
pub use config::EditorConfig;
pub use content::{Container, DomPoint, LiveRange, NodeId};
pub use errors::{EditorError, EditorResult, PersistenceError};
pub use models::{EditableWindow, EditorEvent, WindowId, WindowInfo};
pub use selection::{Fidelity, Restoration, SelectionAddress};
pub use session::EditorSession;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialized: {}", e).into());
    }

    log::info!("Rich-text editor WASM module initialized");
}
