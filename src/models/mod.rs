//! Models module for the rich-text editor
//!
//! Window state and the events the core emits to the host.

pub mod window;
pub mod events;

/// Window identifier (`textWindow<n>`)
pub type WindowId = String;

pub use window::{EditableWindow, WindowInfo, UNTITLED};
pub use events::EditorEvent;
