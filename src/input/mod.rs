//! Keyboard input
//!
//! ## Modules
//!
//! - `keys`: logical keys, modifier state, key resolution order
//! - `layout`: virtual keyboard layouts (YAML)
//! - `router`: maps key events to edit actions for the active window

pub mod keys;
pub mod layout;
pub mod router;

pub use keys::{resolve_key, KeySource, KeyboardLanguage, LogicalKey, ModifierState, NavigationKey};
pub use layout::{default_layout, KeyMapping, KeyboardLayout};
pub use router::{DeferredTask, InputRouter, KeyAction};
