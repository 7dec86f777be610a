//! Rich-text editor WASM API
//!
//! This module provides the JavaScript-facing API for the editor core.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for logging, serialization and error conversion
//! - `session`: Session lifecycle, input, editing, search and window/file operations

pub mod helpers;
pub mod session;

pub use session::*;
