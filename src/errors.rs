//! Error types for editor operations
//!
//! Errors are split the same way the editor is: `EditorError` covers the
//! edit engine and session, `PersistenceError` covers the user stores.
//! A stale selection address is never an error (the restorer degrades to
//! end-of-content) and "no matches" is an outcome, not an error.

use thiserror::Error;

use crate::models::WindowId;

/// Errors raised by edit operations and session handlers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Find/replace or search pattern is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Operation targeted a window that has no live editable surface
    #[error("No editable window with id '{0}'")]
    MissingContainer(WindowId),

    /// Operation needs an active window but none is set
    #[error("No active window")]
    NoActiveWindow,

    /// Operation needs a live selection inside the container
    #[error("No selection in window '{0}'")]
    NoSelection(WindowId),

    /// Operation needs a non-empty selection
    #[error("Selection in window '{0}' is empty")]
    EmptySelection(WindowId),

    /// Untitled window saved without a file name
    #[error("A file name is required to save window '{0}'")]
    FileNameRequired(WindowId),

    /// Configuration or keyboard layout could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A content template failed to compile or render
    #[error("Template error: {0}")]
    Template(String),

    /// Underlying store failure
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors raised by user stores
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    /// Save targeted a user record that does not exist (no partial write happens)
    #[error("User \"{0}\" does not exist")]
    UserNotFound(String),

    /// Signup attempted for an existing username
    #[error("User \"{0}\" already exists")]
    UserExists(String),

    /// Backing storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Storage(err.to_string())
    }
}

impl From<mustache::Error> for EditorError {
    fn from(err: mustache::Error) -> Self {
        EditorError::Template(err.to_string())
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
