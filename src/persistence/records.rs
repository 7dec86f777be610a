use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::PersistenceError;
use crate::models::WindowId;
use crate::selection::SelectionAddress;

/// file name -> serialized content
pub type FileMap = BTreeMap<String, String>;

/// window id -> last captured selection address
pub type SelectionMap = BTreeMap<WindowId, SelectionAddress>;

/// Stored user record
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,

    /// Stored as given; never checked by the editor
    #[serde(rename = "password")]
    pub credential_secret: String,

    #[serde(default)]
    pub files: FileMap,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, credential_secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            credential_secret: credential_secret.into(),
            files: FileMap::new(),
        }
    }
}

/// Everything a store holds: user records plus per-user selections
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserTable {
    #[serde(default)]
    pub users: Vec<UserRecord>,

    #[serde(default, rename = "cursorPositions")]
    pub selections: BTreeMap<String, SelectionMap>,
}

impl UserTable {
    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|u| u.username == username)
    }

    /// Files of a user (empty for unknown users)
    pub fn files(&self, username: &str) -> FileMap {
        self.find(username).map(|u| u.files.clone()).unwrap_or_default()
    }

    /// Write one file, overwriting any previous content
    pub fn save_file(&mut self, username: &str, file_name: &str, content: &str) -> Result<(), PersistenceError> {
        let user = self
            .find_mut(username)
            .ok_or_else(|| PersistenceError::UserNotFound(username.to_string()))?;
        user.files.insert(file_name.to_string(), content.to_string());
        Ok(())
    }

    pub fn add_user(&mut self, username: &str, credential_secret: &str) -> Result<(), PersistenceError> {
        if self.find(username).is_some() {
            return Err(PersistenceError::UserExists(username.to_string()));
        }
        self.users.push(UserRecord::new(username, credential_secret));
        Ok(())
    }

    pub fn selections(&self, username: &str) -> SelectionMap {
        self.selections.get(username).cloned().unwrap_or_default()
    }

    pub fn set_selections(&mut self, username: &str, selections: &SelectionMap) {
        self.selections.insert(username.to_string(), selections.clone());
    }
}
