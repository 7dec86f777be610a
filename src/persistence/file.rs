//! JSON file store for native hosts
//!
//! The whole user table lives in one JSON file. Every write goes to a
//! sibling temp file first and is renamed over the original, so a failed
//! write never leaves a half-written table behind.

use std::fs;
use std::path::{Path, PathBuf};

use super::records::{FileMap, SelectionMap, UserTable};
use super::UserStore;
use crate::errors::PersistenceError;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<UserTable, PersistenceError> {
        if !self.path.exists() {
            return Ok(UserTable::default());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(UserTable::default());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn write_table(&self, table: &UserTable) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), PersistenceError>
    where
        F: FnOnce(&mut UserTable) -> Result<(), PersistenceError>,
    {
        let mut table = self.read_table()?;
        f(&mut table)?;
        self.write_table(&table)
    }
}

impl UserStore for FileStore {
    fn load(&self, user: &str) -> Result<FileMap, PersistenceError> {
        Ok(self.read_table()?.files(user))
    }

    fn save(&mut self, user: &str, file_name: &str, content: &str) -> Result<(), PersistenceError> {
        self.update(|table| table.save_file(user, file_name, content))
    }

    fn load_selections(&self, user: &str) -> Result<SelectionMap, PersistenceError> {
        Ok(self.read_table()?.selections(user))
    }

    fn save_selections(&mut self, user: &str, selections: &SelectionMap) -> Result<(), PersistenceError> {
        self.update(|table| {
            table.set_selections(user, selections);
            Ok(())
        })
    }

    fn add_user(&mut self, user: &str, credential_secret: &str) -> Result<(), PersistenceError> {
        self.update(|table| table.add_user(user, credential_secret))
    }

    fn has_user(&self, user: &str) -> Result<bool, PersistenceError> {
        Ok(self.read_table()?.find(user).is_some())
    }
}
