//! Browser `localStorage` store
//!
//! Layout: the `users` key holds the JSON array of user records and
//! `cursorPositions:<user>` holds that user's selection map. Storage is
//! looked up on every call so the store itself stays `Send`.

use web_sys::Storage;

use super::records::{FileMap, SelectionMap, UserRecord, UserTable};
use super::UserStore;
use crate::errors::PersistenceError;

const USERS_KEY: &str = "users";
const SELECTIONS_PREFIX: &str = "cursorPositions:";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

fn js_error(context: &str, err: wasm_bindgen::JsValue) -> PersistenceError {
    PersistenceError::Storage(format!("{}: {:?}", context, err))
}

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage, PersistenceError> {
        let window = web_sys::window().ok_or_else(|| PersistenceError::Storage("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| js_error("localStorage unavailable", e))?
            .ok_or_else(|| PersistenceError::Storage("localStorage unavailable".to_string()))
    }

    fn read_users(&self) -> Result<Vec<UserRecord>, PersistenceError> {
        let raw = self
            .storage()?
            .get_item(USERS_KEY)
            .map_err(|e| js_error("read users", e))?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_users(&self, users: &[UserRecord]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(users)?;
        self.storage()?
            .set_item(USERS_KEY, &json)
            .map_err(|e| js_error("write users", e))
    }

    /// Apply a change to the user table and write the records back
    fn update_users<F>(&self, f: F) -> Result<(), PersistenceError>
    where
        F: FnOnce(&mut UserTable) -> Result<(), PersistenceError>,
    {
        let mut table = UserTable {
            users: self.read_users()?,
            ..Default::default()
        };
        f(&mut table)?;
        self.write_users(&table.users)
    }
}

impl UserStore for LocalStorageStore {
    fn load(&self, user: &str) -> Result<FileMap, PersistenceError> {
        Ok(self
            .read_users()?
            .into_iter()
            .find(|u| u.username == user)
            .map(|u| u.files)
            .unwrap_or_default())
    }

    fn save(&mut self, user: &str, file_name: &str, content: &str) -> Result<(), PersistenceError> {
        self.update_users(|table| table.save_file(user, file_name, content))
    }

    fn load_selections(&self, user: &str) -> Result<SelectionMap, PersistenceError> {
        let key = format!("{}{}", SELECTIONS_PREFIX, user);
        let raw = self
            .storage()?
            .get_item(&key)
            .map_err(|e| js_error("read selections", e))?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(SelectionMap::new()),
        }
    }

    fn save_selections(&mut self, user: &str, selections: &SelectionMap) -> Result<(), PersistenceError> {
        let key = format!("{}{}", SELECTIONS_PREFIX, user);
        let json = serde_json::to_string(selections)?;
        self.storage()?
            .set_item(&key, &json)
            .map_err(|e| js_error("write selections", e))
    }

    fn add_user(&mut self, user: &str, credential_secret: &str) -> Result<(), PersistenceError> {
        self.update_users(|table| table.add_user(user, credential_secret))
    }

    fn has_user(&self, user: &str) -> Result<bool, PersistenceError> {
        Ok(self.read_users()?.iter().any(|u| u.username == user))
    }
}
