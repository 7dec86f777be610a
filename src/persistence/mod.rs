//! Per-user persistence of documents and selection addresses
//!
//! ## Modules
//!
//! - `records`: persisted layout (user records, selection maps)
//! - `memory`: in-process store
//! - `file`: JSON file store (native targets)
//! - `local_storage`: browser `localStorage` store (wasm32)

pub mod records;
pub mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use records::{FileMap, SelectionMap, UserRecord, UserTable};
pub use memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::errors::PersistenceError;
use crate::selection::SelectionAddress;

/// Backing store for user documents and selections.
///
/// Saves are last-write-wins per file name. A save for a user that does not
/// exist fails with `UserNotFound` and writes nothing.
pub trait UserStore {
    /// All files of a user (empty for unknown users)
    fn load(&self, user: &str) -> Result<FileMap, PersistenceError>;

    fn save(&mut self, user: &str, file_name: &str, content: &str) -> Result<(), PersistenceError>;

    fn load_selections(&self, user: &str) -> Result<SelectionMap, PersistenceError>;

    fn save_selections(&mut self, user: &str, selections: &SelectionMap) -> Result<(), PersistenceError>;

    /// Register a user; fails with `UserExists` for a taken name
    fn add_user(&mut self, user: &str, credential_secret: &str) -> Result<(), PersistenceError>;

    fn has_user(&self, user: &str) -> Result<bool, PersistenceError>;
}

/// Binds a store to the session user
pub struct PersistenceBridge {
    store: Box<dyn UserStore + Send>,
    user: String,
}

impl PersistenceBridge {
    pub fn new(user: impl Into<String>, store: Box<dyn UserStore + Send>) -> Self {
        Self {
            store,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn store_mut(&mut self) -> &mut (dyn UserStore + Send) {
        self.store.as_mut()
    }

    pub fn load_files(&self) -> Result<FileMap, PersistenceError> {
        self.store.load(&self.user)
    }

    /// Save content under a file name. Untitled windows (`None`) are not
    /// persisted; returns whether a save happened.
    pub fn persist_content(&mut self, file_name: Option<&str>, content: &str) -> Result<bool, PersistenceError> {
        let Some(file_name) = file_name else {
            return Ok(false);
        };
        self.store.save(&self.user, file_name, content)?;
        Ok(true)
    }

    /// Record the latest address for a window
    pub fn persist_selection(&mut self, window_id: &str, address: &SelectionAddress) -> Result<(), PersistenceError> {
        let mut selections = self.store.load_selections(&self.user)?;
        selections.insert(window_id.to_string(), address.clone());
        self.store.save_selections(&self.user, &selections)
    }

    /// Stored address for a window; storage failures read as "none"
    pub fn load_selection(&self, window_id: &str) -> Option<SelectionAddress> {
        match self.store.load_selections(&self.user) {
            Ok(mut selections) => selections.remove(window_id),
            Err(e) => {
                log::warn!("[WASM] could not load selections for {}: {}", self.user, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge").field("user", &self.user).finish()
    }
}
