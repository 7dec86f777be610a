use super::records::{FileMap, SelectionMap, UserTable};
use super::UserStore;
use crate::errors::PersistenceError;

/// In-process store (tests, native hosts without storage)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: UserTable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one registered user
    pub fn with_user(username: &str) -> Self {
        let mut store = Self::new();
        // a fresh table cannot already hold the user
        let _ = store.table.add_user(username, "");
        store
    }

    pub fn table(&self) -> &UserTable {
        &self.table
    }
}

impl UserStore for MemoryStore {
    fn load(&self, user: &str) -> Result<FileMap, PersistenceError> {
        Ok(self.table.files(user))
    }

    fn save(&mut self, user: &str, file_name: &str, content: &str) -> Result<(), PersistenceError> {
        self.table.save_file(user, file_name, content)
    }

    fn load_selections(&self, user: &str) -> Result<SelectionMap, PersistenceError> {
        Ok(self.table.selections(user))
    }

    fn save_selections(&mut self, user: &str, selections: &SelectionMap) -> Result<(), PersistenceError> {
        self.table.set_selections(user, selections);
        Ok(())
    }

    fn add_user(&mut self, user: &str, credential_secret: &str) -> Result<(), PersistenceError> {
        self.table.add_user(user, credential_secret)
    }

    fn has_user(&self, user: &str) -> Result<bool, PersistenceError> {
        Ok(self.table.find(user).is_some())
    }
}
