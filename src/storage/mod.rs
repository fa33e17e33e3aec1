//! Durable key-value storage for the session
//!
//! The session occupies two string entries: the raw token and the
//! JSON-serialized user record. Only the session manager writes them.

pub mod sqlite;

use crate::error::StorageError;

pub use sqlite::SqliteStore;

/// Key holding the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-serialized user record
pub const USER_KEY: &str = "user";

/// Synchronous string key-value storage
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::default();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);

        store.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        store.remove(TOKEN_KEY).unwrap();
        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }
}
