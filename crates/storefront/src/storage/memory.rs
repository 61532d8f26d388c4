use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{DurableStorage, StorageError};

/// In-memory storage for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            slots.insert((*key).to_owned(), (*value).to_owned());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            slots.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);

        storage
            .set_all(&[(keys::TOKEN, "abc"), (keys::USERNAME, "alice")])
            .unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("abc"));
        assert_eq!(storage.get(keys::USERNAME).unwrap().as_deref(), Some("alice"));

        storage.remove_all(&[keys::TOKEN, keys::USERNAME]).unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
        assert_eq!(storage.get(keys::USERNAME).unwrap(), None);
    }

    #[test]
    fn test_clones_share_slots() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set(keys::REDIRECT_PATH, "/cart").unwrap();
        assert_eq!(other.get(keys::REDIRECT_PATH).unwrap().as_deref(), Some("/cart"));
    }
}
