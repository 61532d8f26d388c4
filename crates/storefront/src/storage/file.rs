//! # JSON-file storage
//!
//! [`FileStorage`] persists the storage slots as a single JSON object:
//!
//! ```text
//! <state_dir>/
//! └── state.json     # {"token": "...", "username": "...", "redirectPath": "..."}
//! ```
//!
//! Every operation re-reads the file, so a change made by another process
//! (e.g. a second terminal signing out) is seen on the next access. Writes go
//! to a temporary sibling file which is then renamed over `state.json`, so a
//! batch is either fully applied or not at all.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{DurableStorage, StorageError};

const STATE_FILE: &str = "state.json";

/// Filesystem-backed storage for the command-line driver.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Storage rooted at `state_dir`; the directory is created on first write.
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(STATE_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Path of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(slots)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.read_slots()?;
        apply(&mut slots);
        self.write_slots(&slots)
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_slots()?.remove(key))
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|slots| {
            for (key, value) in entries {
                slots.insert((*key).to_owned(), (*value).to_owned());
            }
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.update(|slots| {
            for key in keys {
                slots.remove(*key);
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::new(dir.path())
            .set_all(&[(keys::TOKEN, "t-1"), (keys::USERNAME, "alice")])
            .unwrap();

        let reopened = FileStorage::new(dir.path());
        assert_eq!(reopened.get(keys::TOKEN).unwrap().as_deref(), Some("t-1"));
        assert_eq!(reopened.get(keys::USERNAME).unwrap().as_deref(), Some("alice"));
    }

    #[test]
    fn test_creates_nested_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(&nested);
        storage.set(keys::REDIRECT_PATH, "/orders").unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn test_remove_all_keeps_other_slots() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage
            .set_all(&[
                (keys::TOKEN, "t"),
                (keys::USERNAME, "u"),
                (keys::REDIRECT_PATH, "/cart"),
            ])
            .unwrap();
        storage.remove_all(&[keys::TOKEN, keys::USERNAME]).unwrap();

        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
        assert_eq!(storage.get(keys::REDIRECT_PATH).unwrap().as_deref(), Some("/cart"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STATE_FILE), b"not json").unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.get(keys::TOKEN),
            Err(StorageError::Format(_))
        ));
    }
}
