//! Redirect intent tracker.
//!
//! Remembers the path an unauthenticated user was turned back from so the
//! next successful login can resume it. There is at most one pending intent;
//! a newer one overwrites the older. Consuming the intent clears it.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::navigation::HOME_PATH;
use crate::storage::{DurableStorage, StorageError, keys};

/// Shared redirect intent tracker backed by the `redirectPath` slot.
#[derive(Clone)]
pub struct RedirectIntents {
    storage: Arc<dyn DurableStorage>,
    /// Makes consume's read-then-clear a single step within the process.
    lock: Arc<Mutex<()>>,
}

impl RedirectIntents {
    /// Intents kept in `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            storage,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Record `path`, replacing any earlier intent.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be written.
    pub fn record_intent(&self, path: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(path = %path, "Recording redirect intent");
        self.storage.set(keys::REDIRECT_PATH, path)
    }

    /// Take the recorded path, or `/` when there is none, and clear it.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read or written.
    pub fn consume_intent(&self) -> Result<String, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self
            .storage
            .get(keys::REDIRECT_PATH)?
            .filter(|path| !path.is_empty());
        if path.is_some() {
            self.storage.remove(keys::REDIRECT_PATH)?;
        }
        Ok(path.unwrap_or_else(|| HOME_PATH.to_string()))
    }

    /// The recorded path without clearing it.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn peek_intent(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .get(keys::REDIRECT_PATH)?
            .filter(|path| !path.is_empty()))
    }
}

impl std::fmt::Debug for RedirectIntents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectIntents").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn intents() -> RedirectIntents {
        RedirectIntents::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_consume_is_read_once() {
        let intents = intents();
        intents.record_intent("/cart").unwrap();

        assert_eq!(intents.consume_intent().unwrap(), "/cart");
        assert_eq!(intents.consume_intent().unwrap(), "/");
    }

    #[test]
    fn test_default_when_nothing_recorded() {
        assert_eq!(intents().consume_intent().unwrap(), "/");
    }

    #[test]
    fn test_newer_intent_overwrites() {
        let intents = intents();
        intents.record_intent("/cart").unwrap();
        intents.record_intent("/orders").unwrap();
        assert_eq!(intents.consume_intent().unwrap(), "/orders");
    }

    #[test]
    fn test_peek_does_not_consume() {
        let intents = intents();
        intents.record_intent("/product/42").unwrap();

        assert_eq!(intents.peek_intent().unwrap().as_deref(), Some("/product/42"));
        assert_eq!(intents.consume_intent().unwrap(), "/product/42");
        assert_eq!(intents.peek_intent().unwrap(), None);
    }
}
