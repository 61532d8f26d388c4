//! Client-local durable storage.
//!
//! The storefront keeps three independent string slots across runs: the
//! session token, the username, and the pending redirect path. All reads and
//! writes go through the [`DurableStorage`] trait so the same session logic
//! works against an in-memory map (tests, embedding) or a JSON file on disk
//! (the command-line driver).
//!
//! Writes are batched: [`DurableStorage::set_all`] and
//! [`DurableStorage::remove_all`] apply every entry in one step, which is what
//! lets the session store keep token and username in lockstep.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage slot names.
pub mod keys {
    /// Bearer token of the signed-in user.
    pub const TOKEN: &str = "token";

    /// Username of the signed-in user.
    pub const USERNAME: &str = "username";

    /// Path an unauthenticated user was turned back from.
    pub const REDIRECT_PATH: &str = "redirectPath";
}

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored state could not be decoded or encoded.
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Key/value storage that survives process restarts.
pub trait DurableStorage: Send + Sync {
    /// Read a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write several slots in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written; in that case
    /// none of the entries are applied.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Remove several slots in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError>;

    /// Write a single slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_all(&[(key, value)])
    }

    /// Remove a single slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_all(&[key])
    }
}
