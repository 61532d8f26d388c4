//! Session store.
//!
//! The single source of truth for "is the user signed in". Token and username
//! are always written and cleared together in one storage batch. Nothing is
//! cached: every check reads both slots from durable storage, so a clear made
//! by any holder of the storage (the request pipeline on a 401, another
//! storefront instance, another process on the same state file) is seen on
//! the next access.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info, warn};

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::storage::{DurableStorage, StorageError, keys};

/// A signed-in user's credential.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    username: String,
}

impl Session {
    /// Pair a bearer token with the username it was issued for.
    #[must_use]
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            username: username.into(),
        }
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// The username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

/// Shared session store over durable storage.
///
/// Cheap to clone; every clone, and every store over the same storage, sees
/// the same session.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
}

impl SessionStore {
    /// Open the session persisted in `storage`.
    ///
    /// If only one of the token and username slots is present the stored
    /// state is inconsistent; both slots are cleared and the user starts
    /// signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read, or cannot be repaired.
    pub fn load(storage: Arc<dyn DurableStorage>) -> Result<Self, StorageError> {
        if let Some(session) = read_session(storage.as_ref())? {
            set_sentry_user(session.username());
        }
        Ok(Self { storage })
    }

    /// Store a new session.
    ///
    /// Both slots are persisted in one write, so a storage failure leaves
    /// the previous session in place.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be written.
    pub fn set_session(&self, token: &str, username: &str) -> Result<(), StorageError> {
        self.storage
            .set_all(&[(keys::TOKEN, token), (keys::USERNAME, username)])?;

        set_sentry_user(username);
        add_breadcrumb("auth", "Signed in", Some(&[("username", username)]));
        info!(username = %username, "Session started");
        Ok(())
    }

    /// End the session by removing both slots in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be written; the stored
    /// session is then unchanged.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let had_session = self.current().is_some();

        self.storage.remove_all(&[keys::TOKEN, keys::USERNAME])?;

        clear_sentry_user();
        if had_session {
            add_breadcrumb("auth", "Signed out", None);
            info!("Session cleared");
        }
        Ok(())
    }

    /// True iff a complete session is stored right now.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.current().map(|session| session.token)
    }

    /// The signed-in username, if any.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.current().map(|session| session.username)
    }

    /// A snapshot of the stored session, read fresh from storage.
    ///
    /// An unreadable store counts as signed out.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        read_session(self.storage.as_ref()).unwrap_or_else(|e| {
            error!(error = %e, "Failed to read stored session, treating as signed out");
            None
        })
    }

    /// The `Authorization` header value for the current session.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.current()
            .map(|session| format!("Bearer {}", session.token.expose_secret()))
    }
}

/// Read both slots; a half-present session is cleared and reads as absent.
fn read_session(storage: &dyn DurableStorage) -> Result<Option<Session>, StorageError> {
    let token = storage.get(keys::TOKEN)?.filter(|t| !t.is_empty());
    let username = storage.get(keys::USERNAME)?.filter(|u| !u.is_empty());

    match (token, username) {
        (Some(token), Some(username)) => Ok(Some(Session::new(token, username))),
        (None, None) => Ok(None),
        (token, username) => {
            warn!(
                has_token = token.is_some(),
                has_username = username.is_some(),
                "Stored session is incomplete, clearing"
            );
            storage.remove_all(&[keys::TOKEN, keys::USERNAME])?;
            Ok(None)
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}
