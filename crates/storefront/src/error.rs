//! Unified error handling with Sentry integration.
//!
//! Every fallible storefront operation returns [`StoreError`]. Page
//! controllers turn the authentication variants into redirects and every
//! other variant into view-local error state via [`StoreError::user_message`].

use shopcart_core::ValidationError;
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation needs a signed-in user and there is none.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The backend rejected the stored credential; the session has been
    /// cleared.
    #[error("authorization expired")]
    AuthorizationExpired,

    /// The backend rejected a username/password pair.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Form or argument validation failed before any request was made.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Backend request failed.
    #[error("API error: {0}")]
    Api(ApiError),

    /// Durable storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::AuthorizationExpired,
            other => Self::Api(other),
        }
    }
}

impl StoreError {
    /// Whether the failure is handled by redirecting to the login view.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::AuthenticationRequired | Self::AuthorizationExpired)
    }

    /// Whether retrying the same call may succeed (network or server trouble).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(ApiError::Http(_) | ApiError::RateLimited(_)) => true,
            Self::Api(ApiError::Status { status, .. }) => status.is_server_error(),
            _ => false,
        }
    }

    /// The message the backend attached to a rejected request, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api(ApiError::Status { message, .. }) if !message.is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// A message suitable for showing inline, without internal detail.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationRequired => "Please log in to continue.".to_string(),
            Self::AuthorizationExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            Self::InvalidCredentials => {
                "Invalid username or password. Please try again.".to_string()
            }
            Self::Validation(err) => validation_message(err),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::Api(ApiError::NotFound(_)) => "Not found.".to_string(),
            Self::Api(ApiError::RateLimited(_)) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            Self::Api(_) => self
                .server_message()
                .map_or_else(|| "Something went wrong. Please try again.".to_string(), String::from),
            Self::Storage(_) => "Could not save local state.".to_string(),
        }
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::PasswordMismatch => "Passwords do not match".to_string(),
        other => {
            let text = other.to_string();
            let mut chars = text.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Set the Sentry user context after sign-in.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out and forced expiry.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
