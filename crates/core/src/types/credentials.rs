//! Account credential types and form validation.
//!
//! Everything here runs before a request is built: a form that fails
//! validation never reaches the network.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors raised by client-side validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The username is empty after trimming.
    #[error("username cannot be empty")]
    EmptyUsername,
    /// The username is too long.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The password is empty.
    #[error("password cannot be empty")]
    EmptyPassword,
    /// The password is shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The password is longer than the maximum length.
    #[error("password must be at most {max} characters")]
    PasswordTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
    /// A cart quantity of zero.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// A username.
///
/// ## Constraints
///
/// - Leading and trailing whitespace is trimmed
/// - Length: 1-64 characters after trimming
///
/// ## Examples
///
/// ```
/// use shopcart_core::Username;
///
/// assert_eq!(Username::parse("  alice ").unwrap().as_str(), "alice");
/// assert!(Username::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ValidationError::UsernameTooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A password as typed into a form.
///
/// Implements `Debug` manually so the value never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Minimum length for a new account's password.
    pub const MIN_LENGTH: usize = 6;
    /// Maximum length for any password.
    pub const MAX_LENGTH: usize = 128;

    /// Accept a password for signing in to an existing account.
    ///
    /// Only emptiness is checked; length rules apply to new accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPassword`] if `s` is empty.
    pub fn for_login(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(Self(s.to_owned()))
    }

    /// Accept a password for a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is shorter than [`Self::MIN_LENGTH`]
    /// or longer than [`Self::MAX_LENGTH`] characters.
    pub fn for_signup(s: &str) -> Result<Self, ValidationError> {
        let len = s.chars().count();
        if len < Self::MIN_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if len > Self::MAX_LENGTH {
            return Err(ValidationError::PasswordTooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the password for the request body.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// A validated sign-up form.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub password: Password,
}

impl NewAccount {
    /// Validate a sign-up form.
    ///
    /// The confirmation is compared first, so a mismatch is reported even
    /// when both entries are also too short.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn parse(username: &str, password: &str, confirm: &str) -> Result<Self, ValidationError> {
        if password != confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        let username = Username::parse(username)?;
        let password = Password::for_signup(password)?;
        Ok(Self { username, password })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_username_trimmed() {
        assert_eq!(Username::parse(" bob ").unwrap().as_str(), "bob");
    }

    #[test]
    fn test_username_too_long() {
        let long = "x".repeat(Username::MAX_LENGTH + 1);
        assert!(matches!(
            Username::parse(&long),
            Err(ValidationError::UsernameTooLong { max: 64 })
        ));
    }

    #[test]
    fn test_login_password_only_requires_content() {
        assert!(Password::for_login("a").is_ok());
        assert_eq!(
            Password::for_login("").unwrap_err(),
            ValidationError::EmptyPassword
        );
    }

    #[test]
    fn test_signup_password_length() {
        assert_eq!(
            Password::for_signup("abc").unwrap_err(),
            ValidationError::PasswordTooShort { min: 6 }
        );
        assert!(Password::for_signup("abcdef").is_ok());
        assert!(Password::for_signup(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_new_account_mismatch_reported_first() {
        let err = NewAccount::parse("alice", "abc", "abd").unwrap_err();
        assert_eq!(err, ValidationError::PasswordMismatch);
    }

    #[test]
    fn test_new_account_valid() {
        let account = NewAccount::parse("alice", "hunter22", "hunter22").unwrap();
        assert_eq!(account.username.as_str(), "alice");
        assert_eq!(account.password.expose(), "hunter22");
    }

    #[test]
    fn test_password_debug_redacted() {
        let password = Password::for_login("topsecret").unwrap();
        let debug = format!("{password:?}");
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
