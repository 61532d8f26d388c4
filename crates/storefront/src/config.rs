//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPCART_API_URL` - Backend base URL (default: `http://localhost:8080`)
//! - `SHOPCART_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SHOPCART_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `SHOPCART_STATE_DIR` - Directory for durable client state
//!   (default: `<platform data dir>/shopcart`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 300;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const STATE_DIR_NAME: &str = "shopcart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Directory holding the durable state file
    pub state_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against
    pub base_url: Url,
    /// Total time allowed for one request
    pub request_timeout: Duration,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// How long catalog responses stay cached
    pub catalog_cache_ttl: Duration,
}

impl ApiConfig {
    /// Settings for `base_url` with default timeouts and cache lifetime.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: CONNECT_TIMEOUT,
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_CACHE_TTL_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid, or if no state
    /// directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_or_default(&lookup, "SHOPCART_API_URL", DEFAULT_API_URL);
        let base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPCART_API_URL".to_string(), e.to_string()))?;

        let request_timeout = Duration::from_secs(get_parsed(
            &lookup,
            "SHOPCART_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let catalog_cache_ttl = Duration::from_secs(get_parsed(
            &lookup,
            "SHOPCART_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CATALOG_CACHE_TTL_SECS,
        )?);

        let state_dir = match get_optional(&lookup, "SHOPCART_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join(STATE_DIR_NAME))
                .ok_or_else(|| ConfigError::MissingEnvVar("SHOPCART_STATE_DIR".to_string()))?,
        };

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout,
                connect_timeout: CONNECT_TIMEOUT,
                catalog_cache_ttl,
            },
            state_dir,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Get a variable parsed as `T`, falling back to `default` when unset.
fn get_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional(lookup, key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPCART_STATE_DIR", "/tmp/shopcart")]))
                .unwrap();

        assert_eq!(config.api.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
        assert_eq!(config.api.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.api.catalog_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/shopcart"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("SHOPCART_API_URL", "https://shop.example.com/api"),
            ("SHOPCART_REQUEST_TIMEOUT_SECS", "5"),
            ("SHOPCART_CATALOG_CACHE_TTL_SECS", "0"),
            ("SHOPCART_STATE_DIR", "/var/lib/shopcart"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url.as_str(), "https://shop.example.com/api");
        assert_eq!(config.api.request_timeout, Duration::from_secs(5));
        assert_eq!(config.api.catalog_cache_ttl, Duration::ZERO);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_url() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("SHOPCART_API_URL", "not a url"),
            ("SHOPCART_STATE_DIR", "/tmp"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SHOPCART_API_URL"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("SHOPCART_REQUEST_TIMEOUT_SECS", "soon"),
            ("SHOPCART_STATE_DIR", "/tmp"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SHOPCART_REQUEST_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("SHOPCART_API_URL", "  "),
            ("SENTRY_DSN", ""),
            ("SHOPCART_STATE_DIR", "/tmp"),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8080/");
        assert!(config.sentry_dsn.is_none());
    }
}
