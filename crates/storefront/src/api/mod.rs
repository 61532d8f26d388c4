//! Client for the storefront REST backend.
//!
//! Every request goes through the [`pipeline::AuthLayer`] service, which
//! attaches the session's bearer token and applies the forced sign-out
//! policy on `401`. Catalog responses are cached using `moka`; cart and
//! order calls never are.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config.api, session.clone(), navigator.clone())?;
//!
//! let items = api.list_items().await?;
//! api.add_to_cart(items[0].id, Quantity::ONE).await?;
//! let cart = api.get_cart().await?;
//! ```

mod cache;
pub mod pipeline;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use shopcart_core::{Cart, CartId, Item, ItemId, OrderRecord, Password, Quantity, Username};
use thiserror::Error;
use tower::{Layer, ServiceExt};
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::navigation::Navigator;
use crate::session::SessionStore;

use cache::{CacheKey, CacheValue};
use pipeline::{AuthLayer, AuthService};
use types::{
    Ack, AddToCartBody, AddToCartResponse, CreateOrderBody, CreateOrderResponse,
    CredentialsBody, DeleteCartItemBody, ErrorBody, LoginResponse, SignupResponse,
};

/// Maximum number of characters of a response body written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend rejected the credential (or its absence).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("HTTP {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
    },
}

/// Client for the storefront REST backend.
///
/// Cheap to clone; clones share the connection pool and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    pipeline: AuthService<reqwest::Client>,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a client whose requests carry `session`'s credential and whose
    /// authorization failures send `navigator` to the login view.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        config: &ApiConfig,
        session: SessionStore,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let pipeline = AuthLayer::new(session, navigator).layer(http.clone());

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                pipeline,
                base_url: with_trailing_slash(config.base_url.clone()),
                cache,
            }),
        })
    }

    /// The base URL endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        Ok(self.inner.http.request(method, url))
    }

    /// Send a request through the pipeline and return the success body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let request = request.build()?;
        let path = request.url().path().to_string();

        let response = self.inner.pipeline.clone().oneshot(request).await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = ErrorBody::message_from(&body);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if status == StatusCode::NOT_FOUND {
            debug!(path = %path, "Backend returned 404");
            return Err(ApiError::NotFound(if message.is_empty() {
                path
            } else {
                message
            }));
        }

        if status.is_server_error() {
            error!(
                status = %status,
                path = %path,
                body = %truncate(&body),
                "Backend returned server error"
            );
        } else {
            warn!(
                status = %status,
                path = %path,
                body = %truncate(&body),
                "Backend rejected request"
            );
        }
        Err(ApiError::Status { status, message })
    }

    /// Send a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request whose response is an optional acknowledgement.
    ///
    /// An empty body is an empty [`Ack`]; anything else must decode.
    async fn execute_ack(&self, request: reqwest::RequestBuilder) -> Result<Ack, ApiError> {
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            return Ok(Ack::default());
        }
        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse backend acknowledgement"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Account Methods
    // =========================================================================

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the account or the request fails.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn signup(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<SignupResponse, ApiError> {
        let body = CredentialsBody {
            username: username.as_str(),
            password: password.expose(),
        };
        self.execute(self.request(Method::POST, "users")?.json(&body))
            .await
    }

    /// Exchange a username and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for wrong credentials, or another
    /// error if the request fails.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<LoginResponse, ApiError> {
        let body = CredentialsBody {
            username: username.as_str(),
            password: password.expose(),
        };
        self.execute(self.request(Method::POST, "users/login")?.json(&body))
            .await
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// List every catalog item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&CacheKey::Items).await {
            debug!("Cache hit for items");
            return Ok(items);
        }

        let items: Option<Vec<Item>> = self.execute(self.request(Method::GET, "items")?).await?;
        let items = items.unwrap_or_default();

        self.inner
            .cache
            .insert(CacheKey::Items, CacheValue::Items(items.clone()))
            .await;

        Ok(items)
    }

    /// Get one catalog item.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the item does not exist, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn get_item(&self, id: ItemId) -> Result<Item, ApiError> {
        let cache_key = CacheKey::Item(id);

        if let Some(CacheValue::Item(item)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for item");
            return Ok(*item);
        }

        let item: Item = self
            .execute(self.request(Method::GET, &format!("items/{id}"))?)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Item(Box::new(item.clone())))
            .await;

        Ok(item)
    }

    /// Drop every cached catalog response.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the backend has no cart for the
    /// user, or another error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart, ApiError> {
        self.execute(self.request(Method::GET, "carts/me")?).await
    }

    /// Add `quantity` of an item to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id, quantity = %quantity))]
    pub async fn add_to_cart(
        &self,
        item_id: ItemId,
        quantity: Quantity,
    ) -> Result<AddToCartResponse, ApiError> {
        let body = AddToCartBody {
            item_id,
            quantity: quantity.get(),
        };
        self.execute(self.request(Method::POST, "carts")?.json(&body))
            .await
    }

    /// Remove an item's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_cart_item(&self, item_id: ItemId) -> Result<Ack, ApiError> {
        let body = DeleteCartItemBody { item_id };
        self.execute_ack(self.request(Method::DELETE, "carts/items")?.json(&body))
            .await
    }

    /// Ask the backend to merge duplicate cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cleanup_cart(&self) -> Result<Ack, ApiError> {
        self.execute_ack(self.request(Method::POST, "carts/cleanup")?)
            .await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order for the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the order or the request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn create_order(&self, cart_id: CartId) -> Result<CreateOrderResponse, ApiError> {
        let body = CreateOrderBody { cart_id };
        self.execute(self.request(Method::POST, "orders")?.json(&body))
            .await
    }

    /// List the signed-in user's past orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>, ApiError> {
        let orders: Option<Vec<OrderRecord>> =
            self.execute(self.request(Method::GET, "orders/me")?).await?;
        Ok(orders.unwrap_or_default())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Ensure `url` ends in `/` so relative joins append rather than replace.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
