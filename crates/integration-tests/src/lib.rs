//! Integration tests for the ShopCart storefront client.
//!
//! Every test runs the real storefront stack (session store, request
//! pipeline, API client, page controllers) against a `wiremock` server
//! standing in for the REST backend. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - sign-in, forced sign-out, redirect intents
//! - `cart_sync` - cart reloads, totals, checkout
//! - `catalog` - catalog caching and navigation edge cases
//! - `persistence` - session state across restarts

#![allow(clippy::expect_used)]

use std::sync::Arc;

use serde_json::{Value, json};
use shopcart_storefront::Storefront;
use shopcart_storefront::config::ApiConfig;
use shopcart_storefront::storage::{DurableStorage, MemoryStorage, keys};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A storefront wired to a mock backend.
pub struct TestContext {
    pub server: MockServer,
    pub storage: MemoryStorage,
    pub storefront: Storefront,
}

impl TestContext {
    /// Signed-out storefront over fresh storage.
    pub async fn new() -> Self {
        Self::with_storage(MemoryStorage::new()).await
    }

    /// Storefront that starts with a stored session.
    pub async fn signed_in(token: &str, username: &str) -> Self {
        let storage = MemoryStorage::new();
        storage
            .set_all(&[(keys::TOKEN, token), (keys::USERNAME, username)])
            .expect("seed session");
        Self::with_storage(storage).await
    }

    async fn with_storage(storage: MemoryStorage) -> Self {
        let server = MockServer::start().await;
        let storefront = Storefront::with_storage(&api_config(&server), Arc::new(storage.clone()))
            .expect("open storefront");
        Self {
            server,
            storage,
            storefront,
        }
    }

    /// Read a durable slot.
    pub fn slot(&self, key: &str) -> Option<String> {
        self.storage.get(key).expect("read storage")
    }

    /// Answer `POST /users/login` with a token for `username`.
    pub async fn mount_login(&self, token: &str, username: &str) {
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": token,
                "user": { "id": 1, "username": username }
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /carts/me` with `items` once.
    pub async fn mount_cart_once(&self, cart_id: i64, items: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/carts/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart(cart_id, items)))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }
}

/// API settings pointing at the mock server.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig::new(Url::parse(&server.uri()).expect("mock server uri"))
}

/// A backend cart body.
pub fn cart(id: i64, items: Vec<Value>) -> Value {
    let status = if items.is_empty() { "empty" } else { "active" };
    json!({ "id": id, "status": status, "items": items })
}

/// A backend cart line.
pub fn cart_line(id: i64, name: &str, price: f64, quantity: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "category": "Apparel",
        "brand": "Acme",
        "price": price,
        "quantity": quantity,
        "image_urls": format!("https://img.example.com/{id}.jpg"),
    })
}

/// A backend catalog item.
pub fn catalog_item(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "category": "Apparel",
        "brand": "Acme",
        "price": price,
        "image_urls": "",
        "status": "active",
    })
}
