//! REST client behavior against a mock backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use shopcart_core::{CartId, ItemId, OrderStatus, Quantity};
use shopcart_storefront::api::{ApiClient, ApiError};
use shopcart_storefront::config::ApiConfig;
use shopcart_storefront::session::SessionStore;
use shopcart_storefront::storage::MemoryStorage;
use shopcart_storefront::{Navigator, Route, StoreError};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ApiClient {
    let session = SessionStore::load(Arc::new(MemoryStorage::new())).unwrap();
    session.set_session("tok", "alice").unwrap();
    let config = ApiConfig::new(Url::parse(&server.uri()).unwrap());
    ApiClient::new(&config, session, Navigator::new(Route::Home)).unwrap()
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = client(&server).await.get_cart().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited(7)));
    assert!(StoreError::from(err).is_retryable());
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/me"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance"})))
        .mount(&server)
        .await;

    let err = StoreError::from(client(&server).await.list_orders().await.unwrap_err());
    assert!(err.is_retryable());
    assert_eq!(err.server_message(), Some("maintenance"));
}

#[tokio::test]
async fn test_client_error_is_not_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/carts"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid quantity"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .add_to_cart(ItemId::new(1), Quantity::new(1).unwrap())
        .await
        .unwrap_err();
    let err = StoreError::from(err);
    assert!(!err.is_retryable());
    assert_eq!(err.user_message(), "Invalid quantity");
}

#[tokio::test]
async fn test_unparseable_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).await.get_item(ItemId::new(3)).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/carts/items"))
        .and(body_json(json!({"item_id": 12})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client(&server)
        .await
        .delete_cart_item(ItemId::new(12))
        .await
        .unwrap();
    assert_eq!(ack.message, None);
}

#[tokio::test]
async fn test_delete_with_garbled_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/carts/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>removed</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .delete_cart_item(ItemId::new(12))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn test_create_order_decodes_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_json(json!({"cart_id": 8})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "order_id": 31,
            "items": [],
            "status": "success",
            "message": "Order created successfully"
        })))
        .mount(&server)
        .await;

    let created = client(&server).await.create_order(CartId::new(8)).await.unwrap();
    assert_eq!(created.order_id.as_i64(), 31);
    assert_eq!(created.status, OrderStatus::Success);
}

#[tokio::test]
async fn test_invalidate_catalog_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let api = client(&server).await;
    api.list_items().await.unwrap();
    api.list_items().await.unwrap();
    api.invalidate_catalog();
    api.list_items().await.unwrap();
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::load(Arc::new(MemoryStorage::new())).unwrap();
    let config = ApiConfig::new(Url::parse(&format!("{}/api/v1", server.uri())).unwrap());
    let api = ApiClient::new(&config, session, Navigator::new(Route::Home)).unwrap();

    assert!(api.list_orders().await.unwrap().is_empty());
}
