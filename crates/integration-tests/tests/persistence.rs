//! Session and redirect intent survive reopening the storefront.

#![allow(clippy::unwrap_used)]

use shopcart_integration_tests::api_config;
use shopcart_storefront::config::StorefrontConfig;
use shopcart_storefront::pages::NavBar;
use shopcart_storefront::{Route, StoreError, Storefront};
use wiremock::MockServer;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn config(server: &MockServer, dir: &tempfile::TempDir) -> StorefrontConfig {
    StorefrontConfig {
        api: api_config(server),
        state_dir: dir.path().to_path_buf(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

#[tokio::test]
async fn test_session_survives_restart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "tok-9",
            "user": {"id": 3, "username": "alice"}
        })))
        .mount(&server)
        .await;

    let first = Storefront::open(&config(&server, &dir)).unwrap();
    first.accounts().login("alice", "secret1").await.unwrap();
    drop(first);

    let second = Storefront::open(&config(&server, &dir)).unwrap();
    assert!(second.session().is_authenticated());
    assert_eq!(NavBar::new(&second).username().as_deref(), Some("alice"));

    NavBar::new(&second).sign_out().unwrap();
    assert_eq!(second.navigator().current(), Route::Login);

    let third = Storefront::open(&config(&server, &dir)).unwrap();
    assert!(!third.session().is_authenticated());
    assert_eq!(third.session().username(), None);
}

#[tokio::test]
async fn test_intent_survives_restart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let first = Storefront::open(&config(&server, &dir)).unwrap();
    assert_eq!(first.guard(Route::Cart).unwrap(), Route::Login);
    drop(first);

    let second = Storefront::open(&config(&server, &dir)).unwrap();
    assert_eq!(second.intents().peek_intent().unwrap().as_deref(), Some("/cart"));
    assert_eq!(second.intents().consume_intent().unwrap(), "/cart");
    assert_eq!(second.intents().consume_intent().unwrap(), "/");
}

#[tokio::test]
async fn test_sign_out_in_one_instance_reaches_the_other() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "tok-9",
            "user": {"id": 3, "username": "alice"}
        })))
        .mount(&server)
        .await;
    // A signed-out instance must not send the old credential
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .and(header("Authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let tab_a = Storefront::open(&config(&server, &dir)).unwrap();
    let tab_b = Storefront::open(&config(&server, &dir)).unwrap();

    tab_a.accounts().login("alice", "secret1").await.unwrap();
    assert!(tab_b.session().is_authenticated());
    assert_eq!(NavBar::new(&tab_b).username().as_deref(), Some("alice"));

    tab_a.accounts().logout().unwrap();

    assert!(!tab_b.session().is_authenticated());
    assert_eq!(NavBar::new(&tab_b).username(), None);
    assert_eq!(tab_b.guard(Route::Cart).unwrap(), Route::Login);

    let err = tab_b.cart().load_cart().await.unwrap_err();
    assert!(matches!(err, StoreError::AuthorizationExpired));
}
