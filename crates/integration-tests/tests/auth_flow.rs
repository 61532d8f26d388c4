//! Sign-in, forced sign-out and redirect intents against a mock backend.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use shopcart_core::ItemId;
use shopcart_integration_tests::TestContext;
use shopcart_storefront::pages::{CartPage, LoginPage, PageOutcome, ProductPage, SignupPage};
use shopcart_storefront::storage::keys;
use shopcart_storefront::{Route, StoreError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_add_to_cart_signed_out_resumes_product_after_login() {
    let ctx = TestContext::new().await;
    let sf = &ctx.storefront;

    // Signed out: no cart request may reach the backend
    Mock::given(method("POST"))
        .and(path("/carts"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    sf.navigator().navigate(Route::Product(ItemId::new(42)));
    let mut product = ProductPage::open(sf, ItemId::new(42));
    let outcome = product.add_to_cart().await;

    assert_eq!(outcome, PageOutcome::Redirected(Route::Login));
    assert_eq!(sf.navigator().current(), Route::Login);
    assert_eq!(ctx.slot(keys::REDIRECT_PATH).as_deref(), Some("/product/42"));
    assert!(product.error().is_none());

    ctx.mount_login("tok-1", "alice").await;
    let mut login = LoginPage::open(sf);
    let outcome = login.submit("alice", "secret1").await;

    assert_eq!(outcome, PageOutcome::Redirected(Route::Product(ItemId::new(42))));
    assert_eq!(sf.navigator().current(), Route::Product(ItemId::new(42)));
    assert_eq!(ctx.slot(keys::REDIRECT_PATH), None);
    assert_eq!(sf.session().username().as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_unauthorized_response_clears_session_and_shows_login() {
    let ctx = TestContext::signed_in("stale", "bob").await;
    let sf = &ctx.storefront;

    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid token"})))
        .mount(&ctx.server)
        .await;

    assert_eq!(sf.guard(Route::Cart).unwrap(), Route::Cart);
    let mut page = CartPage::open(sf);
    let outcome = page.load().await;

    // The pipeline moved the user away before the controller saw the result
    assert_eq!(outcome, PageOutcome::Abandoned);
    assert_eq!(sf.navigator().current(), Route::Login);
    assert!(!sf.session().is_authenticated());
    assert_eq!(ctx.slot(keys::TOKEN), None);
    assert_eq!(ctx.slot(keys::USERNAME), None);
    assert!(page.error().is_none());
}

#[tokio::test]
async fn test_unauthorized_from_cart_sync_is_authorization_expired() {
    let ctx = TestContext::signed_in("stale", "bob").await;

    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let err = ctx.storefront.cart().load_cart().await.unwrap_err();
    assert!(matches!(err, StoreError::AuthorizationExpired));
    assert!(err.requires_login());
    assert_eq!(ctx.slot(keys::TOKEN), None);
}

#[tokio::test]
async fn test_bearer_token_sent_with_requests() {
    let ctx = TestContext::signed_in("tok-123", "carol").await;

    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 0, "status": "empty", "items": []})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let cart = ctx.storefront.cart().load_cart().await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_wrong_password_shows_message_and_stays_on_login() {
    let ctx = TestContext::new().await;
    let sf = &ctx.storefront;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({"username": "dave", "password": "wrong"})))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid credentials"})))
        .mount(&ctx.server)
        .await;

    sf.navigator().navigate(Route::Login);
    let mut login = LoginPage::open(sf);
    let outcome = login.submit("dave", "wrong").await;

    assert_eq!(outcome, PageOutcome::Failed);
    assert_eq!(
        login.error(),
        Some("Invalid username or password. Please try again.")
    );
    assert!(!login.is_submitting());
    assert_eq!(sf.navigator().current(), Route::Login);
    assert!(!sf.session().is_authenticated());
}

#[tokio::test]
async fn test_login_opened_from_another_view_still_shows_rejection() {
    let ctx = TestContext::new().await;
    let sf = &ctx.storefront;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid credentials"})))
        .mount(&ctx.server)
        .await;

    assert_eq!(sf.navigator().current(), Route::Home);
    let mut login = LoginPage::open(sf);
    assert_eq!(sf.navigator().current(), Route::Login);

    assert_eq!(login.submit("dave", "wrong").await, PageOutcome::Failed);
    assert_eq!(
        login.error(),
        Some("Invalid username or password. Please try again.")
    );
    assert_eq!(sf.navigator().current(), Route::Login);
}

#[tokio::test]
async fn test_login_without_intent_goes_home() {
    let ctx = TestContext::new().await;
    let sf = &ctx.storefront;
    ctx.mount_login("tok-2", "erin").await;

    sf.navigator().navigate(Route::Login);
    let mut login = LoginPage::open(sf);

    assert_eq!(login.submit("erin", "pw").await, PageOutcome::Redirected(Route::Home));
    assert_eq!(ctx.slot(keys::TOKEN).as_deref(), Some("tok-2"));
    assert_eq!(ctx.slot(keys::USERNAME).as_deref(), Some("erin"));
}

#[tokio::test]
async fn test_protected_route_intent_is_read_once() {
    let ctx = TestContext::new().await;
    let sf = &ctx.storefront;

    assert_eq!(sf.guard(Route::Orders).unwrap(), Route::Login);
    assert_eq!(sf.intents().consume_intent().unwrap(), "/orders");
    assert_eq!(sf.intents().consume_intent().unwrap(), "/");
}

#[tokio::test]
async fn test_signup_mismatch_never_reaches_backend() {
    let ctx = TestContext::new().await;
    let sf = &ctx.storefront;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.server)
        .await;

    sf.navigator().navigate(Route::Signup);
    let mut signup = SignupPage::open(sf);
    let outcome = signup.submit("frank", "secret1", "secret2").await;

    assert_eq!(outcome, PageOutcome::Failed);
    assert_eq!(signup.error(), Some("Passwords do not match"));
}

#[tokio::test]
async fn test_signup_then_login_view() {
    let ctx = TestContext::new().await;
    let sf = &ctx.storefront;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 9, "username": "grace"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    sf.navigator().navigate(Route::Signup);
    let mut signup = SignupPage::open(sf);
    let outcome = signup.submit("grace", "secret1", "secret1").await;

    assert_eq!(outcome, PageOutcome::Redirected(Route::Login));
    assert!(!sf.session().is_authenticated());
}
