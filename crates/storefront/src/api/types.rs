//! Request and response bodies for the backend REST API.

use serde::{Deserialize, Serialize};
use shopcart_core::{CartId, ItemId, OrderId, OrderStatus, UserId};

#[derive(Debug, Serialize)]
pub(super) struct CredentialsBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct AddToCartBody {
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteCartItemBody {
    pub item_id: ItemId,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateOrderBody {
    pub cart_id: CartId,
}

/// The user a token was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

/// Response to `POST /users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Response to `POST /users`.
///
/// Some backends sign the new user in immediately and include a token.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Response to `POST /carts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub cart_id: CartId,
}

/// Response to `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic `{"message": "..."}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body: `{"error": "..."}` or `{"message": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    /// Extract the human-readable message from an error response body.
    pub(super) fn message_from(body: &str) -> String {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|parsed| parsed.error.or(parsed.message))
            .unwrap_or_default()
    }
}
