//! Cart types and derived totals.
//!
//! The cart is owned by the server. These types only describe what the last
//! fetch returned; totals are always recomputed from the loaded lines and
//! never trusted from a previous load.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::{PLACEHOLDER_IMAGE, split_image_urls};
use super::credentials::ValidationError;
use super::id::{CartId, ItemId};
use super::price::Price;
use super::serde_helpers::{null_as_default_string, null_as_empty};
use super::status::CartStatus;

/// A line quantity. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a quantity, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidQuantity`] if `value` is zero.
    pub const fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidQuantity);
        }
        Ok(Self(value))
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of a cart (or of a placed order).
///
/// A missing quantity defaults to 1, which is how order history lines
/// without a recorded quantity are counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub brand: String,
    pub price: Price,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub image_urls: String,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity.get())
    }

    /// The first image URL, or the placeholder.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        split_image_urls(&self.image_urls)
            .next()
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// The authoritative cart as last returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Server cart id. Absent (or `0`) when the user has no active cart.
    #[serde(default)]
    pub id: Option<CartId>,
    #[serde(default)]
    pub status: CartStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart, used when the server reports no cart at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The id to check out with, if the server assigned a real one.
    #[must_use]
    pub fn checkout_id(&self) -> Option<CartId> {
        self.id.filter(|id| id.as_i64() > 0)
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        total_price(&self.items)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        total_quantity(&self.items)
    }
}

/// Sum of price × quantity over `items`.
#[must_use]
pub fn total_price(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

/// Sum of quantities over `items`, saturating at `u32::MAX`.
#[must_use]
pub fn total_quantity(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0, |total, item| total.saturating_add(item.quantity.get()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i64, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ItemId::new(id),
            name: format!("item-{id}"),
            description: String::new(),
            category: String::new(),
            brand: String::new(),
            price: Price::from_cents(cents),
            quantity: Quantity::new(quantity).unwrap(),
            image_urls: String::new(),
        }
    }

    #[test]
    fn test_totals() {
        let cart = Cart {
            id: Some(CartId::new(1)),
            status: CartStatus::Active,
            items: vec![line(1, 1000, 2), line(2, 550, 1)],
        };

        assert_eq!(cart.total_price(), Price::from_cents(2550));
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let cart = Cart {
            id: Some(CartId::new(1)),
            status: CartStatus::Active,
            items: vec![line(1, 1000, 3_000_000_000), line(2, 550, 3_000_000_000)],
        };

        assert_eq!(cart.total_quantity(), u32::MAX);
        assert_eq!(cart.total_price(), Price::from_cents(4_650_000_000_000));
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::empty();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Price::ZERO);
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.checkout_id(), None);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(matches!(
            Quantity::new(0),
            Err(ValidationError::InvalidQuantity)
        ));
        let result: Result<CartItem, _> = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "x", "price": 1.0, "quantity": 0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_cart_from_backend_json() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": 9,
            "status": "active",
            "items": [
                {"id": 3, "name": "Mug", "price": 12.5, "category": "Kitchen",
                 "brand": "Acme", "description": "Big mug", "image_urls": "", "quantity": 2}
            ]
        }))
        .unwrap();

        assert_eq!(cart.checkout_id(), Some(CartId::new(9)));
        assert_eq!(cart.status, CartStatus::Active);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price(), Price::from_cents(2500));
    }

    #[test]
    fn test_cart_with_null_items() {
        let cart: Cart =
            serde_json::from_value(serde_json::json!({"id": 4, "status": "active", "items": null}))
                .unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_placeholder_cart_id_is_not_checkout_id() {
        let cart: Cart =
            serde_json::from_value(serde_json::json!({"id": 0, "status": "empty", "items": []}))
                .unwrap();
        assert_eq!(cart.status, CartStatus::Empty);
        assert_eq!(cart.checkout_id(), None);
    }
}
