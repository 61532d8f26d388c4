//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{CartItem, total_price, total_quantity};
use super::id::OrderId;
use super::price::Price;
use super::serde_helpers::{lenient_timestamp, null_as_empty};
use super::status::OrderStatus;

/// An order just placed at checkout.
///
/// `items` is the cart snapshot held by the client when the order was
/// placed; it is not re-fetched from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
}

impl Order {
    /// Sum of price × quantity over the snapshot.
    #[must_use]
    pub fn total_price(&self) -> Price {
        total_price(&self.items)
    }

    /// Sum of quantities over the snapshot.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        total_quantity(&self.items)
    }
}

/// A past order as listed in the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<CartItem>,
}

impl OrderRecord {
    /// Sum of price × quantity, counting lines without a quantity once.
    #[must_use]
    pub fn total_price(&self) -> Price {
        total_price(&self.items)
    }

    /// Human-readable placement date, e.g. `March 1, 2024 10:15`.
    #[must_use]
    pub fn placed_on(&self) -> Option<String> {
        self.created_at
            .map(|at| at.format("%B %-d, %Y %H:%M").to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_record_defaults_quantity_to_one() {
        let record: OrderRecord = serde_json::from_value(serde_json::json!({
            "id": 5,
            "created_at": "2024-03-01T10:15:00Z",
            "items": [
                {"id": 1, "name": "Mug", "price": 4.25},
                {"id": 2, "name": "Tea", "price": 3.00, "quantity": 3}
            ]
        }))
        .unwrap();

        assert_eq!(record.total_price(), Price::from_cents(1325));
        assert_eq!(record.placed_on().as_deref(), Some("March 1, 2024 10:15"));
    }

    #[test]
    fn test_order_record_tolerates_missing_fields() {
        let record: OrderRecord = serde_json::from_value(serde_json::json!({
            "id": 6,
            "created_at": "",
            "items": null
        }))
        .unwrap();

        assert!(record.created_at.is_none());
        assert!(record.items.is_empty());
        assert_eq!(record.total_price(), Price::ZERO);
    }
}
