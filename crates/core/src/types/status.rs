//! Status enums reported by the backend.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a server-side cart.
///
/// The backend reports `"empty"` for a user without an active cart and
/// `"ordered"` once checkout has consumed the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Empty,
    Active,
    Ordered,
    /// Forward-compatible catch-all for statuses this client does not know.
    #[serde(other)]
    Unknown,
}

/// Status returned when an order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Success,
    Pending,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Pending => write!(f, "pending"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_status_from_backend_values() {
        let status: CartStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, CartStatus::Active);
        let status: CartStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, CartStatus::Unknown);
    }

    #[test]
    fn test_order_status_display() {
        let status: OrderStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(status.to_string(), "success");
    }
}
