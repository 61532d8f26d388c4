//! Checkout transition: turns the loaded cart into an order.

use shopcart_core::{Cart, Order};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::error::{StoreError, add_breadcrumb};

/// Places orders.
#[derive(Clone, Debug)]
pub struct Checkout {
    api: ApiClient,
}

impl Checkout {
    /// Checkout through `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Place an order for `cart`.
    ///
    /// The returned order carries the cart's lines as they were loaded; the
    /// cart is not fetched again.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyCart`] without calling the backend when the
    /// cart has no lines or no server id, or another error if the backend
    /// refuses the order.
    #[instrument(skip(self, cart), fields(lines = cart.items.len()))]
    pub async fn checkout(&self, cart: &Cart) -> Result<Order, StoreError> {
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        let cart_id = cart.checkout_id().ok_or(StoreError::EmptyCart)?;

        let placed = self.api.create_order(cart_id).await?;

        info!(order_id = %placed.order_id, status = %placed.status, "Order placed");
        let order_id = placed.order_id.to_string();
        add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));

        Ok(Order {
            order_id: placed.order_id,
            status: placed.status,
            items: cart.items.clone(),
        })
    }
}
