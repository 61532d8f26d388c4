//! Order confirmation view.
//!
//! Only reachable with the order handed over by the cart view's checkout.
//! Opening it without one (a reload, a typed URL) sends the user back to the
//! cart.

use shopcart_core::{Order, Price};
use tracing::debug;

use crate::error::StoreError;
use crate::navigation::Route;
use crate::state::Storefront;

#[derive(Debug)]
pub struct ConfirmationPage {
    storefront: Storefront,
    order: Order,
}

impl ConfirmationPage {
    /// Show `order`, or redirect to the cart view when there is none.
    #[must_use]
    pub fn open(storefront: &Storefront, order: Option<Order>) -> Option<Self> {
        let Some(order) = order else {
            debug!("No order to confirm, returning to cart");
            storefront.navigator().navigate(Route::Cart);
            return None;
        };
        Some(Self {
            storefront: storefront.clone(),
            order,
        })
    }

    /// The placed order.
    #[must_use]
    pub const fn order(&self) -> &Order {
        &self.order
    }

    /// Sum of price × quantity over the ordered lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.order.total_price()
    }

    /// Units ordered.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.order.total_quantity()
    }

    pub fn continue_shopping(&self) {
        self.storefront.navigator().navigate(Route::Home);
    }

    /// # Errors
    ///
    /// Returns an error if the redirect intent cannot be stored.
    pub fn view_orders(&self) -> Result<Route, StoreError> {
        self.storefront.guard(Route::Orders)
    }
}
