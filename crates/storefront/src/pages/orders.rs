//! Order history view (`/orders`).

use shopcart_core::OrderRecord;
use tracing::{instrument, warn};

use super::{PageOutcome, still_showing};
use crate::api::ApiError;
use crate::navigation::{Route, ViewToken};
use crate::state::Storefront;

const LOAD_FAILED: &str = "Failed to load orders. Please try again.";

#[derive(Debug)]
pub struct OrderHistoryPage {
    storefront: Storefront,
    view: ViewToken,
    loading: bool,
    orders: Vec<OrderRecord>,
    error: Option<String>,
}

impl OrderHistoryPage {
    /// Open the order history view.
    #[must_use]
    pub fn open(storefront: &Storefront) -> Self {
        Self {
            view: storefront.navigator().view_token(),
            storefront: storefront.clone(),
            loading: false,
            orders: Vec::new(),
            error: None,
        }
    }

    /// Whether the history is being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Past orders as returned by the backend.
    #[must_use]
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    /// The load failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) -> PageOutcome {
        self.loading = true;
        self.error = None;

        let result = self.storefront.api().list_orders().await;
        self.loading = false;

        if !still_showing(&self.view, "load orders") {
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(orders) => {
                self.orders = orders;
                PageOutcome::Completed
            }
            Err(ApiError::Unauthorized) => PageOutcome::Redirected(Route::Login),
            Err(err) => {
                warn!(error = %err, "Order history load failed");
                self.error = Some(LOAD_FAILED.to_string());
                PageOutcome::Failed
            }
        }
    }
}
