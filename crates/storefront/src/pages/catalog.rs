//! Catalog list view (`/` and `/products`).

use shopcart_core::{Item, ItemId};
use tracing::{instrument, warn};

use super::{PageOutcome, still_showing};
use crate::navigation::{Route, ViewToken};
use crate::state::Storefront;

const LOAD_FAILED: &str = "Error loading products. Please try again.";

#[derive(Debug)]
pub struct CatalogPage {
    storefront: Storefront,
    view: ViewToken,
    loading: bool,
    items: Vec<Item>,
    error: Option<String>,
}

impl CatalogPage {
    /// Open the product list.
    #[must_use]
    pub fn open(storefront: &Storefront) -> Self {
        Self {
            view: storefront.navigator().view_token(),
            storefront: storefront.clone(),
            loading: false,
            items: Vec::new(),
            error: None,
        }
    }

    /// Whether the list is being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Items loaded so far; empty before the first load.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
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

        let result = self.storefront.api().list_items().await;
        self.loading = false;

        if !still_showing(&self.view, "load catalog") {
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(items) => {
                self.items = items;
                PageOutcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "Catalog load failed");
                self.error = Some(LOAD_FAILED.to_string());
                PageOutcome::Failed
            }
        }
    }

    /// Show an item's detail view.
    pub fn open_product(&self, id: ItemId) -> PageOutcome {
        let route = Route::Product(id);
        self.storefront.navigator().navigate(route);
        PageOutcome::Redirected(route)
    }
}
