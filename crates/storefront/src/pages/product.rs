//! Product detail view (`/product/{id}`).

use std::ops::RangeInclusive;

use shopcart_core::{Item, ItemId, ValidationError};
use tracing::{error, instrument, warn};

use super::{PageOutcome, still_showing};
use crate::error::StoreError;
use crate::navigation::{Route, ViewToken};
use crate::state::Storefront;

/// Quantities offered by the quantity selector.
pub const QUANTITY_CHOICES: RangeInclusive<u32> = 1..=5;

const LOAD_FAILED: &str = "Error loading product. Please try again.";
const ADD_FAILED: &str = "Error adding item to cart. Please try again.";

#[derive(Debug)]
pub struct ProductPage {
    storefront: Storefront,
    view: ViewToken,
    item_id: ItemId,
    item: Option<Item>,
    quantity: u32,
    loading: bool,
    adding: bool,
    added: bool,
    error: Option<String>,
}

impl ProductPage {
    /// Open the detail view for `item_id`.
    #[must_use]
    pub fn open(storefront: &Storefront, item_id: ItemId) -> Self {
        Self {
            view: storefront.navigator().view_token(),
            storefront: storefront.clone(),
            item_id,
            item: None,
            quantity: 1,
            loading: false,
            adding: false,
            added: false,
            error: None,
        }
    }

    /// The loaded item.
    #[must_use]
    pub const fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    /// Quantity currently selected.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Whether the item is being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while an add-to-cart request is in flight.
    #[must_use]
    pub const fn is_adding(&self) -> bool {
        self.adding
    }

    /// Whether the last add-to-cart succeeded.
    #[must_use]
    pub const fn was_added(&self) -> bool {
        self.added
    }

    /// The inline error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Choose a quantity from [`QUANTITY_CHOICES`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidQuantity`] for anything outside the
    /// selector's range.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), ValidationError> {
        if !QUANTITY_CHOICES.contains(&quantity) {
            return Err(ValidationError::InvalidQuantity);
        }
        self.quantity = quantity;
        Ok(())
    }

    #[instrument(skip(self), fields(item_id = %self.item_id))]
    pub async fn load(&mut self) -> PageOutcome {
        self.loading = true;
        self.error = None;

        let result = self.storefront.api().get_item(self.item_id).await;
        self.loading = false;

        if !still_showing(&self.view, "load product") {
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(item) => {
                self.item = Some(item);
                PageOutcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "Product load failed");
                self.item = None;
                self.error = Some(LOAD_FAILED.to_string());
                PageOutcome::Failed
            }
        }
    }

    /// Add the selected quantity to the cart.
    ///
    /// A signed-out user is sent to login with this product recorded as the
    /// redirect intent, so signing in comes straight back here.
    #[instrument(skip(self), fields(item_id = %self.item_id, quantity = self.quantity))]
    pub async fn add_to_cart(&mut self) -> PageOutcome {
        self.adding = true;
        self.added = false;
        self.error = None;

        let result = self
            .storefront
            .cart()
            .add_item(self.item_id, self.quantity)
            .await;
        self.adding = false;

        match result {
            Ok(()) => {
                if !still_showing(&self.view, "add to cart") {
                    return PageOutcome::Abandoned;
                }
                self.added = true;
                PageOutcome::Completed
            }
            Err(err) if err.requires_login() => {
                if let Err(e) = self.storefront.require_login(Route::Product(self.item_id)) {
                    error!(error = %e, "Failed to record redirect intent");
                }
                PageOutcome::Redirected(Route::Login)
            }
            Err(err) => {
                if !still_showing(&self.view, "add to cart") {
                    return PageOutcome::Abandoned;
                }
                warn!(error = %err, "Add to cart failed");
                self.error = Some(
                    err.server_message()
                        .map_or_else(|| ADD_FAILED.to_string(), String::from),
                );
                PageOutcome::Failed
            }
        }
    }

    /// Go to the cart after adding.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect intent cannot be stored.
    pub fn view_cart(&self) -> Result<Route, StoreError> {
        self.storefront.guard(Route::Cart)
    }
}
