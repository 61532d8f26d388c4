//! Cart synchronization.
//!
//! The cart lives on the server. Mutations never patch a local copy: callers
//! await the mutation and then call [`CartSync::load_cart`] to pick up the
//! authoritative state, including any merging the backend did.

use shopcart_core::{Cart, ItemId, Quantity};
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};
use crate::error::{StoreError, add_breadcrumb};
use crate::session::SessionStore;

/// Fetches and mutates the signed-in user's server-side cart.
#[derive(Clone, Debug)]
pub struct CartSync {
    api: ApiClient,
    session: SessionStore,
}

impl CartSync {
    /// Cart operations for the signed-in user of `session`.
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Fetch the current cart.
    ///
    /// A user without a cart gets an empty one rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AuthorizationExpired`] if the backend rejected
    /// the credential, or another error if the request fails.
    #[instrument(skip(self))]
    pub async fn load_cart(&self) -> Result<Cart, StoreError> {
        match self.api.get_cart().await {
            Ok(cart) => Ok(cart),
            Err(ApiError::NotFound(_)) => {
                debug!("No cart on server, treating as empty");
                Ok(Cart::empty())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Add `quantity` of an item to the cart.
    ///
    /// Does not return the updated cart; reload it afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AuthenticationRequired`] when signed out (before
    /// any request) or when the backend rejects the credential, and
    /// [`StoreError::Validation`] for a zero quantity.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn add_item(&self, item_id: ItemId, quantity: u32) -> Result<(), StoreError> {
        if !self.session.is_authenticated() {
            return Err(StoreError::AuthenticationRequired);
        }
        let quantity = Quantity::new(quantity)?;

        match self.api.add_to_cart(item_id, quantity).await {
            Ok(_) => {
                let item = item_id.to_string();
                let count = quantity.to_string();
                add_breadcrumb(
                    "cart",
                    "Added item",
                    Some(&[("item_id", item.as_str()), ("quantity", count.as_str())]),
                );
                Ok(())
            }
            Err(ApiError::Unauthorized) => Err(StoreError::AuthenticationRequired),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an item's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_item(&self, item_id: ItemId) -> Result<(), StoreError> {
        self.api.delete_cart_item(item_id).await?;
        let item = item_id.to_string();
        add_breadcrumb("cart", "Removed item", Some(&[("item_id", item.as_str())]));
        Ok(())
    }

    /// Ask the backend to merge duplicate lines for the same item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn cleanup(&self) -> Result<(), StoreError> {
        self.api.cleanup_cart().await?;
        Ok(())
    }
}
