//! Cart view.
//!
//! ```text
//! Empty ──load──▶ Loading ──▶ Loaded ──checkout──▶ CheckingOut ──▶ OrderConfirmed
//!                    │  ▲        ▲                      │
//!                    ▼  │retry   └──── CheckoutError ◀──┘
//!                 LoadError
//! ```
//!
//! Removing a line reloads the cart from the server; nothing is patched in
//! place.

use std::mem;

use shopcart_core::{Cart, ItemId, Order, Price};
use tracing::{instrument, warn};

use super::{PageOutcome, still_showing};
use crate::error::StoreError;
use crate::navigation::{Route, ViewToken};
use crate::state::Storefront;

const LOAD_FAILED: &str = "Error loading cart. Please try again.";
const REMOVE_FAILED: &str = "Error removing item from cart. Please try again.";
const CHECKOUT_FAILED: &str = "Failed to place order. Please try again.";

/// State of the cart view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CartState {
    /// Nothing loaded yet.
    #[default]
    Empty,
    Loading,
    Loaded(Cart),
    LoadError(String),
    CheckingOut(Cart),
    CheckoutError {
        cart: Cart,
        message: String,
    },
    /// Terminal: the order is waiting to be handed to the confirmation view.
    OrderConfirmed(Order),
}

/// The cart view.
#[derive(Debug)]
pub struct CartPage {
    storefront: Storefront,
    view: ViewToken,
    state: CartState,
    /// Transient message for failed line edits; the loaded cart stays shown.
    notice: Option<String>,
    removing: Option<ItemId>,
}

impl CartPage {
    /// Open the cart view. Nothing is fetched until [`Self::load`].
    #[must_use]
    pub fn open(storefront: &Storefront) -> Self {
        Self {
            view: storefront.navigator().view_token(),
            storefront: storefront.clone(),
            state: CartState::Empty,
            notice: None,
            removing: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// The cart currently shown, if any.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        match &self.state {
            CartState::Loaded(cart)
            | CartState::CheckingOut(cart)
            | CartState::CheckoutError { cart, .. } => Some(cart),
            _ => None,
        }
    }

    /// Total of the cart shown, zero when none is.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart().map_or(Price::ZERO, Cart::total_price)
    }

    /// Units in the cart shown.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.cart().map_or(0, Cart::total_quantity)
    }

    /// Whether the cart is being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, CartState::Loading)
    }

    /// True while an order is being placed.
    #[must_use]
    pub const fn is_checking_out(&self) -> bool {
        matches!(self.state, CartState::CheckingOut(_))
    }

    /// The line currently being removed.
    #[must_use]
    pub const fn removing(&self) -> Option<ItemId> {
        self.removing
    }

    /// The inline error for the current state, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CartState::LoadError(message) | CartState::CheckoutError { message, .. } => {
                Some(message.as_str())
            }
            _ => self.notice.as_deref(),
        }
    }

    /// Fetch the cart from the server.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> PageOutcome {
        let previous = mem::replace(&mut self.state, CartState::Loading);
        self.notice = None;

        let result = self.storefront.cart().load_cart().await;

        if !still_showing(&self.view, "load cart") {
            self.state = previous;
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(cart) => {
                self.state = CartState::Loaded(cart);
                PageOutcome::Completed
            }
            Err(err) if err.requires_login() => {
                self.state = previous;
                PageOutcome::Redirected(Route::Login)
            }
            Err(err) => {
                warn!(error = %err, "Cart load failed");
                self.state = CartState::LoadError(LOAD_FAILED.to_string());
                PageOutcome::Failed
            }
        }
    }

    /// Retry after a failed load.
    pub async fn retry(&mut self) -> PageOutcome {
        self.load().await
    }

    /// Remove a line, then reload the cart.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_item(&mut self, item_id: ItemId) -> PageOutcome {
        self.removing = Some(item_id);
        self.notice = None;

        let result = self.storefront.cart().delete_item(item_id).await;
        self.removing = None;

        if !still_showing(&self.view, "remove item") {
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(()) => self.load().await,
            Err(err) if err.requires_login() => PageOutcome::Redirected(Route::Login),
            Err(err) => {
                warn!(error = %err, "Cart line removal failed");
                self.notice = Some(REMOVE_FAILED.to_string());
                PageOutcome::Failed
            }
        }
    }

    /// Merge duplicate lines on the server, then reload the cart.
    #[instrument(skip(self))]
    pub async fn merge_duplicates(&mut self) -> PageOutcome {
        self.notice = None;
        let result = self.storefront.cart().cleanup().await;

        if !still_showing(&self.view, "merge duplicates") {
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(()) => self.load().await,
            Err(err) if err.requires_login() => PageOutcome::Redirected(Route::Login),
            Err(err) => {
                self.notice = Some(err.user_message());
                PageOutcome::Failed
            }
        }
    }

    /// Place an order for the loaded cart.
    ///
    /// Allowed from `Loaded` and, as a retry, from `CheckoutError`. On
    /// success the state becomes `OrderConfirmed` and the confirmation view
    /// is shown; collect the order with [`Self::take_order`].
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> PageOutcome {
        let cart = match mem::take(&mut self.state) {
            CartState::Loaded(cart) | CartState::CheckoutError { cart, .. } => cart,
            other => {
                self.state = other;
                return PageOutcome::Failed;
            }
        };
        self.notice = None;
        self.state = CartState::CheckingOut(cart.clone());

        let result = self.storefront.checkout().checkout(&cart).await;

        if !still_showing(&self.view, "checkout") {
            self.state = CartState::Loaded(cart);
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(order) => {
                self.state = CartState::OrderConfirmed(order);
                self.storefront.navigator().navigate(Route::OrderConfirmation);
                PageOutcome::Redirected(Route::OrderConfirmation)
            }
            Err(err) if err.requires_login() => {
                self.state = CartState::Loaded(cart);
                PageOutcome::Redirected(Route::Login)
            }
            Err(err) => {
                let message = match &err {
                    StoreError::EmptyCart => err.user_message(),
                    _ => err
                        .server_message()
                        .map_or_else(|| CHECKOUT_FAILED.to_string(), String::from),
                };
                self.state = CartState::CheckoutError { cart, message };
                PageOutcome::Failed
            }
        }
    }

    /// Leave `CheckoutError` and show the cart again.
    pub fn dismiss_error(&mut self) {
        self.state = match mem::take(&mut self.state) {
            CartState::CheckoutError { cart, .. } => CartState::Loaded(cart),
            other => other,
        };
        self.notice = None;
    }

    /// Hand over the placed order.
    ///
    /// Returns `None` unless the state is `OrderConfirmed`.
    pub fn take_order(&mut self) -> Option<Order> {
        match mem::take(&mut self.state) {
            CartState::OrderConfirmed(order) => Some(order),
            other => {
                self.state = other;
                None
            }
        }
    }
}
