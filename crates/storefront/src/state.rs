//! Storefront context shared by every page controller.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::accounts::Accounts;
use crate::api::ApiClient;
use crate::cart::CartSync;
use crate::checkout::Checkout;
use crate::config::{ApiConfig, StorefrontConfig};
use crate::error::StoreError;
use crate::intent::RedirectIntents;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;
use crate::storage::{DurableStorage, FileStorage};

/// Owns the session, redirect intents, navigator and backend client, and
/// hands them to page controllers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    session: SessionStore,
    intents: RedirectIntents,
    navigator: Navigator,
    api: ApiClient,
    cart: CartSync,
    checkout: Checkout,
    accounts: Accounts,
}

impl Storefront {
    /// Open the storefront with durable state in `config.state_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if stored state cannot be read or the HTTP client
    /// cannot be built.
    pub fn open(config: &StorefrontConfig) -> Result<Self, StoreError> {
        let storage = Arc::new(FileStorage::new(&config.state_dir));
        Self::with_storage(&config.api, storage)
    }

    /// Build the storefront over an arbitrary storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if stored state cannot be read or the HTTP client
    /// cannot be built.
    pub fn with_storage(
        config: &ApiConfig,
        storage: Arc<dyn DurableStorage>,
    ) -> Result<Self, StoreError> {
        let session = SessionStore::load(Arc::clone(&storage))?;
        let intents = RedirectIntents::new(storage);
        let navigator = Navigator::new(Route::Home);
        let api = ApiClient::new(config, session.clone(), navigator.clone())?;

        let cart = CartSync::new(api.clone(), session.clone());
        let checkout = Checkout::new(api.clone());
        let accounts = Accounts::new(
            api.clone(),
            session.clone(),
            intents.clone(),
            navigator.clone(),
        );

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                session,
                intents,
                navigator,
                api,
                cart,
                checkout,
                accounts,
            }),
        })
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the redirect intent tracker.
    #[must_use]
    pub fn intents(&self) -> &RedirectIntents {
        &self.inner.intents
    }

    /// Get a reference to the navigator.
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to cart synchronization.
    #[must_use]
    pub fn cart(&self) -> &CartSync {
        &self.inner.cart
    }

    /// Get a reference to the checkout transition.
    #[must_use]
    pub fn checkout(&self) -> &Checkout {
        &self.inner.checkout
    }

    /// Get a reference to account operations.
    #[must_use]
    pub fn accounts(&self) -> &Accounts {
        &self.inner.accounts
    }

    /// Navigate to `route`, sending signed-out users to login first.
    ///
    /// For a protected route without a session the route's path is recorded
    /// as the redirect intent. Returns the route actually shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent cannot be stored.
    #[instrument(skip(self), fields(route = %route))]
    pub fn guard(&self, route: Route) -> Result<Route, StoreError> {
        if route.is_protected() && !self.inner.session.is_authenticated() {
            debug!("Protected route needs sign-in");
            self.inner.intents.record_intent(&route.path())?;
            self.inner.navigator.redirect_to_login();
            return Ok(Route::Login);
        }
        self.inner.navigator.navigate(route);
        Ok(route)
    }

    /// Record `route` as the redirect intent and show the login view.
    ///
    /// Used when an action (rather than a navigation) turns out to need a
    /// session, so that login resumes the view the action came from.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent cannot be stored.
    pub fn require_login(&self, route: Route) -> Result<(), StoreError> {
        self.inner.intents.record_intent(&route.path())?;
        self.inner.navigator.redirect_to_login();
        Ok(())
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("session", &self.inner.session)
            .field("navigator", &self.inner.navigator)
            .finish_non_exhaustive()
    }
}
