//! Navigation bar: the signed-in user and sign-out.

use crate::error::StoreError;
use crate::state::Storefront;

#[derive(Debug, Clone)]
pub struct NavBar {
    storefront: Storefront,
}

impl NavBar {
    /// The navigation bar for `storefront`.
    #[must_use]
    pub fn new(storefront: &Storefront) -> Self {
        Self {
            storefront: storefront.clone(),
        }
    }

    /// The signed-in username. Read fresh on every call.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.storefront.session().username()
    }

    /// Whether a session is stored right now.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.storefront.session().is_authenticated()
    }

    /// Sign out and show the login view.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.storefront.accounts().logout()
    }
}
