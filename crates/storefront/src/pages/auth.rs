//! Login and sign-up views.

use tracing::instrument;

use super::{PageOutcome, still_showing};
use crate::error::StoreError;
use crate::navigation::{Route, ViewToken};
use crate::state::Storefront;

const LOGIN_FAILED: &str = "Invalid username or password. Please try again.";
const SIGNUP_FAILED: &str = "Error creating account";

/// Make `route` the current view and return a token for it.
fn show(storefront: &Storefront, route: Route) -> ViewToken {
    let navigator = storefront.navigator();
    if navigator.current() != route {
        navigator.navigate(route);
    }
    navigator.view_token()
}

/// The login form.
#[derive(Debug)]
pub struct LoginPage {
    storefront: Storefront,
    view: ViewToken,
    submitting: bool,
    error: Option<String>,
}

impl LoginPage {
    /// Open the login view, navigating to it first if another route is showing.
    #[must_use]
    pub fn open(storefront: &Storefront) -> Self {
        Self {
            view: show(storefront, Route::Login),
            storefront: storefront.clone(),
            submitting: false,
            error: None,
        }
    }

    /// Whether a login request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The message shown under the form, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sign in and resume the path the user was turned back from.
    #[instrument(skip(self, password))]
    pub async fn submit(&mut self, username: &str, password: &str) -> PageOutcome {
        self.submitting = true;
        self.error = None;

        let result = self.storefront.accounts().login(username, password).await;
        self.submitting = false;

        if !still_showing(&self.view, "login") {
            return PageOutcome::Abandoned;
        }

        match result.and_then(|route| self.storefront.guard(route)) {
            Ok(shown) => PageOutcome::Redirected(shown),
            Err(err @ StoreError::Validation(_)) => {
                self.error = Some(err.user_message());
                PageOutcome::Failed
            }
            Err(_) => {
                self.error = Some(LOGIN_FAILED.to_string());
                PageOutcome::Failed
            }
        }
    }
}

/// The sign-up form.
#[derive(Debug)]
pub struct SignupPage {
    storefront: Storefront,
    view: ViewToken,
    submitting: bool,
    error: Option<String>,
}

impl SignupPage {
    /// Open the sign-up view.
    #[must_use]
    pub fn open(storefront: &Storefront) -> Self {
        Self {
            view: show(storefront, Route::Signup),
            storefront: storefront.clone(),
            submitting: false,
            error: None,
        }
    }

    /// True while the account is being created.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Why the last attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Create the account.
    ///
    /// On success the user is sent to the login view, or home when the
    /// backend signed them in directly.
    #[instrument(skip(self, password, confirm))]
    pub async fn submit(&mut self, username: &str, password: &str, confirm: &str) -> PageOutcome {
        self.submitting = true;
        self.error = None;

        let result = self
            .storefront
            .accounts()
            .signup(username, password, confirm)
            .await;
        self.submitting = false;

        if !still_showing(&self.view, "signup") {
            return PageOutcome::Abandoned;
        }

        match result {
            Ok(created) => {
                let next = if created.signed_in {
                    Route::Home
                } else {
                    Route::Login
                };
                self.storefront.navigator().navigate(next);
                PageOutcome::Redirected(next)
            }
            Err(err @ StoreError::Validation(_)) => {
                self.error = Some(err.user_message());
                PageOutcome::Failed
            }
            Err(err) => {
                self.error = Some(
                    err.server_message()
                        .map_or_else(|| SIGNUP_FAILED.to_string(), String::from),
                );
                PageOutcome::Failed
            }
        }
    }
}
