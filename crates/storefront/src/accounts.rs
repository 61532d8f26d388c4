//! Sign-up, sign-in and sign-out.

use shopcart_core::{NewAccount, Password, Username};
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::error::StoreError;
use crate::intent::RedirectIntents;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;

/// Result of creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCreated {
    pub username: String,
    /// Whether the backend issued a token and the session was started.
    pub signed_in: bool,
}

/// Account operations over the session store.
#[derive(Clone, Debug)]
pub struct Accounts {
    api: ApiClient,
    session: SessionStore,
    intents: RedirectIntents,
    navigator: Navigator,
}

impl Accounts {
    #[must_use]
    pub const fn new(
        api: ApiClient,
        session: SessionStore,
        intents: RedirectIntents,
        navigator: Navigator,
    ) -> Self {
        Self {
            api,
            session,
            intents,
            navigator,
        }
    }

    /// Create an account from a sign-up form.
    ///
    /// The form is validated before any request. If the backend returns a
    /// token along with the account, the session is started with it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an invalid form, or another
    /// error if the backend refuses the account.
    #[instrument(skip(self, password, confirm))]
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<AccountCreated, StoreError> {
        let account = NewAccount::parse(username, password, confirm)?;
        let created = self.api.signup(&account.username, &account.password).await?;

        let signed_in = match created.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                self.session.set_session(token, &created.username)?;
                true
            }
            None => false,
        };

        info!(username = %created.username, signed_in, "Account created");
        Ok(AccountCreated {
            username: created.username,
            signed_in,
        })
    }

    /// Sign in and return the route to resume.
    ///
    /// On success the session holds the returned token and the submitted
    /// username, and the pending redirect intent is consumed. A missing or
    /// unrecognized intent resumes at the home route.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidCredentials`] when the backend rejects the
    /// pair, [`StoreError::Validation`] for blank input, or another error if
    /// the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Route, StoreError> {
        let username = Username::parse(username)?;
        let password = Password::for_login(password)?;

        let response = match self.api.login(&username, &password).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized) => return Err(StoreError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        self.session.set_session(&response.token, username.as_str())?;

        let path = self.intents.consume_intent()?;
        let route = path.parse::<Route>().unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unrecognized redirect intent");
            Route::Home
        });
        Ok(route)
    }

    /// Sign out and show the login view.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed; the login
    /// view is shown regardless.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), StoreError> {
        let result = self.session.clear_session();
        self.navigator.navigate(Route::Login);
        result.map_err(StoreError::from)
    }
}
