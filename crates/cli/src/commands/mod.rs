//! Subcommands.
//!
//! Each command opens the page controller for its view, runs one action and
//! prints the resulting page state.

pub mod account;
pub mod cart;
pub mod catalog;

use shopcart_storefront::config::ConfigError;
use shopcart_storefront::navigation::UnknownRoute;
use shopcart_storefront::pages::{ConfirmationPage, PageOutcome};
use shopcart_storefront::{Route, StoreError, Storefront};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    UnknownRoute(#[from] UnknownRoute),

    /// The page showed an inline error.
    #[error("{0}")]
    Page(String),

    #[error("Sign in first with `shopcart login`")]
    LoginRequired,
}

/// Turn a page outcome into a command result.
fn finish(outcome: PageOutcome, error: Option<&str>) -> Result<(), CliError> {
    match outcome {
        PageOutcome::Redirected(Route::Login) => Err(CliError::LoginRequired),
        PageOutcome::Failed => Err(CliError::Page(
            error.unwrap_or("Request failed").to_string(),
        )),
        PageOutcome::Completed | PageOutcome::Redirected(_) | PageOutcome::Abandoned => Ok(()),
    }
}

/// Navigate to `route`, failing if it needs a session the user lacks.
fn enter(storefront: &Storefront, route: Route) -> Result<(), CliError> {
    if storefront.guard(route)? == Route::Login && route != Route::Login {
        return Err(CliError::LoginRequired);
    }
    Ok(())
}

/// Open a storefront path.
///
/// A protected path opened while signed out is remembered, and the next
/// `shopcart login` resumes it.
pub async fn visit(storefront: &Storefront, path: &str) -> Result<(), CliError> {
    let route: Route = path.parse()?;
    show(storefront, route).await
}

/// Print the view for `route`.
pub(crate) async fn show(storefront: &Storefront, route: Route) -> Result<(), CliError> {
    match route {
        Route::Home | Route::Products => catalog::items(storefront).await,
        Route::Product(id) => catalog::item(storefront, id).await,
        Route::Cart => cart::show(storefront).await,
        Route::Orders => cart::orders(storefront).await,
        Route::OrderConfirmation => {
            // Nothing to confirm outside of a checkout
            let _ = ConfirmationPage::open(storefront, None);
            cart::show(storefront).await
        }
        Route::Login | Route::Signup => {
            storefront.navigator().navigate(route);
            account::prompt(route);
            Ok(())
        }
    }
}
