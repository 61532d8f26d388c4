//! Page controllers.
//!
//! Each controller holds one view's local state (loading flags, error
//! message, loaded data) and performs that view's transitions. Controllers
//! take a [`ViewToken`](crate::navigation::ViewToken) when opened; a result
//! that arrives after the user has navigated elsewhere is discarded and the
//! action reports [`PageOutcome::Abandoned`].
//!
//! Authentication failures never become inline messages: the request
//! pipeline or the controller sends the user to the login view and the
//! action reports [`PageOutcome::Redirected`].

mod auth;
mod cart;
mod catalog;
mod confirmation;
mod navbar;
mod orders;
mod product;

pub use auth::{LoginPage, SignupPage};
pub use cart::{CartPage, CartState};
pub use catalog::CatalogPage;
pub use confirmation::ConfirmationPage;
pub use navbar::NavBar;
pub use orders::OrderHistoryPage;
pub use product::{ProductPage, QUANTITY_CHOICES};

use tracing::debug;

use crate::navigation::{Route, ViewToken};

/// How a page action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The action succeeded and the page state reflects it.
    Completed,
    /// The action failed; the page's error message says why.
    Failed,
    /// The action moved the user to another view.
    Redirected(Route),
    /// The view was left before the action finished; its result was dropped.
    Abandoned,
}

/// True if `view` is still showing; logs the drop otherwise.
fn still_showing(view: &ViewToken, action: &str) -> bool {
    if view.is_current() {
        return true;
    }
    debug!(action, "Discarding result for abandoned view");
    false
}
