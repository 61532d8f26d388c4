//! Route table and navigation state.
//!
//! The [`Navigator`] is the single record of "which view is showing". Page
//! controllers take a [`ViewToken`] when they open; a navigation anywhere in
//! the process (including the forced sign-out in the request pipeline) makes
//! older tokens stale, and results arriving for a stale view are dropped
//! instead of being applied.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use shopcart_core::ItemId;
use thiserror::Error;
use tracing::debug;

use crate::error::add_breadcrumb;

/// Home path, the default landing page after login.
pub const HOME_PATH: &str = "/";

/// A client-side route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// `/` - catalog list.
    #[default]
    Home,
    /// `/products` - product grid.
    Products,
    /// `/product/{id}` - product detail.
    Product(ItemId),
    /// `/login`
    Login,
    /// `/signup`
    Signup,
    /// `/cart` (protected)
    Cart,
    /// `/orders` (protected)
    Orders,
    /// `/order-confirmation` (protected)
    OrderConfirmation,
}

impl Route {
    /// The URL path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => HOME_PATH.to_string(),
            Self::Products => "/products".to_string(),
            Self::Product(id) => format!("/product/{id}"),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::OrderConfirmation => "/order-confirmation".to_string(),
        }
    }

    /// Whether the route requires a signed-in user.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(self, Self::Cart | Self::Orders | Self::OrderConfirmation)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A path that does not name any route.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        let route = match path {
            "" | "/" => Self::Home,
            "/products" => Self::Products,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/cart" => Self::Cart,
            "/orders" => Self::Orders,
            "/order-confirmation" => Self::OrderConfirmation,
            other => {
                let id = other
                    .strip_prefix("/product/")
                    .and_then(|id| id.parse::<ItemId>().ok())
                    .ok_or_else(|| UnknownRoute(s.to_string()))?;
                Self::Product(id)
            }
        };
        Ok(route)
    }
}

/// Shared navigation state.
///
/// Cheap to clone; all clones observe the same current route.
#[derive(Clone, Default)]
pub struct Navigator {
    inner: Arc<RwLock<NavState>>,
}

#[derive(Default)]
struct NavState {
    current: Route,
    history: Vec<Route>,
    generation: u64,
}

impl Navigator {
    /// Create a navigator starting at `start`.
    #[must_use]
    pub fn new(start: Route) -> Self {
        Self {
            inner: Arc::new(RwLock::new(NavState {
                current: start,
                history: vec![start],
                generation: 0,
            })),
        }
    }

    /// The route currently showing.
    #[must_use]
    pub fn current(&self) -> Route {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    /// Every route visited, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }

    /// Show `route`, invalidating every outstanding [`ViewToken`].
    pub fn navigate(&self, route: Route) {
        {
            let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            state.current = route;
            state.history.push(route);
            state.generation += 1;
        }
        debug!(%route, "navigate");
        add_breadcrumb("navigation", &route.path(), None);
    }

    /// Show the login view.
    ///
    /// When the login view is already showing this does nothing, so a
    /// rejected sign-in attempt does not invalidate the login view's own
    /// token.
    pub fn redirect_to_login(&self) {
        if self.current() == Route::Login {
            debug!("Already on login view");
            return;
        }
        self.navigate(Route::Login);
    }

    /// A token for the view showing right now.
    #[must_use]
    pub fn view_token(&self) -> ViewToken {
        let generation = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation;
        ViewToken {
            navigator: self.clone(),
            generation,
        }
    }

    fn generation(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

/// Handle telling a page controller whether its view is still showing.
#[derive(Clone, Debug)]
pub struct ViewToken {
    navigator: Navigator,
    generation: u64,
}

impl ViewToken {
    /// False once any navigation has happened since the token was taken.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.navigator.generation() == self.generation
    }
}
