//! Request pipeline shared by every backend call.
//!
//! [`AuthLayer`] wraps the HTTP client in a `tower` service that:
//!
//! 1. Attaches `Authorization: Bearer <token>` when a session is present.
//! 2. On any `401 Unauthorized` response, clears the session and sends the
//!    navigator to the login view, whichever page issued the request.
//!
//! The response is still returned to the caller, which maps the 401 to its
//! own error.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, Response, StatusCode};
use tower::{Layer, Service};
use tracing::{error, warn};

use crate::navigation::Navigator;
use crate::session::SessionStore;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Layer applying the bearer-credential and forced-sign-out policy.
#[derive(Clone, Debug)]
pub struct AuthLayer {
    session: SessionStore,
    navigator: Navigator,
}

impl AuthLayer {
    /// Authenticate requests from `session`; a rejected token sends `navigator` to login.
    #[must_use]
    pub const fn new(session: SessionStore, navigator: Navigator) -> Self {
        Self { session, navigator }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            session: self.session.clone(),
            navigator: self.navigator.clone(),
        }
    }
}

/// Service produced by [`AuthLayer`].
#[derive(Clone, Debug)]
pub struct AuthService<S> {
    inner: S,
    session: SessionStore,
    navigator: Navigator,
}

impl<S> Service<Request> for AuthService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        if let Some(bearer) = self.session.bearer() {
            match HeaderValue::from_str(&bearer) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored token is not a valid header value, sending without it"),
            }
        }

        // The clone may not be ready; swap it in and drive the ready one.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let session = self.session.clone();
        let navigator = self.navigator.clone();

        Box::pin(async move {
            let response = inner.call(request).await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                warn!(
                    url = %response.url(),
                    "Backend rejected credential, signing out"
                );
                if let Err(e) = session.clear_session() {
                    error!(error = %e, "Failed to clear stored session");
                }
                navigator.redirect_to_login();
            }

            Ok(response)
        })
    }
}
