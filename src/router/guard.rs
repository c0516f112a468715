//! Navigation guard
//!
//! Runs before every navigation. Protected routes need the local login flag
//! and a successful remote session check; the login page bounces a user whose
//! session is still live back home.

use std::sync::Arc;

use async_trait::async_trait;

use super::{HOME_PATH, LOGIN_PATH, Route};
use crate::client::{Credentials, RequestOptions, Transport};
use crate::session::LoginFlag;

/// Verdict of the guard for one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Continue to the requested route
    Proceed,
    /// Go to another path instead
    RedirectTo(String),
    /// Stay where we are
    Abort,
}

/// Remote session liveness check
#[async_trait]
pub trait AuthCheck: Send + Sync {
    /// True only when the backend confirms the session
    async fn is_authenticated(&self) -> bool;
}

/// `GET {api_base_url}/check_auth` with credentials
pub struct RemoteAuthCheck {
    transport: Arc<dyn Transport>,
    url: String,
}

impl RemoteAuthCheck {
    pub fn new(transport: Arc<dyn Transport>, url: String) -> Self {
        Self { transport, url }
    }
}

#[async_trait]
impl AuthCheck for RemoteAuthCheck {
    async fn is_authenticated(&self) -> bool {
        let options = RequestOptions::get().with_credentials(Credentials::Include);
        match self.transport.fetch(&self.url, &options).await {
            Ok(response) => {
                log::debug!("Auth check returned {}", response.status);
                response.ok()
            }
            Err(e) => {
                log::warn!("Auth check failed: {}", e);
                false
            }
        }
    }
}

/// Authorization gate consulted before each navigation
#[derive(Clone)]
pub struct NavigationGuard {
    flag: LoginFlag,
    auth: Arc<dyn AuthCheck>,
}

impl NavigationGuard {
    pub fn new(flag: LoginFlag, auth: Arc<dyn AuthCheck>) -> Self {
        Self { flag, auth }
    }

    /// Decide a navigation from `from` to `to`.
    ///
    /// Issues at most one remote check, and none when the local flag is
    /// absent.
    pub async fn before_each(&self, to: &Route, from: Option<&Route>) -> Navigation {
        log::debug!(
            "Navigating {} -> {}",
            from.map(|r| r.path).unwrap_or("(start)"),
            to.path
        );

        if to.path == LOGIN_PATH {
            if self.flag.is_set() && self.auth.is_authenticated().await {
                return Navigation::RedirectTo(HOME_PATH.to_string());
            }
            return Navigation::Proceed;
        }

        if !to.requires_auth {
            return Navigation::Proceed;
        }

        if !self.flag.is_set() {
            return Navigation::RedirectTo(LOGIN_PATH.to_string());
        }

        if self.auth.is_authenticated().await {
            Navigation::Proceed
        } else {
            self.flag.clear();
            Navigation::RedirectTo(LOGIN_PATH.to_string())
        }
    }
}
