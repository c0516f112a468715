//! Route table and navigation
//!
//! Paths map to views; the [`NavigationGuard`] decides every transition.

pub mod guard;

use std::fmt;

use serde::Serialize;

pub use guard::{AuthCheck, Navigation, NavigationGuard, RemoteAuthCheck};

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// Redirect chains longer than this are aborted
const MAX_REDIRECTS: usize = 5;

/// View rendered for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    HomePage,
    UploadPage,
    LoginPage,
    RegisterPage,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One entry of the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub requires_auth: bool,
}

/// The application's routes
pub static ROUTES: &[Route] = &[
    Route {
        path: "/",
        name: "Home",
        view: View::HomePage,
        requires_auth: true,
    },
    Route {
        path: "/upload",
        name: "Upload",
        view: View::UploadPage,
        requires_auth: true,
    },
    Route {
        path: "/login",
        name: "Login",
        view: View::LoginPage,
        requires_auth: false,
    },
    Route {
        path: "/register",
        name: "Register",
        view: View::RegisterPage,
        requires_auth: false,
    },
];

/// Result of [`Router::navigate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// Navigation finished on `route`, after following `redirects` in order
    Completed {
        route: Route,
        redirects: Vec<String>,
    },
    /// Navigation stopped at `path`; the current route is unchanged
    Aborted { path: String, reason: String },
}

/// Router over a static route table
pub struct Router {
    routes: &'static [Route],
    guard: NavigationGuard,
    current: Option<Route>,
}

impl Router {
    pub fn new(guard: NavigationGuard) -> Self {
        Self {
            routes: ROUTES,
            guard,
            current: None,
        }
    }

    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Last route a navigation completed on
    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    /// Find the route for a location.
    ///
    /// Accepts hash-style locations (`#/upload`) and ignores query strings.
    pub fn resolve(&self, location: &str) -> Option<&'static Route> {
        let path = location.trim_start_matches('#');
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let path = if path.is_empty() { HOME_PATH } else { path };
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        self.routes.iter().find(|r| r.path == path)
    }

    /// Navigate to `location`, running the guard on each hop
    pub async fn navigate(&mut self, location: &str) -> NavigationOutcome {
        let mut target = location.to_string();
        let mut redirects = Vec::new();

        loop {
            let Some(to) = self.resolve(&target) else {
                return NavigationOutcome::Aborted {
                    path: target,
                    reason: "no route matches this path".to_string(),
                };
            };

            match self.guard.before_each(to, self.current.as_ref()).await {
                Navigation::Proceed => {
                    self.current = Some(*to);
                    return NavigationOutcome::Completed {
                        route: *to,
                        redirects,
                    };
                }
                Navigation::RedirectTo(next) => {
                    if redirects.len() >= MAX_REDIRECTS {
                        return NavigationOutcome::Aborted {
                            path: target,
                            reason: "too many redirects".to_string(),
                        };
                    }
                    log::debug!("Redirecting {} -> {}", to.path, next);
                    redirects.push(to.path.to_string());
                    target = next;
                }
                Navigation::Abort => {
                    return NavigationOutcome::Aborted {
                        path: target,
                        reason: "navigation blocked".to_string(),
                    };
                }
            }
        }
    }
}
