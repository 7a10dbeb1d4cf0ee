//! Client-side navigation: the route table, the authentication guard and
//! the router that runs guards before every transition.

pub mod guard;
pub mod router;
pub mod routes;

use thiserror::Error;

pub use guard::{GuardDecision, GuardPolicy, NavigationGuard, RouteGuard};
pub use router::Router;
pub use routes::{Route, RouteDescriptor, RouteTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Redirect loop while navigating to {0}")]
    RedirectLoop(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The router moved to `to`. `redirected` is set when a table entry
    /// or a guard sent it somewhere other than the requested path.
    Navigated { to: String, redirected: bool },
    /// The resolved location is already current; nothing happened
    Unchanged(String),
}

impl NavigationOutcome {
    pub fn location(&self) -> &str {
        match self {
            NavigationOutcome::Navigated { to, .. } => to,
            NavigationOutcome::Unchanged(path) => path,
        }
    }
}

/// The navigation layer as seen by the session components.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str) -> Result<NavigationOutcome, NavigationError>;
}
