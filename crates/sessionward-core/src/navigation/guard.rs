use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::routes::{normalize, Route};
use crate::auth::TokenStore;

/// Which routes require a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardPolicy {
    /// Every route except the login route requires a credential
    #[default]
    Global,
    /// Only routes flagged `requires_auth` require a credential
    PerRoute,
}

impl FromStr for GuardPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(GuardPolicy::Global),
            "per-route" | "per_route" | "perroute" => Ok(GuardPolicy::PerRoute),
            other => Err(format!("unknown guard policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Predicate consulted before each transition.
pub trait NavigationGuard: Send + Sync {
    fn check(&self, target: &Route, origin: Option<&Route>) -> GuardDecision;
}

/// Keeps signed-out users on the login route and signed-in users off it.
pub struct RouteGuard {
    store: TokenStore,
    policy: GuardPolicy,
    login_route: String,
    landing_route: String,
}

impl RouteGuard {
    pub fn new(store: TokenStore, policy: GuardPolicy, login_route: &str, landing_route: &str) -> Self {
        Self {
            store,
            policy,
            login_route: normalize(login_route),
            landing_route: normalize(landing_route),
        }
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    fn requires_auth(&self, target: &Route) -> bool {
        match self.policy {
            GuardPolicy::Global => true,
            GuardPolicy::PerRoute => target.requires_auth,
        }
    }
}

impl NavigationGuard for RouteGuard {
    fn check(&self, target: &Route, origin: Option<&Route>) -> GuardDecision {
        let authenticated = self.store.get_credential().is_some();
        let is_login = target.path == self.login_route;

        let decision = if is_login && authenticated {
            GuardDecision::Redirect(self.landing_route.clone())
        } else if !is_login && !authenticated && self.requires_auth(target) {
            GuardDecision::Redirect(self.login_route.clone())
        } else {
            GuardDecision::Proceed
        };

        debug!(
            target = %target.path,
            origin = origin.map(|r| r.path.as_str()).unwrap_or("-"),
            authenticated,
            ?decision,
            "Route guard"
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CREDENTIAL_KEY;
    use crate::navigation::RouteTable;
    use crate::storage::{MemoryStorage, Storage};
    use std::sync::Arc;

    fn guard(policy: GuardPolicy, signed_in: bool) -> RouteGuard {
        let durable = Arc::new(MemoryStorage::new());
        if signed_in {
            durable.set(CREDENTIAL_KEY, "abc").unwrap();
        }
        let store = TokenStore::new(durable, Arc::new(MemoryStorage::new()));
        RouteGuard::new(store, policy, "/login", "/dashboard")
    }

    fn route(path: &str) -> Route {
        RouteTable::dashboard().resolve(path)
    }

    #[test]
    fn test_login_with_credential_redirects_to_landing() {
        let guard = guard(GuardPolicy::Global, true);
        assert_eq!(
            guard.check(&route("/login"), None),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_protected_without_credential_redirects_to_login() {
        let guard = guard(GuardPolicy::Global, false);
        assert_eq!(
            guard.check(&route("/dashboard"), Some(&route("/login"))),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_protected_with_credential_proceeds() {
        let guard = guard(GuardPolicy::Global, true);
        assert_eq!(
            guard.check(&route("/dashboard"), Some(&route("/users"))),
            GuardDecision::Proceed
        );
    }

    #[test]
    fn test_login_without_credential_proceeds() {
        let guard = guard(GuardPolicy::Global, false);
        assert_eq!(guard.check(&route("/login"), None), GuardDecision::Proceed);
    }

    #[test]
    fn test_global_policy_ignores_route_flag() {
        let guard = guard(GuardPolicy::Global, false);
        // /categories carries no requires_auth flag
        assert_eq!(
            guard.check(&route("/categories"), None),
            GuardDecision::Redirect("/login".to_string())
        );
        assert_eq!(
            guard.check(&route("/unknown"), None),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_per_route_policy_uses_route_flag() {
        let signed_out = guard(GuardPolicy::PerRoute, false);
        assert_eq!(signed_out.check(&route("/categories"), None), GuardDecision::Proceed);
        assert_eq!(signed_out.check(&route("/unknown"), None), GuardDecision::Proceed);
        assert_eq!(
            signed_out.check(&route("/users"), None),
            GuardDecision::Redirect("/login".to_string())
        );

        // Login is still off limits once signed in
        let signed_in = guard(GuardPolicy::PerRoute, true);
        assert_eq!(
            signed_in.check(&route("/login"), None),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_entry_points_are_normalized() {
        let durable = Arc::new(MemoryStorage::new());
        let store = TokenStore::new(durable.clone(), Arc::new(MemoryStorage::new()));
        let guard = RouteGuard::new(store, GuardPolicy::Global, "login", "dashboard/");

        assert_eq!(guard.check(&route("/login"), None), GuardDecision::Proceed);
        assert_eq!(
            guard.check(&route("/users"), None),
            GuardDecision::Redirect("/login".to_string())
        );

        durable.set(CREDENTIAL_KEY, "abc").unwrap();
        assert_eq!(
            guard.check(&route("/login"), None),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("global".parse::<GuardPolicy>(), Ok(GuardPolicy::Global));
        assert_eq!("Per-Route".parse::<GuardPolicy>(), Ok(GuardPolicy::PerRoute));
        assert!("sometimes".parse::<GuardPolicy>().is_err());
    }
}
