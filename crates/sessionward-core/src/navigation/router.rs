use std::sync::{Arc, Mutex, RwLock};

use tracing::{info, warn};

use super::guard::{GuardDecision, NavigationGuard};
use super::routes::{normalize, Route, RouteTable};
use super::{NavigationError, NavigationOutcome, Navigator};
use crate::events::{SessionEvent, SessionListener};

/// Maximum redirects followed for a single navigation
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Default)]
struct RouterState {
    current: Option<Route>,
    history: Vec<String>,
}

/// In-process router: tracks the current location and runs every
/// registered guard before a transition.
pub struct Router {
    table: RouteTable,
    guards: RwLock<Vec<Arc<dyn NavigationGuard>>>,
    state: Mutex<RouterState>,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            guards: RwLock::new(Vec::new()),
            state: Mutex::new(RouterState::default()),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Register a guard to run before each transition, after those already registered
    pub fn before_each(&self, guard: Arc<dyn NavigationGuard>) {
        self.guards
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(guard);
    }

    pub fn current(&self) -> Option<String> {
        self.lock_state().current.as_ref().map(|r| r.path.clone())
    }

    /// Every location the router has moved to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.lock_state().history.clone()
    }

    /// First redirect from any guard wins
    fn run_guards(&self, target: &Route, origin: Option<&Route>) -> GuardDecision {
        let guards = self.guards.read().unwrap_or_else(|e| e.into_inner());
        for guard in guards.iter() {
            if let GuardDecision::Redirect(to) = guard.check(target, origin) {
                return GuardDecision::Redirect(to);
            }
        }
        GuardDecision::Proceed
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) -> Result<NavigationOutcome, NavigationError> {
        // Held for the whole transition so concurrent navigations serialize
        let mut state = self.lock_state();
        let requested = normalize(path);
        let mut target = requested.clone();
        let mut redirects = 0;

        let route = loop {
            let next = match self.table.redirect_for(&target) {
                Some(to) => normalize(to),
                None => {
                    let route = self.table.resolve(&target);
                    match self.run_guards(&route, state.current.as_ref()) {
                        GuardDecision::Proceed => break route,
                        GuardDecision::Redirect(to) => normalize(&to),
                    }
                }
            };

            redirects += 1;
            if redirects > MAX_REDIRECTS || next == target {
                warn!(requested = %requested, "Redirect loop");
                return Err(NavigationError::RedirectLoop(requested));
            }
            target = next;
        };

        if state.current.as_ref().map(|r| &r.path) == Some(&route.path) {
            return Ok(NavigationOutcome::Unchanged(route.path));
        }

        info!(from = ?state.current.as_ref().map(|r| &r.path), to = %route.path, "Navigated");
        let to = route.path.clone();
        state.history.push(to.clone());
        state.current = Some(route);
        Ok(NavigationOutcome::Navigated {
            redirected: to != requested,
            to,
        })
    }
}

impl SessionListener for Router {
    fn on_session_event(&self, event: SessionEvent) {
        if event != SessionEvent::Invalidated {
            return;
        }
        let login = self.table.login_route().to_string();
        if let Err(e) = self.navigate(&login) {
            warn!(error = %e, "Failed to navigate to login after session invalidation");
        }
    }
}
