//! Assembles the session components the way the dashboard uses them.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, ApiError, BearerAuth, SessionExpiry};
use crate::auth::{AuthService, SessionState, TokenStore};
use crate::config::Config;
use crate::events::SessionEvents;
use crate::navigation::{RouteGuard, RouteTable, Router};
use crate::notify::Notifier;
use crate::storage::Storage;

/// The wired session stack.
///
/// - requests carry the stored credential (`BearerAuth`)
/// - a 401 clears the session and publishes `Invalidated` (`SessionExpiry`)
/// - `SessionState` and `Router` listen for session events
/// - `Router` runs a `RouteGuard` before each transition
pub struct SessionApp {
    pub store: TokenStore,
    pub events: SessionEvents,
    pub session: Arc<SessionState>,
    pub router: Arc<Router>,
    pub client: ApiClient,
    pub auth: AuthService,
}

impl SessionApp {
    pub fn new(
        config: &Config,
        durable: Arc<dyn Storage>,
        ephemeral: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let store = TokenStore::new(durable, ephemeral);
        let events = SessionEvents::new();

        let session = Arc::new(SessionState::new(store.clone()));
        events.subscribe(session.clone());

        let table = RouteTable::dashboard().with_entry_points(&config.login_route, &config.landing_route);
        let guard = RouteGuard::new(
            store.clone(),
            config.guard_policy,
            table.login_route(),
            table.landing_route(),
        );
        let login_route = table.login_route().to_string();
        let landing_route = table.landing_route().to_string();
        let router = Arc::new(Router::new(table));
        router.before_each(Arc::new(guard));
        events.subscribe(router.clone());

        let client = ApiClient::with_timeout(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?
        .with_request_interceptor(Arc::new(BearerAuth::new(store.clone())))
        .with_response_interceptor(Arc::new(SessionExpiry::new(store.clone(), events.clone())));

        let auth = AuthService::new(
            store.clone(),
            session.clone(),
            client.clone(),
            notifier,
            router.clone(),
            events.clone(),
        )
        .with_logout_path(config.logout_path.clone())
        .with_routes(&login_route, &landing_route);

        Ok(Self {
            store,
            events,
            session,
            router,
            client,
            auth,
        })
    }
}
