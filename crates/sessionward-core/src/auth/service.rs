use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info, warn};

use super::{SessionState, TokenStore, UserProfile};
use crate::api::ApiClient;
use crate::events::{SessionEvent, SessionEvents};
use crate::navigation::routes::{LANDING_ROUTE, LOGIN_ROUTE};
use crate::navigation::Navigator;
use crate::notify::{NotificationKind, Notifier, NotifyOptions};
use crate::storage::StorageError;

/// Remote endpoint that ends the server-side session
pub const DEFAULT_LOGOUT_PATH: &str = "/api/logout";

const LOGOUT_MESSAGE: &str = "Logged out successfully";

/// Session actions exposed to the UI layer.
pub struct AuthService {
    store: TokenStore,
    session: Arc<SessionState>,
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    events: SessionEvents,
    logout_path: Option<String>,
    login_route: String,
    landing_route: String,
}

impl AuthService {
    pub fn new(
        store: TokenStore,
        session: Arc<SessionState>,
        client: ApiClient,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        events: SessionEvents,
    ) -> Self {
        Self {
            store,
            session,
            client,
            notifier,
            navigator,
            events,
            logout_path: Some(DEFAULT_LOGOUT_PATH.to_string()),
            login_route: LOGIN_ROUTE.to_string(),
            landing_route: LANDING_ROUTE.to_string(),
        }
    }

    /// Remote logout endpoint; `None` skips the remote call
    pub fn with_logout_path(mut self, path: Option<String>) -> Self {
        self.logout_path = path;
        self
    }

    pub fn with_routes(mut self, login_route: &str, landing_route: &str) -> Self {
        self.login_route = login_route.to_string();
        self.landing_route = landing_route.to_string();
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn get_user(&self) -> Option<UserProfile> {
        self.session.get_user()
    }

    /// Force-reload the profile from storage
    pub fn load_user(&self) -> Option<UserProfile> {
        self.session.load_user()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Store the result of a successful login and move to the landing route.
    pub fn login(
        &self,
        credential: &str,
        profile: &UserProfile,
        persistent: bool,
    ) -> Result<(), StorageError> {
        self.store.set_session(credential, profile, persistent)?;
        self.events.publish(SessionEvent::LoggedIn { persistent });
        info!(persistent, "Logged in");

        if let Err(e) = self.navigator.navigate(&self.landing_route) {
            warn!(error = %e, "Failed to navigate after login");
        }
        Ok(())
    }

    /// End the session.
    ///
    /// The remote call is best effort. Local teardown, the notification and
    /// the move to the login route happen whatever its outcome.
    pub async fn logout(&self) {
        if let Some(ref path) = self.logout_path {
            match self.client.send(self.client.request(Method::POST, path)).await {
                Ok(_) => debug!("Remote session ended"),
                Err(e) => warn!(error = %e, "Remote logout failed, logging out locally"),
            }
        }

        if let Err(e) = self.store.clear_session() {
            warn!(error = %e, "Failed to clear stored session");
        }
        self.session.invalidate();
        self.events.publish(SessionEvent::LoggedOut);
        info!("Logged out");

        self.notifier
            .notify(LOGOUT_MESSAGE, NotificationKind::Success, &NotifyOptions::default());

        if let Err(e) = self.navigator.navigate(&self.login_route) {
            warn!(error = %e, "Failed to navigate to login after logout");
        }
    }
}
