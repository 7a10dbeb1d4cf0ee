use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::{TokenStore, UserProfile};
use crate::events::{SessionEvent, SessionListener};

/// Authentication status derived from the `TokenStore`.
///
/// `is_authenticated` reads storage on every call, so it can never disagree
/// with what is stored. Only the user profile is cached, and that cache is
/// dropped whenever the session ends or changes.
pub struct SessionState {
    store: TokenStore,
    user: Mutex<Option<UserProfile>>,
}

impl SessionState {
    pub fn new(store: TokenStore) -> Self {
        Self {
            store,
            user: Mutex::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get_credential().is_some()
    }

    /// The cached profile, loading it from storage on first use.
    pub fn get_user(&self) -> Option<UserProfile> {
        let mut user = self.lock();
        if user.is_none() {
            *user = self.store.get_profile();
        }
        user.clone()
    }

    /// Reload the profile from storage, replacing the cached one.
    pub fn load_user(&self) -> Option<UserProfile> {
        let profile = self.store.get_profile();
        *self.lock() = profile.clone();
        profile
    }

    /// Drop the cached profile. Safe to call any number of times.
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            debug!("Dropped cached user profile");
        }
    }

    /// The cached profile without touching storage
    pub fn cached_user(&self) -> Option<UserProfile> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<UserProfile>> {
        self.user.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionListener for SessionState {
    fn on_session_event(&self, event: SessionEvent) {
        match event {
            // A new login may carry a different profile; reload lazily
            SessionEvent::LoggedIn { .. } | SessionEvent::LoggedOut | SessionEvent::Invalidated => {
                self.invalidate()
            }
        }
    }
}
