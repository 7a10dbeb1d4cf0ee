//! Session event bus.
//!
//! The transport layer must be able to end a session without depending on
//! the navigation layer. Interested components subscribe here instead: the
//! `SessionState` drops its cached profile and the `Router` moves to the
//! login route when a session is invalidated.

use std::sync::{Arc, RwLock};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new session was stored by the login flow
    LoggedIn { persistent: bool },
    /// The user logged out explicitly
    LoggedOut,
    /// The server rejected the credential (401)
    Invalidated,
}

pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: SessionEvent);
}

impl<F> SessionListener for F
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn on_session_event(&self, event: SessionEvent) {
        self(event)
    }
}

/// Listener registry. Clones share the same registry.
#[derive(Clone, Default)]
pub struct SessionEvents {
    listeners: Arc<RwLock<Vec<Arc<dyn SessionListener>>>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn SessionListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    /// Deliver an event to every listener in subscription order.
    ///
    /// Listeners run on the caller's task after the registry lock is
    /// released, so a listener may publish or subscribe itself.
    pub fn publish(&self, event: SessionEvent) {
        let listeners: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        debug!(?event, listeners = listeners.len(), "Publishing session event");
        for listener in listeners {
            listener.on_session_event(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
