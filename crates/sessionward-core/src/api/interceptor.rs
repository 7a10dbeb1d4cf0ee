use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::TokenStore;
use crate::events::{SessionEvent, SessionEvents};

/// Runs on every outgoing request before it is sent.
///
/// Receives the result of building the request (or of the previous
/// interceptor) so that failures flow through the chain unchanged.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: Result<Request, ApiError>) -> Result<Request, ApiError>;
}

/// Runs on every response after the round trip, including failures.
pub trait ResponseInterceptor: Send + Sync {
    fn intercept(&self, outcome: Result<Response, ApiError>) -> Result<Response, ApiError>;
}

/// Adds `Authorization: Bearer <credential>` when a credential is stored.
pub struct BearerAuth {
    store: TokenStore,
}

impl BearerAuth {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, request: Result<Request, ApiError>) -> Result<Request, ApiError> {
        let mut request = request?;
        if let Some(token) = self.store.get_credential() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidCredential)?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        Ok(request)
    }
}

/// Ends the session when the server rejects the credential.
///
/// On a 401 the stored session is cleared from both tiers and
/// `SessionEvent::Invalidated` is published. The failed request is not
/// retried and the original error still reaches the caller.
pub struct SessionExpiry {
    store: TokenStore,
    events: SessionEvents,
}

impl SessionExpiry {
    pub fn new(store: TokenStore, events: SessionEvents) -> Self {
        Self { store, events }
    }
}

impl ResponseInterceptor for SessionExpiry {
    fn intercept(&self, outcome: Result<Response, ApiError>) -> Result<Response, ApiError> {
        if let Err(ref error) = outcome {
            if error.is_unauthorized() {
                warn!("Credential rejected by server, ending session");
                if let Err(e) = self.store.clear_session() {
                    warn!(error = %e, "Failed to clear session after 401");
                }
                self.events.publish(SessionEvent::Invalidated);
            } else {
                debug!(error = %error, "Passing through request failure");
            }
        }
        outcome
    }
}
