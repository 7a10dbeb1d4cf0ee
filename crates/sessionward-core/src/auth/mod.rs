//! Authentication state for the dashboard client.
//!
//! This module provides:
//! - `TokenStore`: the credential and user profile across both storage tiers
//! - `SessionState`: authentication status and the lazily loaded user
//! - `AuthService`: the login/logout actions exposed to the UI layer
//!
//! Reads always check the durable tier first, then the ephemeral tier.

pub mod profile;
pub mod service;
pub mod session;
pub mod token_store;

pub use profile::UserProfile;
pub use service::AuthService;
pub use session::SessionState;
pub use token_store::{TokenStore, CREDENTIAL_KEY, PROFILE_KEY};
