use std::sync::Arc;

use tracing::{debug, warn};

use super::UserProfile;
use crate::storage::{Storage, StorageError};

/// Storage key holding the bearer token
pub const CREDENTIAL_KEY: &str = "access_token";

/// Storage key holding the JSON-encoded user profile
pub const PROFILE_KEY: &str = "user";

/// The credential and profile of the current session, spread over a
/// durable and an ephemeral tier.
///
/// Lookups check the durable tier first. Clone is cheap and clones share
/// the same tiers.
#[derive(Clone)]
pub struct TokenStore {
    durable: Arc<dyn Storage>,
    ephemeral: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(durable: Arc<dyn Storage>, ephemeral: Arc<dyn Storage>) -> Self {
        Self { durable, ephemeral }
    }

    fn tiers(&self) -> [(&'static str, &dyn Storage); 2] {
        [
            ("durable", self.durable.as_ref()),
            ("ephemeral", self.ephemeral.as_ref()),
        ]
    }

    /// The bearer token, if either tier holds one. Empty values count as absent.
    pub fn get_credential(&self) -> Option<String> {
        self.tiers()
            .into_iter()
            .find_map(|(_, tier)| tier.get(CREDENTIAL_KEY).filter(|t| !t.is_empty()))
    }

    /// The stored user profile.
    ///
    /// A profile that fails to parse is removed from its tier and skipped;
    /// corrupt local data never surfaces as an error.
    pub fn get_profile(&self) -> Option<UserProfile> {
        for (name, tier) in self.tiers() {
            let Some(raw) = tier.get(PROFILE_KEY) else {
                continue;
            };
            match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => return Some(profile),
                Err(e) => {
                    warn!(tier = name, error = %e, "Discarding malformed stored profile");
                    if let Err(e) = tier.remove(PROFILE_KEY) {
                        warn!(tier = name, error = %e, "Failed to remove malformed profile");
                    }
                }
            }
        }
        None
    }

    /// Replace the session with the result of a successful login.
    ///
    /// Both tiers are cleared first so a previous session in the other tier
    /// cannot shadow the new one.
    pub fn set_session(
        &self,
        credential: &str,
        profile: &UserProfile,
        persistent: bool,
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(profile)?;
        self.clear_session()?;

        let tier = if persistent {
            &self.durable
        } else {
            &self.ephemeral
        };
        tier.set(CREDENTIAL_KEY, credential)?;
        tier.set(PROFILE_KEY, &encoded)?;
        debug!(persistent, "Stored session");
        Ok(())
    }

    /// Remove credential and profile from both tiers.
    ///
    /// Every removal is attempted even if an earlier one fails; the first
    /// failure is returned. Clearing an empty store is a no-op.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for (name, tier) in self.tiers() {
            for key in [CREDENTIAL_KEY, PROFILE_KEY] {
                if let Err(e) = tier.remove(key) {
                    warn!(tier = name, key = key, error = %e, "Failed to clear session key");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                debug!("Cleared session from both tiers");
                Ok(())
            }
        }
    }
}
