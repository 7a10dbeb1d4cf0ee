use keyring::Entry;
use tracing::{debug, warn};

use super::{Storage, StorageError};

/// Default keychain service name
pub const SERVICE_NAME: &str = "sessionward";

/// Key written and read back when opening the keychain
const PROBE_KEY: &str = "__sessionward_check";

/// Durable storage tier kept in the OS keychain, one entry per key.
///
/// Only macOS and Windows builds link a native keychain. Elsewhere the
/// keyring crate falls back to a store that forgets every write, so `open`
/// refuses it.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    /// Open the keychain under the default service name
    pub fn open() -> Result<Self, StorageError> {
        Self::open_service(SERVICE_NAME)
    }

    /// Open the keychain under `service`, checking that a written value
    /// can be read back.
    pub fn open_service(service: &str) -> Result<Self, StorageError> {
        if !Self::native_store_available() {
            return Err(StorageError::KeychainUnavailable(
                "no native keychain support in this build".to_string(),
            ));
        }
        let storage = Self::with_service(service);
        storage.check_round_trip()?;
        Ok(storage)
    }

    /// Unchecked handle; prefer `open`
    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    pub fn native_store_available() -> bool {
        cfg!(any(target_os = "macos", target_os = "windows"))
    }

    fn check_round_trip(&self) -> Result<(), StorageError> {
        self.set(PROBE_KEY, "ok")?;
        let read_back = self.get(PROBE_KEY);
        self.remove(PROBE_KEY)?;
        if read_back.as_deref() != Some("ok") {
            return Err(StorageError::KeychainUnavailable(
                "keychain did not keep a written value".to_string(),
            ));
        }
        debug!(service = %self.service, "Keychain available");
        Ok(())
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Storage for KeyringStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to create keyring entry");
                return None;
            }
        };
        match entry.get_password() {
            Ok(value) => Some(value),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read from keychain");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
