//! Key/value storage tiers backing the session.
//!
//! A session lives in one of two tiers:
//! - the durable tier (`FileStorage` or `KeyringStorage`) survives restarts
//!   and backs "remember me" logins
//! - the ephemeral tier (`MemoryStorage`) lasts for the process only
//!
//! Keys and values are plain strings. Structured values are JSON-serialized
//! by the caller.

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use file::FileStorage;
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode storage contents: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    #[error("Keychain unavailable: {0}")]
    KeychainUnavailable(String),
}

/// A single storage tier.
///
/// Every call completes atomically with respect to other callers. `get`
/// never fails: a backend that cannot be read reports the key as absent.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
