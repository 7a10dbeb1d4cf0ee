//! Application configuration management.
//!
//! Configuration is stored at `~/.config/sessionward/config.json` and can be
//! overridden from the environment:
//! - `SESSIONWARD_API_URL`: base API origin
//! - `SESSIONWARD_GUARD_POLICY`: `global` or `per-route`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::REQUEST_TIMEOUT_SECS;
use crate::auth::service::DEFAULT_LOGOUT_PATH;
use crate::navigation::routes::{LANDING_ROUTE, LOGIN_ROUTE};
use crate::navigation::GuardPolicy;
use crate::storage::{FileStorage, KeyringStorage, Storage};

/// Application name used for config/data/cache directory paths
pub const APP_NAME: &str = "sessionward";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "SESSIONWARD_API_URL";
pub const ENV_GUARD_POLICY: &str = "SESSIONWARD_GUARD_POLICY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurableBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub logout_path: Option<String>,
    pub durable_backend: DurableBackend,
    pub login_route: String,
    pub landing_route: String,
    pub guard_policy: GuardPolicy,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            logout_path: Some(DEFAULT_LOGOUT_PATH.to_string()),
            durable_backend: DurableBackend::default(),
            login_route: LOGIN_ROUTE.to_string(),
            landing_route: LANDING_ROUTE.to_string(),
            guard_policy: GuardPolicy::default(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (defaults if missing) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(policy) = lookup(ENV_GUARD_POLICY) {
            self.guard_policy = policy
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .with_context(|| format!("Invalid {}", ENV_GUARD_POLICY))?;
        }
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the durable file tier lives
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// The configured durable storage tier
    pub fn durable_storage(&self) -> Result<Arc<dyn Storage>> {
        Ok(match self.durable_backend {
            DurableBackend::File => Arc::new(FileStorage::new(Self::data_dir()?)),
            DurableBackend::Keyring => Arc::new(
                KeyringStorage::open().context("Keyring backend selected but unusable")?,
            ),
        })
    }
}
