//! Configuration loading.
//!
//! Client settings are loaded from TOML with the following resolution order:
//! 1. explicit path (error if missing)
//! 2. `~/.rapidapi/config.toml`
//! 3. built-in defaults
//!
//! `RAPIDAPI_HOST` overrides the configured host.
//!
//! The API key never lives in the config file. It is resolved from:
//! 1. `RAPIDAPI_KEY`
//! 2. `~/.rapidapi/secrets.toml` (must be 0600 or 0400)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::client::RapidApiClientBuilder;
use crate::{RapidApiError, Result};

/// Environment variable overriding the host.
pub const HOST_ENV: &str = "RAPIDAPI_HOST";
/// Environment variable holding the API key.
pub const KEY_ENV: &str = "RAPIDAPI_KEY";

/// Client configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Gateway host, e.g. `weatherapi-com.p.rapidapi.com`.
    #[serde(default)]
    pub host: Option<String>,
    /// Base URL override (default: `https://{host}`).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Transport timeout in seconds (default: 30).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub cache: CacheSection,
}

/// `[cache]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Maximum number of cached responses (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// TTL for requests that do not set one; unset means unbounded.
    #[serde(default)]
    pub default_ttl_ms: Option<u64>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            default_ttl_ms: None,
        }
    }
}

fn default_max_entries() -> u64 {
    10_000
}

impl CacheSection {
    pub fn to_cache_config(&self) -> CacheConfig {
        let config = CacheConfig::new().max_entries(self.max_entries);
        match self.default_ttl_ms {
            Some(ms) => config.default_ttl(Duration::from_millis(ms)),
            None => config,
        }
    }
}

/// Secrets file (API key).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ClientConfig {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RapidApiError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            RapidApiError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(RapidApiError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(dirs::home_dir()
            .map(|home| home.join(".rapidapi").join("config.toml"))
            .filter(|path| path.exists()))
    }

    /// Apply environment overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides from `lookup`.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.is_empty()) {
            self.host = Some(host);
        }
        self
    }

    /// A builder pre-configured from this config, authenticated with `api_key`.
    pub fn into_builder(self, api_key: impl Into<String>) -> RapidApiClientBuilder {
        let mut builder = RapidApiClientBuilder::new()
            .api_key(api_key)
            .cache_config(self.cache.to_cache_config());
        if let Some(host) = self.host {
            builder = builder.host(host);
        }
        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }
}

impl Secrets {
    /// Load `~/.rapidapi/secrets.toml` if it exists, with a permission check.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".rapidapi").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }
        Ok(Secrets::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            RapidApiError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            RapidApiError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            RapidApiError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(RapidApiError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key from the environment, falling back to the secrets file.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    pub fn api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(KEY_ENV)
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
    }
}
