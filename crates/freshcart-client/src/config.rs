//! # Client Configuration
//!
//! Configuration management for the storefront client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FRESHCART_API_URL=https://staging.example.com/api/v1               │
//! │     FRESHCART_TIMEOUT_SECS=20                                          │
//! │     FRESHCART_RETURN_URL=https://shop.example.com/orders               │
//! │     FRESHCART_STATE_PATH=/tmp/freshcart.json                           │
//! │     FRESHCART_SERIALIZE_CART=true                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/freshcart/freshcart.toml (Linux)                         │
//! │     ~/Library/Application Support/com.freshcart.freshcart/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Public storefront API, 10 second timeout                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # freshcart.toml
//! [api]
//! base_url = "https://ecommerce.routemisr.com/api/v1"
//! timeout_secs = 10
//! checkout_return_url = "http://localhost:3000"
//!
//! [cart]
//! serialize_mutations = false
//!
//! [storage]
//! state_path = "/home/me/.local/share/freshcart/session.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use freshcart_core::{
    DEFAULT_API_BASE_URL, DEFAULT_CHECKOUT_RETURN_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
};

use crate::error::{ClientError, ClientResult};

const CONFIG_FILE_NAME: &str = "freshcart.toml";
const STATE_FILE_NAME: &str = "session.json";

// =============================================================================
// API Settings
// =============================================================================

/// Where and how to reach the storefront backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL all endpoint paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sent as `?url=` when creating a checkout session; the hosted
    /// payment page returns here.
    #[serde(default = "default_return_url")]
    pub checkout_return_url: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_return_url() -> String {
    DEFAULT_CHECKOUT_RETURN_URL.to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            checkout_return_url: default_return_url(),
        }
    }
}

// =============================================================================
// Cart Settings
// =============================================================================

/// Cart mutation ordering.
///
/// ## Ordering Modes
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  serialize_mutations = false (Default)                                  │
/// │  ─────────────────────────────────────                                  │
/// │  add(A) ────────────────► snapshot 1                                    │
/// │     add(B) ────────► snapshot 2                                         │
/// │  Both in flight; whichever snapshot lands last wins.                    │
/// │                                                                         │
/// │  serialize_mutations = true                                             │
/// │  ──────────────────────────                                             │
/// │  add(A) ──► snapshot 1                                                  │
/// │                        add(B) ──► snapshot 2                            │
/// │  One mutation at a time; the latest request always lands last.         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    #[serde(default)]
    pub serialize_mutations: bool,
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the session blob lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Explicit state file; the platform data directory is used when unset.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (freshcart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let base = url::Url::parse(&self.api.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        url::Url::parse(&self.api.checkout_return_url)?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FRESHCART_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("FRESHCART_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric FRESHCART_TIMEOUT_SECS"),
            }
        }

        if let Some(url) = lookup("FRESHCART_RETURN_URL") {
            self.api.checkout_return_url = url;
        }

        if let Some(path) = lookup("FRESHCART_STATE_PATH") {
            debug!(path = %path, "Overriding state path from environment");
            self.storage.state_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("FRESHCART_SERIALIZE_CART") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.cart.serialize_mutations = true,
                "0" | "false" | "no" | "off" => self.cart.serialize_mutations = false,
                _ => warn!(value = %flag, "Unknown FRESHCART_SERIALIZE_CART value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "freshcart", "freshcart")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// The state file in use: configured, else the platform data directory.
    pub fn state_path(&self) -> Option<PathBuf> {
        self.storage.state_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "freshcart", "freshcart")
                .map(|dirs| dirs.data_dir().join(STATE_FILE_NAME))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "https://ecommerce.routemisr.com/api/v1");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.checkout_return_url, "http://localhost:3000");
        assert!(!config.cart.serialize_mutations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "http://localhost:8080/api/v1".to_string();
        config.api.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("FRESHCART_API_URL", "http://localhost:9000/api/v1"),
            ("FRESHCART_TIMEOUT_SECS", "25"),
            ("FRESHCART_STATE_PATH", "/tmp/fc.json"),
            ("FRESHCART_SERIALIZE_CART", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://localhost:9000/api/v1");
        assert_eq!(config.api.timeout_secs, 25);
        assert_eq!(config.state_path(), Some(PathBuf::from("/tmp/fc.json")));
        assert!(config.cart.serialize_mutations);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|k| match k {
            "FRESHCART_TIMEOUT_SECS" => Some("soon".to_string()),
            "FRESHCART_SERIALIZE_CART" => Some("maybe".to_string()),
            _ => None,
        });
        assert_eq!(config.api.timeout_secs, 10);
        assert!(!config.cart.serialize_mutations);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freshcart.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://shop.example.com/api/v1\"\ntimeout_secs = 30\n",
        )
        .unwrap();

        let config = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.base_url.starts_with("https://shop.example.com"));
    }

    #[test]
    fn test_load_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freshcart.toml");
        std::fs::write(&path, "[api\n").unwrap();

        let err = ClientConfig::load(Some(path)).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: ClientConfig = toml::from_str("[cart]\nserialize_mutations = true\n").unwrap();
        assert!(loaded.cart.serialize_mutations);
        assert_eq!(loaded.api, ApiSettings::default());
    }
}
