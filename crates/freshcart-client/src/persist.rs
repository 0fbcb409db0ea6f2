//! # Persisted State
//!
//! The small JSON blob that survives restarts: the auth token, the cart id
//! and badge count, and the account email.
//!
//! ```json
//! {
//!   "token": "eyJhbGciOi...",
//!   "cart": { "cart_id": "6650...", "item_count": 2 },
//!   "account": { "email": "mona@example.com" },
//!   "saved_at": "2024-05-01T10:00:00Z"
//! }
//! ```
//!
//! A missing file means signed out with an empty cart. A file that cannot
//! be read or parsed is logged and treated the same way.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use freshcart_core::{AuthToken, CartState};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCart {
    #[serde(default)]
    pub cart_id: Option<String>,
    #[serde(default)]
    pub item_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAccount {
    #[serde(default)]
    pub email: Option<String>,
}

/// Everything written at shutdown and read at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub token: Option<AuthToken>,
    #[serde(default)]
    pub cart: PersistedCart,
    #[serde(default)]
    pub account: PersistedAccount,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl Default for PersistedState {
    fn default() -> Self {
        PersistedState {
            token: None,
            cart: PersistedCart::default(),
            account: PersistedAccount::default(),
            saved_at: Utc::now(),
        }
    }
}

impl PersistedState {
    /// Captures the persisted slices of the live state.
    pub fn capture(token: Option<AuthToken>, cart: &CartState, email: Option<String>) -> Self {
        PersistedState {
            token,
            cart: PersistedCart {
                cart_id: cart.cart_id.clone(),
                item_count: cart.item_count,
            },
            account: PersistedAccount { email },
            saved_at: Utc::now(),
        }
    }

    /// The cart state to start from.
    pub fn cart_state(&self) -> CartState {
        CartState::restored(self.cart.cart_id.clone(), self.cart.item_count)
    }

    /// Reads the blob at `path`, falling back to the default.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(state)) => {
                info!(?path, signed_in = state.token.is_some(), "Session restored");
                state
            }
            Ok(None) => {
                debug!(?path, "No saved session");
                Self::default()
            }
            Err(e) => {
                warn!(?path, error = %e, "Ignoring unreadable session file");
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> ClientResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Writes the blob to `path` through a temp file and a rename.
    pub fn save(&self, path: &Path) -> ClientResult<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let contents = serde_json::to_vec_pretty(self)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| ClientError::StateIo(e.to_string()))?;

        debug!(?path, signed_in = self.token.is_some(), "Session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let state = PersistedState::load(&dir.path().join("session.json"));
        assert!(state.token.is_none());
        assert_eq!(state.cart, PersistedCart::default());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let state = PersistedState::load(&path);
        assert!(state.token.is_none());
        assert_eq!(state.cart.item_count, 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let cart = CartState::restored(Some("cart-9".into()), 4);
        let state = PersistedState::capture(
            AuthToken::new("tok"),
            &cart,
            Some("mona@example.com".into()),
        );
        state.save(&path).unwrap();

        let loaded = PersistedState::load(&path);
        assert_eq!(loaded.token.as_ref().map(AuthToken::as_str), Some("tok"));
        assert_eq!(loaded.cart.cart_id.as_deref(), Some("cart-9"));
        assert_eq!(loaded.cart_state().item_count, 4);
        assert_eq!(loaded.account.email.as_deref(), Some("mona@example.com"));
        assert_eq!(loaded.saved_at, state.saved_at);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{ "token": "abc" }"#).unwrap();

        let state = PersistedState::load(&path);
        assert_eq!(state.token.unwrap().as_str(), "abc");
        assert_eq!(state.cart.item_count, 0);
        assert!(state.account.email.is_none());
    }
}
