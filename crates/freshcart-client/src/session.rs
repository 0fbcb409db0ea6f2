//! # Session Store
//!
//! Holds the bearer token and the signed-in profile.
//!
//! ```text
//! sign in / register / reset ──► set() ──► token present ──► cart ops allowed
//! sign out                   ──► clear() ─► token absent  ──► AuthRequired
//! ```

use std::sync::{PoisonError, RwLock};

use tracing::info;

use freshcart_core::{AuthToken, UserProfile};

#[derive(Debug, Default, Clone)]
struct Session {
    token: Option<AuthToken>,
    user: Option<UserProfile>,
    email: Option<String>,
}

/// Thread-safe holder of the auth token.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the session from persisted values.
    pub fn restored(token: Option<AuthToken>, email: Option<String>) -> Self {
        SessionStore {
            inner: RwLock::new(Session {
                token,
                user: None,
                email,
            }),
        }
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.read(|s| s.token.clone())
    }

    pub fn has_token(&self) -> bool {
        self.read(|s| s.token.is_some())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read(|s| s.user.clone())
    }

    /// Email of the signed-in account, from the profile or the sign-in form.
    pub fn email(&self) -> Option<String> {
        self.read(|s| {
            s.user
                .as_ref()
                .map(|u| u.email.clone())
                .filter(|e| !e.is_empty())
                .or_else(|| s.email.clone())
        })
    }

    /// Stores a fresh token.
    pub fn set(&self, token: AuthToken, user: Option<UserProfile>, email: Option<String>) {
        info!(has_profile = user.is_some(), "Session token stored");
        self.write(|s| {
            s.token = Some(token);
            s.user = user;
            if email.is_some() {
                s.email = email;
            }
        });
    }

    pub fn clear(&self) {
        info!("Session cleared");
        self.write(|s| *s = Session::default());
    }

    fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let store = SessionStore::new();
        assert!(!store.has_token());

        store.set(
            AuthToken::new("abc").unwrap(),
            Some(UserProfile {
                name: "Mona".into(),
                email: "mona@example.com".into(),
                role: Some("user".into()),
            }),
            None,
        );
        assert_eq!(store.token().unwrap().as_str(), "abc");
        assert_eq!(store.email().as_deref(), Some("mona@example.com"));

        store.clear();
        assert!(store.token().is_none());
        assert!(store.email().is_none());
    }

    #[test]
    fn test_email_falls_back_to_form_value() {
        let store = SessionStore::restored(None, Some("old@example.com".into()));
        assert_eq!(store.email().as_deref(), Some("old@example.com"));

        store.set(AuthToken::new("t").unwrap(), None, Some("new@example.com".into()));
        assert_eq!(store.email().as_deref(), Some("new@example.com"));
    }
}
