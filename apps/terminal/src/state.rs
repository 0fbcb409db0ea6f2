//! # App State
//!
//! Everything one command run needs, built by [`AppState::load`] at startup
//! and written back by [`AppState::save`] before exit.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  session.json ──► PersistedState ──┬──► SessionStore (token, email)    │
//! │                                    └──► CartStore   (cart id, badge)    │
//! │                                                                         │
//! │  ClientConfig ──► HttpClient ─────────► CartStore / AuthService         │
//! │                                                                         │
//! │  Navigator: Splash ──► Home (token) | Register (no token)              │
//! │                                                                         │
//! │  Only token, cart id, badge count and email reach the file.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use freshcart_client::{
    AuthService, CartStore, ClientConfig, HttpClient, PersistedState, SessionStore, Storefront,
};
use freshcart_core::{AuthToken, Navigator};

use crate::error::AppResult;

pub struct AppState<S: Storefront> {
    pub config: ClientConfig,
    pub backend: Arc<S>,
    pub session: Arc<SessionStore>,
    pub cart: CartStore<S>,
    pub auth: AuthService<S>,
    pub navigator: Navigator,
    state_path: Option<PathBuf>,
}

impl AppState<HttpClient> {
    /// Loads config and the saved session and connects to the backend.
    ///
    /// `state_path` overrides the configured session file.
    pub fn load(config_path: Option<PathBuf>, state_path: Option<PathBuf>) -> AppResult<Self> {
        let config = ClientConfig::load(config_path)?;
        let backend = Arc::new(HttpClient::new(&config)?);
        info!(base_url = backend.base_url(), "Storefront client ready");

        let state_path = state_path.or_else(|| config.state_path());
        let persisted = match &state_path {
            Some(path) => PersistedState::load(path),
            None => PersistedState::default(),
        };
        Ok(AppState::with_backend(config, backend, persisted, state_path))
    }
}

impl<S: Storefront> AppState<S> {
    /// Assembles the state around any backend.
    pub fn with_backend(
        config: ClientConfig,
        backend: Arc<S>,
        persisted: PersistedState,
        state_path: Option<PathBuf>,
    ) -> Self {
        let session = Arc::new(SessionStore::restored(
            persisted.token.clone(),
            persisted.account.email.clone(),
        ));
        let cart = CartStore::with_state(
            backend.clone(),
            persisted.cart_state(),
            config.cart.serialize_mutations,
        );
        let auth = AuthService::new(backend.clone(), session.clone());

        let mut navigator = Navigator::new();
        let landing = navigator.finish_splash(session.has_token());
        debug!(screen = %landing, "Splash finished");

        AppState {
            config,
            backend,
            session,
            cart,
            auth,
            navigator,
            state_path,
        }
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.session.token()
    }

    /// Sign-out: token, cart and navigation history all go.
    pub fn sign_out(&mut self) {
        self.auth.sign_out();
        self.cart.clear();
        self.navigator.sign_out();
        info!("Signed out");
    }

    /// Writes the session file, if there is one.
    pub fn save(&self) -> AppResult<()> {
        let Some(path) = &self.state_path else {
            debug!("No session file configured; nothing saved");
            return Ok(());
        };
        let persisted =
            PersistedState::capture(self.session.token(), &self.cart.state(), self.session.email());
        persisted.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshcart_client::FakeStorefront;
    use freshcart_core::{CartState, Screen};

    #[test]
    fn test_splash_without_token_goes_to_register() {
        let app = AppState::with_backend(
            ClientConfig::default(),
            Arc::new(FakeStorefront::new()),
            PersistedState::default(),
            None,
        );
        assert_eq!(app.navigator.current(), &Screen::Register);
        assert!(app.token().is_none());
    }

    #[test]
    fn test_restored_session() {
        let persisted = PersistedState::capture(
            AuthToken::new("tok"),
            &CartState::restored(Some("cart-1".into()), 2),
            Some("mona@example.com".into()),
        );
        let app = AppState::with_backend(
            ClientConfig::default(),
            Arc::new(FakeStorefront::new()),
            persisted,
            None,
        );

        assert_eq!(app.navigator.current(), &Screen::Home);
        assert_eq!(app.cart.badge(), Some(2));
        assert_eq!(app.cart.cart_id().as_deref(), Some("cart-1"));
        assert_eq!(app.session.email().as_deref(), Some("mona@example.com"));
    }

    #[test]
    fn test_save_and_sign_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let persisted = PersistedState::capture(
            AuthToken::new("tok"),
            &CartState::restored(Some("cart-1".into()), 2),
            None,
        );
        let mut app = AppState::with_backend(
            ClientConfig::default(),
            Arc::new(FakeStorefront::new()),
            persisted,
            Some(path.clone()),
        );

        app.save().unwrap();
        assert_eq!(PersistedState::load(&path).cart.item_count, 2);

        app.sign_out();
        assert_eq!(app.navigator.current(), &Screen::Login);
        app.save().unwrap();

        let saved = PersistedState::load(&path);
        assert!(saved.token.is_none());
        assert_eq!(saved.cart.item_count, 0);
    }
}
