//! # freshcart-client: Storefront Client for FreshCart
//!
//! Everything that leaves the process: HTTP calls to the storefront
//! backend, the cart state container, the token store and the persisted
//! session file.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌───────────────────────┐ │
//! │  │    CartStore     │  │   AuthService    │  │     checkout()        │ │
//! │  │                  │  │                  │  │                       │ │
//! │  │ fetch / add /    │  │ sign in, sign up │  │ validate form, create │ │
//! │  │ update / remove  │  │ password reset   │  │ hosted session        │ │
//! │  └────────┬─────────┘  └────────┬─────────┘  └───────────┬───────────┘ │
//! │           │ CartApi             │ AccountApi             │ CheckoutApi │
//! │           ▼                     ▼                        ▼             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │         HttpClient (reqwest)   |   FakeStorefront (tests)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌───────────────────────┐ │
//! │  │  SessionStore    │  │  PersistedState  │  │    ClientConfig       │ │
//! │  │  bearer token    │  │  JSON blob       │  │  defaults/TOML/env    │ │
//! │  └──────────────────┘  └──────────────────┘  └───────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - Collaborator traits
//! - [`http`] - `reqwest` implementation of the traits
//! - [`wire`] - JSON DTOs and their conversion into core types
//! - [`store`] - Cart state container
//! - [`session`] - Auth token store
//! - [`auth`] - Account flows
//! - [`checkout`] - Checkout session creation
//! - [`persist`] - Session file
//! - [`config`] - Client configuration
//! - `fake` - In-memory backend (`test-util` feature)
//! - [`error`] - Client error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use freshcart_client::{CartStore, ClientConfig, HttpClient};
//!
//! let config = ClientConfig::load(None)?;
//! let api = Arc::new(HttpClient::new(&config)?);
//! let cart = CartStore::new(api);
//!
//! cart.fetch_cart(token.as_ref()).await?;
//! println!("{} items, {}", cart.count(), cart.total());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod http;
pub mod persist;
pub mod session;
pub mod store;
pub mod wire;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{
    AccountApi, AuthGrant, CartApi, CatalogApi, CheckoutApi, CheckoutReceipt, Storefront,
};
pub use auth::AuthService;
pub use checkout::checkout;
pub use config::{ApiSettings, CartSettings, ClientConfig, StorageSettings};
pub use error::{ClientError, ClientResult};
#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeStorefront;
pub use http::HttpClient;
pub use persist::PersistedState;
pub use session::SessionStore;
pub use store::CartStore;
