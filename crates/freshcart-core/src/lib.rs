//! # freshcart-core: Pure Storefront Logic for FreshCart
//!
//! This crate is the **heart** of the FreshCart client. It holds the cart
//! reducer, money math, form rules and the screen graph as pure code with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FreshCart Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/terminal (CLI)                          │   │
//! │  │    products ──► product ──► cart add ──► checkout               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    freshcart-client                             │   │
//! │  │    HttpClient, CartStore, SessionStore, PersistedState          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ freshcart-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ CartState │  │   forms   │  │   │
//! │  │   │  CartItem │  │  cents    │  │ selectors │  │  checkout │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │navigation │  │  catalog  │                                 │   │
//! │  │   │  Screen   │  │  search   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartItem, CartSnapshot, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart reducer, add tickets and selectors
//! - [`error`] - Domain error types
//! - [`validation`] - Form validation
//! - [`navigation`] - Screen graph and navigator
//! - [`catalog`] - Product and brand search
//!
//! ## Example Usage
//!
//! ```rust
//! use freshcart_core::money::Money;
//!
//! // Server prices are converted once, then stay in cents
//! let price = Money::from_decimal(10.0);
//! let line = price * 2 + Money::from_decimal(5.5);
//!
//! assert_eq!(line.to_decimal_string(), "25.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod navigation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use freshcart_core::Money` instead of
// `use freshcart_core::money::Money`

pub use cart::{CartEvent, CartState, TicketId, TicketStatus};
pub use error::{CartError, CartOp, CoreError, CoreResult, FormErrors, ValidationError};
pub use money::Money;
pub use navigation::{Navigator, Screen};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Base URL of the storefront REST backend.
pub const DEFAULT_API_BASE_URL: &str = "https://ecommerce.routemisr.com/api/v1";

/// Where the hosted checkout page sends the user when payment completes.
pub const DEFAULT_CHECKOUT_RETURN_URL: &str = "http://localhost:3000";

/// Request timeout used unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Prefix of cart line ids staged locally before the server confirms them.
pub const TEMP_LINE_PREFIX: &str = "temp-";
