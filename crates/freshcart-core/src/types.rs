//! # Domain Types
//!
//! Core domain types used throughout FreshCart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog                        Cart                                    │
//! │  ┌─────────────────┐            ┌─────────────────┐                     │
//! │  │    Product      │            │  CartSnapshot   │  server's view      │
//! │  │  ProductDetail  │            │  ─────────────  │                     │
//! │  │  Category       │            │  cart_id        │                     │
//! │  │  Brand          │            │  item_count     │                     │
//! │  │  Subcategory    │            │  total_price    │                     │
//! │  └─────────────────┘            │  items ─────────┼──► CartItem         │
//! │                                 └─────────────────┘                     │
//! │  Account                        Checkout                                │
//! │  ┌─────────────────┐            ┌─────────────────┐                     │
//! │  │   AuthToken     │            │ ShippingAddress │                     │
//! │  │   UserProfile   │            │ PaymentMethod   │                     │
//! │  │   LoginForm     │            │ CheckoutForm    │                     │
//! │  │ RegistrationForm│            │ CheckoutOutcome │                     │
//! │  └─────────────────┘            └─────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Server entities are keyed by the backend's opaque string id (`_id` on the
//! wire). Cart lines staged locally carry a `temp-<uuid>` id until the next
//! snapshot replaces them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::TEMP_LINE_PREFIX;

// =============================================================================
// Catalog
// =============================================================================

/// A product as shown on listing screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image_cover: String,
    pub price: Money,
    pub ratings_average: f64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub brand_id: Option<String>,
}

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
}

/// Product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
}

/// Subcategory; `category` is the parent category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
}

/// Everything the product details screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,

    /// Units in stock.
    pub quantity: u32,

    /// Units sold so far.
    pub sold: u32,

    pub price: Money,
    pub image_cover: String,
    pub images: Vec<String>,
    pub ratings_average: f64,
    pub ratings_quantity: u32,
    pub category: Category,
    pub brand: Brand,
    pub subcategories: Vec<Subcategory>,
}

impl ProductDetail {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One product-quantity pairing in the cart.
///
/// ## Invariant
/// `quantity >= 1`. Lines that would reach zero are removed, never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server-assigned line id, or `temp-<uuid>` for a staged line.
    pub cart_item_id: String,

    pub product_id: Option<String>,
    pub title: Option<String>,
    pub image_url: Option<String>,

    /// Price per unit; the server omits it for some lines.
    pub unit_price: Option<Money>,

    pub quantity: u32,
}

impl CartItem {
    /// `unit_price × quantity`, zero when the price is unknown.
    pub fn line_total(&self) -> Money {
        self.unit_price.unwrap_or_default() * self.quantity
    }

    /// Whether this line was staged locally and is awaiting a snapshot.
    pub fn is_temporary(&self) -> bool {
        self.cart_item_id.starts_with(TEMP_LINE_PREFIX)
    }
}

/// The server's authoritative view of the cart.
///
/// Only the collaborator boundary builds these, through
/// [`CartSnapshot::from_lines`], so every snapshot the reducer sees already
/// satisfies the line invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub cart_id: Option<String>,
    pub item_count: u32,
    pub total_price: Money,
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Normalizes raw server lines into a snapshot.
    ///
    /// ## Rules
    /// ```text
    /// items        = lines with quantity >= 1 (zero-count lines dropped)
    /// item_count   = reported_count, else items.len()
    /// total_price  = reported_total, else Σ(unit_price × quantity)
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use freshcart_core::{CartItem, CartSnapshot, Money};
    ///
    /// let line = |id: &str, cents, qty| CartItem {
    ///     cart_item_id: id.to_string(),
    ///     product_id: None,
    ///     title: None,
    ///     image_url: None,
    ///     unit_price: Some(Money::from_cents(cents)),
    ///     quantity: qty,
    /// };
    /// let snapshot = CartSnapshot::from_lines(
    ///     None,
    ///     None,
    ///     None,
    ///     vec![line("a", 1000, 2), line("b", 550, 1)],
    /// );
    /// assert_eq!(snapshot.total_price.to_decimal_string(), "25.50");
    /// assert_eq!(snapshot.items.len(), 2);
    /// ```
    pub fn from_lines(
        cart_id: Option<String>,
        reported_count: Option<u32>,
        reported_total: Option<Money>,
        lines: Vec<CartItem>,
    ) -> Self {
        let items: Vec<CartItem> = lines.into_iter().filter(|l| l.quantity > 0).collect();
        let item_count = reported_count.unwrap_or(items.len() as u32);
        let total_price =
            reported_total.unwrap_or_else(|| items.iter().map(CartItem::line_total).sum());

        CartSnapshot {
            cart_id,
            item_count,
            total_price,
            items,
        }
    }

    /// A snapshot with no lines.
    pub fn empty(cart_id: Option<String>) -> Self {
        CartSnapshot {
            cart_id,
            ..Default::default()
        }
    }

    /// Finds the line holding `product_id`.
    pub fn line_for(&self, product_id: &str) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|l| l.product_id.as_deref() == Some(product_id))
    }
}

// =============================================================================
// Account
// =============================================================================

/// Opaque bearer token sent in the `token` header.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a token string; blank strings are not tokens.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(AuthToken(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(<redacted>)")
    }
}

/// The signed-in user as returned by sign in and sign up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

/// Sign-in form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
    pub phone: String,
}

// =============================================================================
// Checkout
// =============================================================================

/// How the order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Hosted checkout session; the user is redirected to pay.
    #[default]
    Online,
    /// Pay on delivery.
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery address sent with a checkout session. Fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub details: String,
    pub phone: String,
    pub city: String,
}

/// Checkout form input. `cart_id` falls back to the cart state's id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub cart_id: Option<String>,
    pub details: String,
    pub phone: String,
    pub city: String,
    pub payment_method: PaymentMethod,
}

/// What happened after a checkout session was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// Continue on the hosted payment page.
    Redirect { url: String },
    /// The order exists; nothing left to pay online.
    Placed { message: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
