//! # Collaborator Traits
//!
//! The seams between the client services and the storefront backend.
//! [`crate::http::HttpClient`] implements them over HTTP and
//! `FakeStorefront` (behind the `test-util` feature) in memory.
//!
//! ```text
//! ┌──────────────┐   CartApi      ┌──────────────┐
//! │  CartStore   │───────────────►│              │
//! └──────────────┘                │  HttpClient  │──► storefront REST API
//! ┌──────────────┐   AccountApi   │      or      │
//! │ AuthService  │───────────────►│FakeStorefront│
//! └──────────────┘                │              │
//! ┌──────────────┐  CheckoutApi   │              │
//! │  checkout()  │───────────────►│              │
//! └──────────────┘  CatalogApi    └──────────────┘
//! ```

use async_trait::async_trait;

use freshcart_core::{
    AuthToken, Brand, CartSnapshot, Category, LoginForm, PaymentMethod, Product, ProductDetail,
    RegistrationForm, ShippingAddress, UserProfile,
};

use crate::error::ClientResult;

/// Cart endpoints. Every call needs a token and returns the full cart.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn fetch_cart_snapshot(&self, token: &AuthToken) -> ClientResult<CartSnapshot>;

    async fn add_item(&self, product_id: &str, token: &AuthToken) -> ClientResult<CartSnapshot>;

    /// Sets the absolute quantity of a line. Callers never send 0.
    async fn set_item_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        count: u32,
    ) -> ClientResult<CartSnapshot>;

    async fn remove_item(&self, token: &AuthToken, product_id: &str)
        -> ClientResult<CartSnapshot>;
}

/// Public catalog endpoints.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_products(&self) -> ClientResult<Vec<Product>>;

    async fn list_categories(&self) -> ClientResult<Vec<Category>>;

    async fn list_brands(&self) -> ClientResult<Vec<Brand>>;

    async fn product_detail(&self, product_id: &str) -> ClientResult<ProductDetail>;
}

/// What sign in, sign up and password reset hand back.
#[derive(Debug, Clone, Default)]
pub struct AuthGrant {
    pub token: Option<AuthToken>,
    pub user: Option<UserProfile>,
    pub message: Option<String>,
}

/// Account endpoints.
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn sign_in(&self, form: &LoginForm) -> ClientResult<AuthGrant>;

    async fn sign_up(&self, form: &RegistrationForm) -> ClientResult<AuthGrant>;

    /// Mails a reset code; returns the server's confirmation message.
    async fn forgot_password(&self, email: &str) -> ClientResult<Option<String>>;

    async fn verify_reset_code(&self, code: &str) -> ClientResult<()>;

    async fn reset_password(&self, email: &str, new_password: &str) -> ClientResult<AuthGrant>;
}

/// Raw result of creating a checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub redirect_url: Option<String>,
    pub message: Option<String>,
}

/// Checkout endpoint.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    async fn create_checkout_session(
        &self,
        token: &AuthToken,
        cart_id: &str,
        address: &ShippingAddress,
        method: PaymentMethod,
    ) -> ClientResult<CheckoutReceipt>;
}

/// A backend serving every endpoint.
pub trait Storefront: CartApi + CatalogApi + AccountApi + CheckoutApi {}

impl<T> Storefront for T where T: CartApi + CatalogApi + AccountApi + CheckoutApi {}
