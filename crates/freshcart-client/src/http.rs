//! # HTTP Client
//!
//! `reqwest` implementation of the collaborator traits against the
//! storefront REST API.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  build URL (base_url + percent-encoded path segments)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  attach `token` header (cart + checkout only)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send with timeout ──── transport failure ──► ConnectionFailed/Timeout  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  read body as text                                                      │
//! │       │                                                                 │
//! │       ├── 2xx ──► serde_json into a *Dto ──► core type                  │
//! │       ├── 401 ──► Unauthorized(message)                                 │
//! │       └── else ─► Api { status, message } | Status(code)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One request per operation. Nothing retries.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;

use freshcart_core::{
    AuthToken, Brand, CartSnapshot, Category, LoginForm, PaymentMethod, Product, ProductDetail,
    RegistrationForm, ShippingAddress,
};

use crate::api::{AccountApi, AuthGrant, CartApi, CatalogApi, CheckoutApi, CheckoutReceipt};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::wire::{
    AuthResponseDto, BrandDto, CartResponseDto, CategoryDto, CheckoutRequest, CheckoutResponseDto,
    DataEnvelope, ErrorBody, ForgotPasswordRequest, ProductDetailDto, ProductDto,
    ResetPasswordRequest, SignInRequest, SignUpRequest, StatusResponseDto, VerifyResetCodeRequest,
};

/// Header the backend reads the bearer token from.
const TOKEN_HEADER: &str = "token";

/// Storefront API client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
    checkout_return_url: String,
}

impl HttpClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let base_url = Url::parse(config.api.base_url.trim_end_matches('/'))?;

        Ok(HttpClient {
            client,
            base_url,
            timeout_secs: config.api.timeout_secs,
            checkout_return_url: config.api.checkout_return_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base URL, each percent-encoded as a
    /// single path segment.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request and decodes a successful body as `T`.
    async fn send<B, T>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
        token: Option<&AuthToken>,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        debug!(%method, %url, authed = token.is_some(), "Sending request");

        let mut request = self.client.request(method.clone(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.header(TOKEN_HEADER, token.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Self::status_error(status, &text, url.as_str()));
        }

        debug!(%method, %url, status = status.as_u16(), "Request succeeded");
        serde_json::from_str(&text).map_err(|e| {
            warn!(%url, error = %e, "Unexpected response shape");
            ClientError::DeserializationFailed(e.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &[&str],
        token: Option<&AuthToken>,
    ) -> ClientResult<T> {
        self.send::<(), T>(Method::GET, path, &[], None, token).await
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            warn!(timeout_secs = self.timeout_secs, "Request timed out");
            ClientError::Timeout(self.timeout_secs)
        } else {
            warn!(error = %err, "Request failed before a response");
            ClientError::from(err)
        }
    }

    fn status_error(status: StatusCode, body: &str, url: &str) -> ClientError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message);

        if status.is_server_error() {
            error!(status = status.as_u16(), %url, ?message, "Server error");
        } else {
            warn!(status = status.as_u16(), %url, ?message, "Request rejected");
        }

        match (status, message) {
            (StatusCode::UNAUTHORIZED, message) => {
                ClientError::Unauthorized(message.unwrap_or_else(|| "Unauthorized".to_string()))
            }
            (status, Some(message)) => ClientError::Api {
                status: status.as_u16(),
                message,
            },
            (status, None) => ClientError::Status(status.as_u16()),
        }
    }

    fn into_grant(dto: AuthResponseDto) -> AuthGrant {
        AuthGrant {
            token: dto.token.and_then(AuthToken::new),
            user: dto.user.map(Into::into),
            message: dto.message,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

#[async_trait]
impl CartApi for HttpClient {
    async fn fetch_cart_snapshot(&self, token: &AuthToken) -> ClientResult<CartSnapshot> {
        let dto: CartResponseDto = self.get(&["cart"], Some(token)).await?;
        Ok(dto.into())
    }

    async fn add_item(&self, product_id: &str, token: &AuthToken) -> ClientResult<CartSnapshot> {
        let body = serde_json::json!({ "productId": product_id });
        let dto: CartResponseDto = self
            .send(Method::POST, &["cart"], &[], Some(&body), Some(token))
            .await?;
        Ok(dto.into())
    }

    async fn set_item_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        count: u32,
    ) -> ClientResult<CartSnapshot> {
        let body = serde_json::json!({ "count": count });
        let dto: CartResponseDto = self
            .send(Method::PUT, &["cart", product_id], &[], Some(&body), Some(token))
            .await?;
        Ok(dto.into())
    }

    async fn remove_item(
        &self,
        token: &AuthToken,
        product_id: &str,
    ) -> ClientResult<CartSnapshot> {
        let dto: CartResponseDto = self
            .send::<(), _>(Method::DELETE, &["cart", product_id], &[], None, Some(token))
            .await?;
        Ok(dto.into())
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[async_trait]
impl CatalogApi for HttpClient {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let envelope: DataEnvelope<Vec<ProductDto>> = self.get(&["products"], None).await?;
        Ok(envelope.data.into_iter().map(Into::into).collect())
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let envelope: DataEnvelope<Vec<CategoryDto>> = self.get(&["categories"], None).await?;
        Ok(envelope.data.into_iter().map(Into::into).collect())
    }

    async fn list_brands(&self) -> ClientResult<Vec<Brand>> {
        let envelope: DataEnvelope<Vec<BrandDto>> = self.get(&["brands"], None).await?;
        Ok(envelope.data.into_iter().map(Into::into).collect())
    }

    async fn product_detail(&self, product_id: &str) -> ClientResult<ProductDetail> {
        let envelope: DataEnvelope<ProductDetailDto> =
            self.get(&["products", product_id], None).await?;
        Ok(envelope.data.into())
    }
}

// =============================================================================
// Account
// =============================================================================

#[async_trait]
impl AccountApi for HttpClient {
    async fn sign_in(&self, form: &LoginForm) -> ClientResult<AuthGrant> {
        let body = SignInRequest {
            email: form.email.trim(),
            password: &form.password,
        };
        let dto: AuthResponseDto = self
            .send(Method::POST, &["auth", "signin"], &[], Some(&body), None)
            .await?;
        Ok(Self::into_grant(dto))
    }

    async fn sign_up(&self, form: &RegistrationForm) -> ClientResult<AuthGrant> {
        let body = SignUpRequest {
            name: form.name.trim(),
            email: form.email.trim(),
            password: &form.password,
            re_password: &form.re_password,
            phone: form.phone.trim(),
        };
        let dto: AuthResponseDto = self
            .send(Method::POST, &["auth", "signup"], &[], Some(&body), None)
            .await?;
        Ok(Self::into_grant(dto))
    }

    async fn forgot_password(&self, email: &str) -> ClientResult<Option<String>> {
        let body = ForgotPasswordRequest { email };
        let dto: StatusResponseDto = self
            .send(Method::POST, &["auth", "forgotPasswords"], &[], Some(&body), None)
            .await?;
        Ok(dto.message.or(dto.status_msg))
    }

    async fn verify_reset_code(&self, code: &str) -> ClientResult<()> {
        let body = VerifyResetCodeRequest { reset_code: code };
        let _: StatusResponseDto = self
            .send(Method::POST, &["auth", "verifyResetCode"], &[], Some(&body), None)
            .await?;
        Ok(())
    }

    async fn reset_password(&self, email: &str, new_password: &str) -> ClientResult<AuthGrant> {
        let body = ResetPasswordRequest {
            email,
            new_password,
        };
        let dto: AuthResponseDto = self
            .send(Method::PUT, &["auth", "resetPassword"], &[], Some(&body), None)
            .await?;
        Ok(Self::into_grant(dto))
    }
}

// =============================================================================
// Checkout
// =============================================================================

#[async_trait]
impl CheckoutApi for HttpClient {
    async fn create_checkout_session(
        &self,
        token: &AuthToken,
        cart_id: &str,
        address: &ShippingAddress,
        method: PaymentMethod,
    ) -> ClientResult<CheckoutReceipt> {
        let path = ["orders", "checkout-session", cart_id];
        let body = CheckoutRequest {
            shipping_address: address,
            payment_method: method,
        };
        let query = [("url", self.checkout_return_url.as_str())];
        let dto: CheckoutResponseDto = self
            .send(Method::POST, &path, &query, Some(&body), Some(token))
            .await?;

        Ok(CheckoutReceipt {
            redirect_url: dto.redirect_url().map(str::to_string),
            message: dto.message,
        })
    }
}
