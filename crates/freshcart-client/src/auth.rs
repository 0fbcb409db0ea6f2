//! # Account Flows
//!
//! Sign in, registration, the three-step password reset and sign out.
//! Forms are validated before any request; tokens land in the
//! [`SessionStore`].
//!
//! ## Password Reset
//! ```text
//! request_reset_code(email) ──► verify_reset_code(code) ──► reset_password(email, new, confirm)
//!                                                                │
//!                                                                ▼
//!                                                      token stored (signed in)
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use freshcart_core::validation::{
    validate_email, validate_login, validate_new_password, validate_registration,
    validate_reset_code,
};
use freshcart_core::{LoginForm, RegistrationForm};

use crate::api::{AccountApi, AuthGrant};
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;

const RESET_CODE_SENT: &str = "Reset code sent to your email";

pub struct AuthService<A: AccountApi> {
    api: Arc<A>,
    session: Arc<SessionStore>,
}

impl<A: AccountApi> AuthService<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>) -> Self {
        AuthService { api, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Signs in and stores the token.
    ///
    /// ## Errors
    /// - `Form` when the email or password is rejected locally
    /// - `Unauthorized` with the server's message on bad credentials
    /// - `MissingToken` when the server accepted but sent no token
    pub async fn sign_in(&self, form: &LoginForm) -> ClientResult<AuthGrant> {
        validate_login(form)?;

        let grant = self.api.sign_in(form).await?;
        let token = grant.token.clone().ok_or_else(|| {
            warn!("Sign in succeeded without a token");
            ClientError::MissingToken
        })?;

        self.session
            .set(token, grant.user.clone(), Some(form.email.trim().to_string()));
        info!("Signed in");
        Ok(grant)
    }

    /// Creates an account. The token is stored when the server returns one.
    pub async fn register(&self, form: &RegistrationForm) -> ClientResult<AuthGrant> {
        validate_registration(form)?;

        let grant = self.api.sign_up(form).await?;
        match grant.token.clone() {
            Some(token) => {
                self.session
                    .set(token, grant.user.clone(), Some(form.email.trim().to_string()));
                info!("Registered and signed in");
            }
            None => info!("Registered; sign in to continue"),
        }
        Ok(grant)
    }

    /// Step one of the reset flow. Returns the confirmation to show.
    pub async fn request_reset_code(&self, email: &str) -> ClientResult<String> {
        validate_email(email)?;
        let message = self.api.forgot_password(email.trim()).await?;
        info!("Password reset code requested");
        Ok(message.unwrap_or_else(|| RESET_CODE_SENT.to_string()))
    }

    /// Step two.
    pub async fn verify_reset_code(&self, code: &str) -> ClientResult<()> {
        validate_reset_code(code)?;
        self.api.verify_reset_code(code.trim()).await
    }

    /// Step three. Signs the user in with the returned token.
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        confirmation: &str,
    ) -> ClientResult<AuthGrant> {
        validate_email(email)?;
        validate_new_password(new_password, confirmation)?;

        let grant = self.api.reset_password(email.trim(), new_password).await?;
        if let Some(token) = grant.token.clone() {
            self.session
                .set(token, grant.user.clone(), Some(email.trim().to_string()));
            info!("Password reset; signed in");
        }
        Ok(grant)
    }

    /// Drops the token. The caller clears the cart and resets navigation.
    pub fn sign_out(&self) {
        self.session.clear();
    }
}
