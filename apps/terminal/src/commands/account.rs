//! # Account Commands
//!
//! ```text
//! Register ──► (token?) ──► Home          Login ──► Home
//!     │                                     │
//!     └──────────► Login ◄── logout         └──► Forgot Password
//!                                                  request ─► verify ─► reset ─► Home
//! ```

use tracing::{info, warn};

use freshcart_client::Storefront;
use freshcart_core::{LoginForm, RegistrationForm, Screen};

use crate::cli::RegisterArgs;
use crate::error::AppResult;
use crate::render::View;
use crate::state::AppState;

pub fn status<S: Storefront>(app: &AppState<S>) -> View {
    View::Session {
        signed_in: app.session.has_token(),
        email: app.session.email(),
        badge: app.cart.badge(),
    }
}

pub async fn login<S: Storefront>(
    app: &mut AppState<S>,
    email: String,
    password: String,
) -> AppResult<View> {
    app.navigator.navigate(Screen::Login);
    let form = LoginForm { email, password };
    let grant = app.auth.sign_in(&form).await?;

    app.navigator.reset(Screen::Home);
    refresh_badge(app).await;

    let name = grant.user.map(|u| u.name);
    Ok(View::message(match name {
        Some(name) => format!("Welcome back, {}", name),
        None => "Signed in".to_string(),
    }))
}

pub async fn register<S: Storefront>(app: &mut AppState<S>, args: RegisterArgs) -> AppResult<View> {
    app.navigator.navigate(Screen::Register);
    let form = RegistrationForm {
        name: args.name,
        email: args.email,
        password: args.password,
        re_password: args.re_password,
        phone: args.phone,
    };
    let grant = app.auth.register(&form).await?;

    if grant.token.is_some() {
        app.navigator.reset(Screen::Home);
        refresh_badge(app).await;
        Ok(View::message("Account created. You are signed in."))
    } else {
        app.navigator.reset(Screen::Login);
        Ok(View::message("Account created. Sign in to continue."))
    }
}

pub async fn request_reset_code<S: Storefront>(
    app: &mut AppState<S>,
    email: &str,
) -> AppResult<View> {
    app.navigator.navigate(Screen::ForgetPassword);
    let message = app.auth.request_reset_code(email).await?;
    Ok(View::message(message))
}

pub async fn verify_reset_code<S: Storefront>(
    app: &mut AppState<S>,
    code: &str,
) -> AppResult<View> {
    app.navigator.navigate(Screen::ForgetPassword);
    app.auth.verify_reset_code(code).await?;
    Ok(View::message("Code accepted. Choose a new password."))
}

pub async fn reset_password<S: Storefront>(
    app: &mut AppState<S>,
    email: &str,
    password: &str,
    confirm: &str,
) -> AppResult<View> {
    app.navigator.navigate(Screen::ForgetPassword);
    let grant = app.auth.reset_password(email, password, confirm).await?;

    if grant.token.is_some() {
        app.navigator.reset(Screen::Home);
        refresh_badge(app).await;
        Ok(View::message("Password changed. You are signed in."))
    } else {
        app.navigator.reset(Screen::Login);
        Ok(View::message("Password changed. Sign in with the new password."))
    }
}

pub fn logout<S: Storefront>(app: &mut AppState<S>) -> View {
    app.sign_out();
    View::message("Signed out")
}

/// Pulls the server cart so the badge is right after signing in. A failure
/// here is not a failed sign-in.
async fn refresh_badge<S: Storefront>(app: &AppState<S>) {
    let token = app.token();
    match app.cart.fetch_cart(token.as_ref()).await {
        Ok(()) => info!(count = app.cart.count(), "Cart loaded after sign-in"),
        Err(e) => warn!(error = %e, "Could not load the cart after sign-in"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::error::{ErrorCode, Surface};
    use freshcart_client::fake::FAKE_RESET_CODE;

    #[tokio::test]
    async fn test_login_goes_home() {
        let mut app = signed_out();

        let view = login(&mut app, EMAIL.into(), PASSWORD.into()).await.unwrap();
        assert_eq!(view, View::message("Welcome back, Mona"));
        assert_eq!(app.navigator.current(), &Screen::Home);
        assert_eq!(app.navigator.depth(), 1);
        assert!(app.session.has_token());
        assert_eq!(app.session.email().as_deref(), Some(EMAIL));
    }

    #[tokio::test]
    async fn test_login_bad_password_stays() {
        let mut app = signed_out();
        let err = login(&mut app, EMAIL.into(), "wrong-pass".into())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AuthRequired);
        assert_eq!(err.message, "Incorrect email or password");
        assert_eq!(app.navigator.current(), &Screen::Login);
        assert!(!app.session.has_token());
    }

    #[tokio::test]
    async fn test_login_blank_fields_inline() {
        let mut app = signed_out();
        let err = login(&mut app, "".into(), "".into()).await.unwrap_err();
        match err.surface {
            Surface::Inline { fields } => assert_eq!(fields.len(), 2),
            other => panic!("expected inline errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let mut app = signed_out();
        let args = RegisterArgs {
            name: "Omar".into(),
            email: "omar@example.com".into(),
            password: "secret1".into(),
            re_password: "secret1".into(),
            phone: "01012345678".into(),
        };

        register(&mut app, args.clone()).await.unwrap();
        assert_eq!(app.navigator.current(), &Screen::Home);

        app.sign_out();
        let err = register(&mut app, args).await.unwrap_err();
        assert_eq!(err.message, "Account Already Exists");
        assert_eq!(err.code, ErrorCode::ServerError);
    }

    #[tokio::test]
    async fn test_register_without_token_goes_to_login() {
        let mut app = signed_out();
        app.backend.set_issue_tokens(false);
        let args = RegisterArgs {
            name: "Omar".into(),
            email: "omar@example.com".into(),
            password: "secret1".into(),
            re_password: "secret1".into(),
            phone: "01012345678".into(),
        };

        register(&mut app, args).await.unwrap();
        assert_eq!(app.navigator.current(), &Screen::Login);
        assert!(!app.session.has_token());
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let mut app = signed_out();

        request_reset_code(&mut app, EMAIL).await.unwrap();
        assert_eq!(app.navigator.current(), &Screen::ForgetPassword);

        let err = verify_reset_code(&mut app, "000000").await.unwrap_err();
        assert_eq!(err.message, "Reset code is invalid or has expired");

        verify_reset_code(&mut app, FAKE_RESET_CODE).await.unwrap();
        reset_password(&mut app, EMAIL, "newpass1", "newpass1")
            .await
            .unwrap();
        assert_eq!(app.navigator.current(), &Screen::Home);
        assert!(app.session.has_token());

        app.sign_out();
        login(&mut app, EMAIL.into(), "newpass1".into()).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let mut app = signed_in();
        app.cart.set_count(3);

        logout(&mut app);
        assert_eq!(app.navigator.current(), &Screen::Login);
        assert_eq!(
            status(&app),
            View::Session {
                signed_in: false,
                email: None,
                badge: None,
            }
        );
    }
}
