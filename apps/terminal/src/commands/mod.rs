//! # Commands
//!
//! One function per subcommand. Each moves the navigator to the screen the
//! command stands for, does its work through [`AppState`], and returns a
//! [`View`] for rendering.
//!
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch)
//! ├── account.rs   ◄─── status, login, register, password reset, logout
//! ├── catalog.rs   ◄─── products, product detail, brands, categories
//! ├── cart.rs      ◄─── show, add, set, remove, minus, plus
//! ├── checkout.rs  ◄─── checkout session, online or cash
//! └── screens.rs   ◄─── screen graph listing
//! ```

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod screens;

use tracing::debug;

use freshcart_client::Storefront;

use crate::cli::{CartCommand, Command, PasswordCommand};
use crate::error::AppResult;
use crate::render::View;
use crate::state::AppState;

/// Runs one parsed command against `app`.
pub async fn execute<S: Storefront>(app: &mut AppState<S>, command: Command) -> AppResult<View> {
    debug!(?command, "Executing command");
    match command {
        Command::Status => Ok(account::status(app)),
        Command::Login { email, password } => account::login(app, email, password).await,
        Command::Register(args) => account::register(app, args).await,
        Command::Password(PasswordCommand::Request { email }) => {
            account::request_reset_code(app, &email).await
        }
        Command::Password(PasswordCommand::Verify { code }) => {
            account::verify_reset_code(app, &code).await
        }
        Command::Password(PasswordCommand::Reset {
            email,
            password,
            confirm,
        }) => account::reset_password(app, &email, &password, &confirm).await,
        Command::Logout => Ok(account::logout(app)),
        Command::Products { search } => catalog::products(app, search).await,
        Command::Product { id } => catalog::product(app, &id).await,
        Command::Brands { search } => catalog::brands(app, search).await,
        Command::Categories { search } => catalog::categories(app, search).await,
        Command::Cart { action } => match action.unwrap_or(CartCommand::Show) {
            CartCommand::Show => cart::show(app).await,
            CartCommand::Add { product_id } => cart::add(app, &product_id).await,
            CartCommand::Set { product_id, count } => cart::set(app, &product_id, count).await,
            CartCommand::Remove { product_id } => cart::remove(app, &product_id).await,
            CartCommand::Minus { product_id } => cart::minus(app, &product_id).await,
            CartCommand::Plus { product_id } => cart::plus(app, &product_id).await,
        },
        Command::Checkout(args) => checkout::run(app, args).await,
        Command::Screens => Ok(screens::list()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use freshcart_client::{ClientConfig, FakeStorefront, PersistedState};
    use freshcart_core::{AuthToken, CartState};

    use crate::state::AppState;

    pub const EMAIL: &str = "mona@example.com";
    pub const PASSWORD: &str = "secret1";

    pub fn token() -> AuthToken {
        AuthToken::new("tok-mona").unwrap()
    }

    /// App over a catalog-seeded fake with one known account, signed out.
    pub fn signed_out() -> AppState<FakeStorefront> {
        let fake = FakeStorefront::with_catalog();
        fake.add_account("Mona", EMAIL, PASSWORD);
        AppState::with_backend(
            ClientConfig::default(),
            Arc::new(fake),
            PersistedState::default(),
            None,
        )
    }

    /// App restored with a token, as after a previous login.
    pub fn signed_in() -> AppState<FakeStorefront> {
        let fake = FakeStorefront::with_catalog();
        fake.add_account("Mona", EMAIL, PASSWORD);
        let persisted =
            PersistedState::capture(Some(token()), &CartState::new(), Some(EMAIL.to_string()));
        AppState::with_backend(ClientConfig::default(), Arc::new(fake), persisted, None)
    }
}
