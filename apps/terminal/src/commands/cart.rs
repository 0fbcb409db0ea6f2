//! # Cart Commands
//!
//! Every cart command needs a token. Without one the app moves to Login
//! and reports `AuthRequired`; the backend is never called.
//!
//! Each run starts from the persisted cart id and badge only, so commands
//! that need line quantities load the cart first.

use tracing::debug;

use freshcart_client::Storefront;
use freshcart_core::validation::validate_product_id;
use freshcart_core::{AuthToken, CartError, Navigator, Screen};

use crate::error::{AppError, AppResult};
use crate::render::{CartView, View};
use crate::state::AppState;

const ADDED_MESSAGE: &str = "Product added successfully to your cart";

pub async fn show<S: Storefront>(app: &mut AppState<S>) -> AppResult<View> {
    app.navigator.navigate(Screen::Cart);
    let token = app.token();
    app.cart
        .fetch_cart(token.as_ref())
        .await
        .map_err(|e| on_cart_error(&mut app.navigator, e))?;
    Ok(cart_view(app))
}

pub async fn add<S: Storefront>(app: &mut AppState<S>, product_id: &str) -> AppResult<View> {
    validate_product_id(product_id)?;
    let token = app.token();
    let ticket = app
        .cart
        .add_to_cart(product_id.trim(), token.as_ref())
        .await
        .map_err(|e| on_cart_error(&mut app.navigator, e))?;
    debug!(%ticket, "Add confirmed");
    Ok(View::message(ADDED_MESSAGE))
}

pub async fn set<S: Storefront>(
    app: &mut AppState<S>,
    product_id: &str,
    count: u32,
) -> AppResult<View> {
    validate_product_id(product_id)?;
    app.navigator.navigate(Screen::Cart);
    let token = app.token();
    app.cart
        .update_cart_item(token.as_ref(), product_id.trim(), count)
        .await
        .map_err(|e| on_cart_error(&mut app.navigator, e))?;
    Ok(cart_view(app))
}

pub async fn remove<S: Storefront>(app: &mut AppState<S>, product_id: &str) -> AppResult<View> {
    validate_product_id(product_id)?;
    app.navigator.navigate(Screen::Cart);
    let token = app.token();
    app.cart
        .remove_cart_item(token.as_ref(), product_id.trim())
        .await
        .map_err(|e| on_cart_error(&mut app.navigator, e))?;
    Ok(cart_view(app))
}

pub async fn minus<S: Storefront>(app: &mut AppState<S>, product_id: &str) -> AppResult<View> {
    validate_product_id(product_id)?;
    let token = load_lines(app).await?;
    app.cart
        .decrease_quantity(token.as_ref(), product_id.trim())
        .await
        .map_err(|e| on_cart_error(&mut app.navigator, e))?;
    Ok(cart_view(app))
}

pub async fn plus<S: Storefront>(app: &mut AppState<S>, product_id: &str) -> AppResult<View> {
    validate_product_id(product_id)?;
    let token = load_lines(app).await?;
    app.cart
        .increase_quantity(token.as_ref(), product_id.trim())
        .await
        .map_err(|e| on_cart_error(&mut app.navigator, e))?;
    Ok(cart_view(app))
}

/// Shows the cart screen with its lines loaded.
async fn load_lines<S: Storefront>(app: &mut AppState<S>) -> AppResult<Option<AuthToken>> {
    app.navigator.navigate(Screen::Cart);
    let token = app.token();
    if app.cart.items().is_empty() {
        app.cart
            .fetch_cart(token.as_ref())
            .await
            .map_err(|e| on_cart_error(&mut app.navigator, e))?;
    }
    Ok(token)
}

fn cart_view<S: Storefront>(app: &AppState<S>) -> View {
    View::Cart {
        cart: app.cart.read(CartView::from_state),
    }
}

fn on_cart_error(navigator: &mut Navigator, err: CartError) -> AppError {
    if err == CartError::AuthRequired {
        navigator.navigate(Screen::Login);
    }
    err.into()
}
