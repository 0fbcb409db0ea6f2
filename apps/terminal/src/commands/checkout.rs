//! # Checkout Command
//!
//! ```text
//! Cart ──► Checkout ──┬── Online + url ──► Online Payment (url to open)
//!                     └── Cash / no url ─► Cash on Delivery (message)
//! ```

use freshcart_client::{checkout, Storefront};
use freshcart_core::{CheckoutForm, CheckoutOutcome, Screen};

use crate::cli::CheckoutArgs;
use crate::error::AppResult;
use crate::render::View;
use crate::state::AppState;

pub async fn run<S: Storefront>(app: &mut AppState<S>, args: CheckoutArgs) -> AppResult<View> {
    app.navigator.navigate(Screen::Checkout);

    let form = CheckoutForm {
        cart_id: args.cart_id,
        details: args.details,
        phone: args.phone,
        city: args.city,
        payment_method: args.payment.into(),
    };
    let token = app.token();
    let cart_id = app.cart.cart_id();

    let outcome = checkout(
        app.backend.as_ref(),
        token.as_ref(),
        &form,
        cart_id.as_deref(),
    )
    .await?;

    match &outcome {
        CheckoutOutcome::Redirect { url } => {
            app.navigator.navigate(Screen::OnlinePay { url: url.clone() })
        }
        CheckoutOutcome::Placed { message } => app.navigator.navigate(Screen::CashPay {
            message: message.clone(),
        }),
    }
    Ok(View::Checkout { outcome })
}
