//! # Checkout
//!
//! Turns the checkout form into a hosted checkout session.
//!
//! ```text
//! form ──► validate (cart id, details, phone, city) ──► token? ──► create session
//!                                                                  │
//!                   Online + url ──► Redirect { url }  (OnlinePay) ◄┤
//!                   Online, no url ─► Placed { message }            │
//!                   Cash ──────────► Placed { message } (CashPay)  ◄┘
//! ```

use tracing::{debug, info};

use freshcart_core::validation::validate_checkout;
use freshcart_core::{AuthToken, CheckoutForm, CheckoutOutcome, PaymentMethod};

use crate::api::CheckoutApi;
use crate::error::{ClientError, ClientResult};

const NO_REDIRECT_MESSAGE: &str = "Checkout session created. No redirect URL.";
const CASH_PLACED_MESSAGE: &str = "Order placed, pay on delivery.";

/// Validates the form and creates a checkout session.
///
/// `cart_id` is the cart state's id, used when the form carries none.
/// Validation runs before the token check so field errors show first.
pub async fn checkout<C>(
    api: &C,
    token: Option<&AuthToken>,
    form: &CheckoutForm,
    cart_id: Option<&str>,
) -> ClientResult<CheckoutOutcome>
where
    C: CheckoutApi + ?Sized,
{
    let (cart_id, address) = validate_checkout(form, cart_id)?;
    let token = token.ok_or(ClientError::AuthRequired)?;

    debug!(%cart_id, method = %form.payment_method, "Creating checkout session");
    let receipt = api
        .create_checkout_session(token, &cart_id, &address, form.payment_method)
        .await?;

    let outcome = match (form.payment_method, receipt.redirect_url) {
        (PaymentMethod::Online, Some(url)) => CheckoutOutcome::Redirect { url },
        (PaymentMethod::Online, None) => CheckoutOutcome::Placed {
            message: receipt
                .message
                .unwrap_or_else(|| NO_REDIRECT_MESSAGE.to_string()),
        },
        (PaymentMethod::Cash, _) => CheckoutOutcome::Placed {
            message: receipt
                .message
                .unwrap_or_else(|| CASH_PLACED_MESSAGE.to_string()),
        },
    };

    info!(%cart_id, method = %form.payment_method, "Checkout session created");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CartApi;
    use crate::fake::FakeStorefront;
    use freshcart_core::ValidationError;

    fn token() -> AuthToken {
        AuthToken::new("token-1").unwrap()
    }

    fn form(method: PaymentMethod) -> CheckoutForm {
        CheckoutForm {
            cart_id: None,
            details: " 12 Nile St ".into(),
            phone: "01012345678".into(),
            city: "Cairo".into(),
            payment_method: method,
        }
    }

    async fn fake_with_cart() -> (FakeStorefront, String) {
        let fake = FakeStorefront::with_catalog();
        let snapshot = fake.add_item("p-shirt", &token()).await.unwrap();
        let cart_id = snapshot.cart_id.unwrap();
        (fake, cart_id)
    }

    #[tokio::test]
    async fn test_online_checkout_redirects() {
        let (fake, cart_id) = fake_with_cart().await;
        let outcome = checkout(&fake, Some(&token()), &form(PaymentMethod::Online), Some(&cart_id))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CheckoutOutcome::Redirect {
                url: format!("https://checkout.example.com/pay/{}", cart_id)
            }
        );
        let (sent_cart, address, method) = fake.last_checkout().unwrap();
        assert_eq!(sent_cart, cart_id);
        assert_eq!(address.details, "12 Nile St");
        assert_eq!(method, PaymentMethod::Online);
    }

    #[tokio::test]
    async fn test_online_without_url_is_placed() {
        let (fake, cart_id) = fake_with_cart().await;
        fake.set_omit_redirect(true);

        let outcome = checkout(&fake, Some(&token()), &form(PaymentMethod::Online), Some(&cart_id))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CheckoutOutcome::Placed {
                message: "success".into()
            }
        );
    }

    #[tokio::test]
    async fn test_cash_checkout() {
        let (fake, cart_id) = fake_with_cart().await;
        let outcome = checkout(&fake, Some(&token()), &form(PaymentMethod::Cash), Some(&cart_id))
            .await
            .unwrap();
        assert!(matches!(outcome, CheckoutOutcome::Placed { .. }));
    }

    #[tokio::test]
    async fn test_fields_checked_before_token() {
        let fake = FakeStorefront::new();
        let mut bad = form(PaymentMethod::Online);
        bad.phone = "  ".into();

        let err = checkout(&fake, None, &bad, Some("cart-1")).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::Required { ref field }) if field == "phone"
        ));

        let err = checkout(&fake, None, &form(PaymentMethod::Online), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::Required { ref field }) if field == "cart_id"
        ));

        let err = checkout(&fake, None, &form(PaymentMethod::Online), Some("cart-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired));
        assert!(fake.last_checkout().is_none());
    }

    #[tokio::test]
    async fn test_form_cart_id_wins() {
        let (fake, cart_id) = fake_with_cart().await;
        let mut with_id = form(PaymentMethod::Cash);
        with_id.cart_id = Some(cart_id.clone());

        checkout(&fake, Some(&token()), &with_id, Some("stale"))
            .await
            .unwrap();
        assert_eq!(fake.last_checkout().unwrap().0, cart_id);
    }

    #[tokio::test]
    async fn test_server_error_passes_through() {
        let (fake, cart_id) = fake_with_cart().await;
        fake.fail_next(400, Some("Failed to create checkout session."));

        let err = checkout(&fake, Some(&token()), &form(PaymentMethod::Online), Some(&cart_id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create checkout session.");
    }
}
