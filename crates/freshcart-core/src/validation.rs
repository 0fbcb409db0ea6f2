//! # Validation Module
//!
//! Form validation for the account and checkout screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal command (apps/terminal)                             │
//! │  └── Collects raw strings from flags and prompts                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Login / registration: every bad field reported at once            │
//! │  └── Checkout: stops at the first bad field                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storefront API                                               │
//! │  └── Business errors ("Incorrect email or password", duplicates)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use freshcart_core::validation::{validate_email, validate_password};
//!
//! assert!(validate_email("ahmed@example.com").is_ok());
//! assert!(validate_password("123").is_err());
//! ```

use crate::error::{FormErrors, ValidationError};
use crate::types::{CheckoutForm, LoginForm, RegistrationForm, ShippingAddress};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted by the storefront.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Display name length bounds.
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 20;

/// Minimum phone number length, in digits.
pub const MIN_PHONE_DIGITS: usize = 10;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be blank
/// - Exactly one `@` with a non-empty local part
/// - Domain has a dot, with no empty labels
/// - No whitespace
///
/// ## Example
/// ```rust
/// use freshcart_core::validation::validate_email;
///
/// assert!(validate_email("user@shop.co").is_ok());
/// assert!(validate_email("user@shop").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "Invalid email".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }
    if domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a password: required, at least six characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    required("password", password)?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a display name.
///
/// ## Rules
/// - Must not be blank
/// - Between 2 and 20 characters after trimming
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required("name", name)?;

    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LEN,
        });
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a phone number: ASCII digits only, at least ten of them.
///
/// ## Example
/// ```rust
/// use freshcart_core::validation::validate_phone;
///
/// assert!(validate_phone("01012345678").is_ok());
/// assert!(validate_phone("+2010123456").is_err());
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    required("phone", phone)?;

    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "Phone must be digits only".to_string(),
        });
    }

    if phone.len() < MIN_PHONE_DIGITS {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: MIN_PHONE_DIGITS,
        });
    }

    Ok(())
}

/// Validates that a confirmation field repeats the original.
pub fn validate_matching(
    field: &str,
    original: &str,
    confirmation: &str,
    message: &str,
) -> ValidationResult<()> {
    required(field, confirmation)?;

    if original != confirmation {
        return Err(ValidationError::Mismatch {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    Ok(())
}

/// Validates a password reset code.
pub fn validate_reset_code(code: &str) -> ValidationResult<()> {
    required("reset_code", code)
}

/// Validates a product id passed to a cart or catalog operation.
///
/// Ids travel as one URL path segment, so path and query delimiters,
/// `%` and whitespace are refused.
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    required("product_id", product_id)?;

    let reserved = |c: char| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace();
    if product_id.trim().chars().any(reserved) {
        return Err(ValidationError::InvalidFormat {
            field: "product_id".to_string(),
            reason: "Invalid product id".to_string(),
        });
    }

    Ok(())
}

/// Trims a search query. Empty queries match everything.
pub fn normalize_search_query(query: &str) -> String {
    query.trim().to_lowercase()
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the sign-in form, reporting every bad field.
pub fn validate_login(form: &LoginForm) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_email(&form.email));
    errors.check(validate_password(&form.password));
    errors.into_result()
}

/// Validates the sign-up form, reporting every bad field.
///
/// ## Field Order
/// ```text
/// name ──► email ──► password ──► re_password ──► phone
/// ```
pub fn validate_registration(form: &RegistrationForm) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_name(&form.name));
    errors.check(validate_email(&form.email));
    errors.check(validate_password(&form.password));
    errors.check(validate_matching(
        "re_password",
        &form.password,
        &form.re_password,
        "Passwords must match",
    ));
    errors.check(validate_phone(&form.phone));
    errors.into_result()
}

/// Validates the new password step of the reset flow.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), FormErrors> {
    validate_matching(
        "confirm_password",
        password,
        confirmation,
        "Your passwords must be identical",
    )?;
    validate_password(password)?;
    Ok(())
}

/// Validates the checkout form and returns the trimmed cart id and address.
///
/// Fields are checked in screen order and the first failure wins. The
/// cart id comes from the form, else from `fallback_cart_id` (the cart
/// state's id).
///
/// ## Example
/// ```rust
/// use freshcart_core::types::CheckoutForm;
/// use freshcart_core::validation::validate_checkout;
///
/// let form = CheckoutForm {
///     details: " 12 Nile St ".into(),
///     phone: "01012345678".into(),
///     city: "Cairo".into(),
///     ..Default::default()
/// };
/// let (cart_id, address) = validate_checkout(&form, Some("cart-1")).unwrap();
/// assert_eq!(cart_id, "cart-1");
/// assert_eq!(address.details, "12 Nile St");
/// ```
pub fn validate_checkout(
    form: &CheckoutForm,
    fallback_cart_id: Option<&str>,
) -> ValidationResult<(String, ShippingAddress)> {
    let cart_id = form
        .cart_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .or(fallback_cart_id)
        .unwrap_or_default()
        .trim();
    required("cart_id", cart_id)?;

    let details = form.details.trim();
    required("details", details)?;
    let phone = form.phone.trim();
    required("phone", phone)?;
    let city = form.city.trim();
    required("city", city)?;

    Ok((
        cart_id.to_string(),
        ShippingAddress {
            details: details.to_string(),
            phone: phone.to_string(),
            city: city.to_string(),
        },
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("  first.last@shop.co.uk ").is_ok());

        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("user@exa mple.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("user@example..com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(matches!(
            validate_password("12345"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Al").is_ok());
        assert!(validate_name(&"a".repeat(20)).is_ok());
        assert!(validate_name("A").is_err());
        assert!(validate_name(&"a".repeat(21)).is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("0101234567").is_ok());
        assert!(validate_phone("010123456").is_err());
        assert!(validate_phone("0101234567a").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_validate_login_reports_all_fields() {
        let form = LoginForm {
            email: "bad".to_string(),
            password: "123".to_string(),
        };
        let errors = validate_login(&form).unwrap_err();
        let fields: Vec<String> = errors.fields().into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["email", "password"]);

        let form = LoginForm {
            email: "user@example.com".to_string(),
            password: "123456".to_string(),
        };
        assert!(validate_login(&form).is_ok());
    }

    #[test]
    fn test_validate_registration() {
        let mut form = RegistrationForm {
            name: "Mona".to_string(),
            email: "mona@example.com".to_string(),
            password: "hunter22".to_string(),
            re_password: "hunter22".to_string(),
            phone: "01012345678".to_string(),
        };
        assert!(validate_registration(&form).is_ok());

        form.re_password = "hunter23".to_string();
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field(), "re_password");
        assert_eq!(errors.errors()[0].to_string(), "Passwords must match");
    }

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("newpass1", "newpass1").is_ok());

        let errors = validate_new_password("newpass1", "newpass2").unwrap_err();
        assert_eq!(errors.to_string(), "Your passwords must be identical");

        assert!(validate_new_password("abc", "abc").is_err());
    }

    #[test]
    fn test_validate_checkout_order() {
        let mut form = CheckoutForm::default();
        let err = validate_checkout(&form, None).unwrap_err();
        assert_eq!(err.field(), "cart_id");

        form.cart_id = Some("cart-9".to_string());
        assert_eq!(validate_checkout(&form, None).unwrap_err().field(), "details");

        form.details = "Street 1".to_string();
        assert_eq!(validate_checkout(&form, None).unwrap_err().field(), "phone");

        form.phone = " 0100 ".to_string();
        assert_eq!(validate_checkout(&form, None).unwrap_err().field(), "city");

        form.city = "Giza".to_string();
        let (cart_id, address) = validate_checkout(&form, Some("ignored")).unwrap();
        assert_eq!(cart_id, "cart-9");
        assert_eq!(address.phone, "0100");
    }

    #[test]
    fn test_validate_checkout_blank_cart_id_uses_fallback() {
        let form = CheckoutForm {
            cart_id: Some("  ".to_string()),
            details: "d".to_string(),
            phone: "p".to_string(),
            city: "c".to_string(),
            ..Default::default()
        };
        let (cart_id, _) = validate_checkout(&form, Some("from-state")).unwrap();
        assert_eq!(cart_id, "from-state");
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("6428ebc6dc1175abc65ca0b9").is_ok());
        assert!(validate_product_id(" p1 ").is_ok());
        assert!(matches!(
            validate_product_id(""),
            Err(ValidationError::Required { .. })
        ));
        for id in ["x/../../orders", "p1?x=1", "p1#top", "p%2F1", "p 1", "p\t1"] {
            assert!(
                matches!(
                    validate_product_id(id),
                    Err(ValidationError::InvalidFormat { ref field, .. }) if field == "product_id"
                ),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query("  Shirt "), "shirt");
        assert_eq!(normalize_search_query(""), "");
    }
}
