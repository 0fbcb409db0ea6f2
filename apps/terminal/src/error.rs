//! # App Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in FreshCart                              │
//! │                                                                         │
//! │  Command function ── Result<View, AppError>                             │
//! │         │                                                               │
//! │         ├── ValidationError / FormErrors ──► Inline { fields }          │
//! │         ├── CartError::MutationFailed ─────► Toast                      │
//! │         ├── CartError::FetchFailed ────────► FullScreen { retry }       │
//! │         ├── catalog load failure ──────────► FullScreen { retry }       │
//! │         ├── AuthRequired ──────────────────► Toast, "please log in"     │
//! │         └── anything else ─────────────────► Toast                      │
//! │                                                                         │
//! │  render::error() prints it; the process exits non-zero.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use freshcart_client::ClientError;
use freshcart_core::{CartError, CoreError, FormErrors, ValidationError};

/// Error returned from a command.
///
/// ## Serialization
/// With `--json` this is printed as:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "phone is required",
///   "surface": { "kind": "inline", "fields": [["phone", "phone is required"]] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("[{code:?}] {message}")]
pub struct AppError {
    /// Machine-readable error code.
    pub code: ErrorCode,

    /// Human-readable message.
    pub message: String,

    /// How the screen presents it.
    pub surface: Surface,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A form field was rejected before any request.
    ValidationError,

    /// No token, or the server rejected it.
    AuthRequired,

    /// The server could not be reached or timed out.
    NetworkError,

    /// The server rejected the request.
    ServerError,

    /// A cart operation failed.
    CartError,

    /// Configuration or local file problem.
    ConfigError,

    /// Anything else.
    Internal,
}

/// Presentation of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Surface {
    /// Short message; the screen stays as it was.
    Toast,

    /// Messages under the offending form fields, as `(field, message)`.
    Inline { fields: Vec<(String, String)> },

    /// Replaces the screen content. `retry` offers a manual retry.
    FullScreen { retry: bool },
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>, surface: Surface) -> Self {
        AppError {
            code,
            message: message.into(),
            surface,
        }
    }

    pub fn toast(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError::new(code, message, Surface::Toast)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::toast(ErrorCode::Internal, message)
    }

    /// Turns `err` into a full-screen error, used when the first load of a
    /// screen fails.
    pub fn full_screen(err: impl Into<AppError>) -> Self {
        let mut err = err.into();
        if matches!(err.surface, Surface::Toast) {
            err.surface = Surface::FullScreen {
                retry: err.code != ErrorCode::ConfigError,
            };
        }
        err
    }

    pub fn is_auth_required(&self) -> bool {
        self.code == ErrorCode::AuthRequired
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        let message = err.to_string();
        AppError::new(
            ErrorCode::ValidationError,
            message.clone(),
            Surface::Inline {
                fields: vec![(field, message)],
            },
        )
    }
}

impl From<FormErrors> for AppError {
    fn from(err: FormErrors) -> Self {
        AppError::new(
            ErrorCode::ValidationError,
            err.to_string(),
            Surface::Inline {
                fields: err.fields(),
            },
        )
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        let message = err.to_string();
        match err {
            CartError::AuthRequired => AppError::toast(ErrorCode::AuthRequired, message),
            CartError::FetchFailed { .. } => AppError::new(
                ErrorCode::CartError,
                message,
                Surface::FullScreen { retry: true },
            ),
            CartError::MutationFailed { .. } => AppError::toast(ErrorCode::CartError, message),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        if err.is_auth_error() {
            return AppError::toast(ErrorCode::AuthRequired, err.to_string());
        }
        if err.is_config_error() {
            return AppError::toast(ErrorCode::ConfigError, err.to_string());
        }

        match err {
            ClientError::Validation(e) => e.into(),
            ClientError::Form(e) => e.into(),
            ClientError::ConnectionFailed(_) | ClientError::Timeout(_) | ClientError::Http(_) => {
                AppError::toast(ErrorCode::NetworkError, err.to_string())
            }
            ClientError::Api { .. } | ClientError::Status(_) => {
                AppError::toast(ErrorCode::ServerError, err.to_string())
            }
            ClientError::StateIo(_) => AppError::toast(ErrorCode::ConfigError, err.to_string()),
            other => {
                tracing::error!(error = %other, "Unexpected client error");
                AppError::internal(other.to_string())
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => AppError::internal(other.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use freshcart_core::CartOp;

    #[test]
    fn test_cart_error_surfaces() {
        let err: AppError = CartError::for_op(CartOp::Fetch, None).into();
        assert_eq!(err.surface, Surface::FullScreen { retry: true });
        assert_eq!(err.message, "Failed to fetch cart");

        let err: AppError = CartError::for_op(CartOp::Remove, None).into();
        assert_eq!(err.surface, Surface::Toast);
        assert_eq!(err.code, ErrorCode::CartError);

        let err: AppError = CartError::AuthRequired.into();
        assert!(err.is_auth_required());
    }

    #[test]
    fn test_form_errors_are_inline() {
        let mut errors = FormErrors::new();
        errors.push(ValidationError::Required {
            field: "email".into(),
        });
        let err: AppError = ClientError::Form(errors).into();

        assert_eq!(err.code, ErrorCode::ValidationError);
        match err.surface {
            Surface::Inline { fields } => assert_eq!(fields[0].0, "email"),
            other => panic!("expected inline surface, got {other:?}"),
        }
    }

    #[test]
    fn test_client_error_codes() {
        let err: AppError = ClientError::Timeout(10).into();
        assert_eq!(err.code, ErrorCode::NetworkError);

        let err: AppError = ClientError::Unauthorized("Invalid Token".into()).into();
        assert_eq!(err.code, ErrorCode::AuthRequired);
        assert_eq!(err.message, "Invalid Token");

        let err: AppError = ClientError::Api {
            status: 409,
            message: "Account Already Exists".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.to_string(), "[ServerError] Account Already Exists");
    }

    #[test]
    fn test_full_screen_keeps_inline() {
        let err = AppError::full_screen(ClientError::Status(503));
        assert_eq!(err.surface, Surface::FullScreen { retry: true });

        let err = AppError::full_screen(ValidationError::Required {
            field: "query".into(),
        });
        assert!(matches!(err.surface, Surface::Inline { .. }));
    }

    #[test]
    fn test_json_shape() {
        let err: AppError = ValidationError::Required {
            field: "phone".into(),
        }
        .into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["surface"]["kind"], "inline");
        assert_eq!(json["surface"]["fields"][0][0], "phone");
    }
}
