//! # Client Error Types
//!
//! Error types for everything that leaves the process.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Api { status, msg }    │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Unauthorized           │ │
//! │  │  ConfigLoad/Save│  │  Http           │  │  MissingToken           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Payload      │  │   Local state   │  │      Domain             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Deserialization│  │  StateIo        │  │  AuthRequired           │ │
//! │  │  Serialization  │  │                 │  │  Validation / Form      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use freshcart_core::{FormErrors, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering all possible request and storage failures.
///
/// ## Design Principles
/// - Server messages are kept verbatim so screens can show them
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The server could not be reached.
    #[error("Network error: {0}")]
    ConnectionFailed(String),

    /// The request took longer than the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Any other HTTP client failure.
    #[error("HTTP error: {0}")]
    Http(String),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// The server answered with a non-success status.
    ///
    /// ## When This Occurs
    /// - 400: the server rejected the input ("fail" status payloads)
    /// - 404: unknown product or cart
    /// - 409: account already exists
    /// - 5xx: server trouble
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server answered with a non-success status and no message.
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// The server rejected the token or the credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// A successful auth response carried no token.
    #[error("Login succeeded but no token returned")]
    MissingToken,

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Failed to serialize a request body or persisted state.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The response body did not have the expected shape.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    // =========================================================================
    // Local State Errors
    // =========================================================================
    /// Reading or writing the persisted session failed.
    #[error("State file error: {0}")]
    StateIo(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// The operation needs a signed-in user.
    #[error("Please login before continuing")]
    AuthRequired,

    /// A single field was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Several fields of a form were rejected.
    #[error(transparent)]
    Form(#[from] FormErrors),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(freshcart_core::DEFAULT_REQUEST_TIMEOUT_SECS)
        } else if err.is_connect() {
            ClientError::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            ClientError::DeserializationFailed(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status.as_u16())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ClientError::DeserializationFailed(err.to_string())
        } else {
            ClientError::SerializationFailed(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::StateIo(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if repeating the same request may succeed.
    ///
    /// Nothing retries automatically; screens use this to decide whether
    /// to offer a retry action.
    ///
    /// ## Retryable Errors
    /// - Connection failures (network issues)
    /// - Timeouts
    /// - Server errors (5xx)
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout(_) | ClientError::Http(_) => {
                true
            }
            ClientError::Api { status, .. } | ClientError::Status(status) => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the user must sign in (again).
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::AuthRequired | ClientError::MissingToken
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
        )
    }

    /// Returns true if user input was rejected before any request.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::Form(_))
    }

    /// The message a server sent, if this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } | ClientError::Unauthorized(message) => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::ConnectionFailed("dns".into()).is_retryable());
        assert!(ClientError::Timeout(10).is_retryable());
        assert!(ClientError::Api {
            status: 502,
            message: "bad gateway".into()
        }
        .is_retryable());

        assert!(!ClientError::Api {
            status: 400,
            message: "fail".into()
        }
        .is_retryable());
        assert!(ClientError::Status(503).is_retryable());
        assert!(!ClientError::Status(404).is_retryable());
        assert!(!ClientError::AuthRequired.is_retryable());
        assert!(!ClientError::InvalidConfig("timeout".into()).is_retryable());
    }

    #[test]
    fn test_auth_errors() {
        assert!(ClientError::Unauthorized("Invalid Token".into()).is_auth_error());
        assert!(ClientError::MissingToken.is_auth_error());
        assert!(!ClientError::Timeout(10).is_auth_error());
    }

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ClientError::Api {
            status: 409,
            message: "Account Already Exists".into(),
        };
        assert_eq!(err.to_string(), "Account Already Exists");
        assert_eq!(err.server_message(), Some("Account Already Exists"));
        assert_eq!(ClientError::MissingToken.server_message(), None);
        assert_eq!(ClientError::Status(500).server_message(), None);
        assert_eq!(
            ClientError::Status(500).to_string(),
            "Request failed with status code 500"
        );
    }

    #[test]
    fn test_json_errors_are_deserialization_failures() {
        let err: ClientError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, ClientError::DeserializationFailed(_)));
    }
}
