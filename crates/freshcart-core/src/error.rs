//! # Error Types
//!
//! Domain-specific error types for freshcart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  freshcart-core errors (this file)                                     │
//! │  ├── CoreError        - Reducer and navigation rule violations         │
//! │  ├── ValidationError  - One bad form field                             │
//! │  ├── FormErrors       - Every bad field of a submitted form            │
//! │  └── CartError        - What cart operations surface to screens        │
//! │                                                                         │
//! │  freshcart-client errors (separate crate)                              │
//! │  └── ClientError      - HTTP, file system, config failures             │
//! │                                                                         │
//! │  Terminal app errors                                                    │
//! │  └── AppError         - What the user sees (toast, inline, full screen)│
//! │                                                                         │
//! │  Flow: ClientError → CartError → AppError → rendered output            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// Core Error
// =============================================================================

/// Reducer and navigation rule violations.
///
/// These indicate a programming mistake in the caller rather than a user
/// or server problem. The cart store logs them and keeps going.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An add ticket was settled that the cart never issued.
    ///
    /// ## When This Occurs
    /// - A confirmation arrives after `clear()` wiped the ledger (sign-out
    ///   while an add was in flight)
    #[error("Unknown add ticket: {0}")]
    UnknownTicket(Uuid),

    /// An add ticket was issued twice.
    #[error("Add ticket {0} already issued")]
    DuplicateTicket(Uuid),

    /// An add ticket was settled a second time.
    ///
    /// ## When This Occurs
    /// ```text
    /// AddStarted(t)  ──► Pending
    /// AddConfirmed(t) ──► Confirmed
    /// AddRolledBack(t) ──► TicketSettled { current_status: "Confirmed" }
    /// ```
    #[error("Add ticket {ticket} is already {current_status}")]
    TicketSettled { ticket: Uuid, current_status: String },

    /// `back()` was called with only the root screen on the stack.
    #[error("Cannot go back from the root screen {0}")]
    AtRootScreen(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Each variant carries the form field it belongs to so screens can place
/// the message next to that field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email, letters in a phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A confirmation field does not equal the field it confirms.
    #[error("{message}")]
    Mismatch { field: String, message: String },
}

impl ValidationError {
    /// The form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Mismatch { field, .. } => field,
        }
    }
}

/// All field errors of one submitted form.
///
/// Login and registration report every bad field at once; checkout stops
/// at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct FormErrors {
    errors: Vec<ValidationError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error of a single field check, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.errors.push(err);
        }
    }

    pub fn push(&mut self, err: ValidationError) {
        self.errors.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// `(field, message)` pairs in the order the fields were checked.
    pub fn fields(&self) -> Vec<(String, String)> {
        self.errors
            .iter()
            .map(|e| (e.field().to_string(), e.to_string()))
            .collect()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<ValidationError> for FormErrors {
    fn from(err: ValidationError) -> Self {
        FormErrors { errors: vec![err] }
    }
}

// =============================================================================
// Cart Errors
// =============================================================================

/// The four asynchronous cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOp {
    Fetch,
    Add,
    Update,
    Remove,
}

impl CartOp {
    /// Message shown when the server gave no reason.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            CartOp::Fetch => "Failed to fetch cart",
            CartOp::Add => "Failed to add to cart",
            CartOp::Update => "Failed to update cart item",
            CartOp::Remove => "Failed to remove cart item",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, CartOp::Fetch)
    }
}

impl fmt::Display for CartOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CartOp::Fetch => "fetch",
            CartOp::Add => "add",
            CartOp::Update => "update",
            CartOp::Remove => "remove",
        };
        write!(f, "{}", name)
    }
}

/// What a cart operation reports back to the screen that triggered it.
///
/// ## Surfacing
/// ```text
/// AuthRequired    ──► "please log in" prompt, collaborator never called
/// FetchFailed     ──► full-screen error with a retry action
/// MutationFailed  ──► toast, cart keeps its previous contents
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No auth token is held.
    #[error("Please log in to use the cart")]
    AuthRequired,

    /// Loading the cart snapshot failed.
    #[error("{message}")]
    FetchFailed { message: String },

    /// An add, update or remove failed.
    #[error("{message}")]
    MutationFailed { op: CartOp, message: String },
}

impl CartError {
    /// Builds the error for `op`, falling back to the per-operation message
    /// when the server sent none.
    pub fn for_op(op: CartOp, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| op.fallback_message().to_string());
        match op {
            CartOp::Fetch => CartError::FetchFailed { message },
            op => CartError::MutationFailed { op, message },
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
