//! # Checkout Error Types
//!
//! Typed error handling for the checkout initiator.
//! Every attempt returns `Result<T, CheckoutError>`; nothing escapes the
//! triggering handler.

use thiserror::Error;

/// Shown when the server gave no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong starting checkout. Please try again.";

/// Core error type for a checkout attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Publishable key missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No cart row produced a valid line item
    #[error("Cart is empty")]
    EmptyCart,

    /// Session endpoint unreachable, non-success status, or malformed body
    #[error("Session creation failed: {}", .message.as_deref().unwrap_or("no server message"))]
    SessionCreation {
        /// Message from the server's `{ "error": ... }` body, if any
        message: Option<String>,
        /// HTTP status, absent for transport-level failures
        status: Option<u16>,
    },

    /// The payment SDK reported a redirect or mount failure
    #[error("Payment SDK error: {0}")]
    Sdk(String),
}

impl CheckoutError {
    /// Session failure without anything the user should see verbatim
    pub fn session_unavailable() -> Self {
        CheckoutError::SessionCreation {
            message: None,
            status: None,
        }
    }

    /// Text for the blocking notification
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Configuration(_) => {
                "Payment is not configured. Please contact support.".to_string()
            }
            CheckoutError::EmptyCart => "Your cart is empty.".to_string(),
            CheckoutError::SessionCreation {
                message: Some(message),
                ..
            } => format!("Error: {}", message),
            CheckoutError::SessionCreation { message: None, .. } => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            CheckoutError::Sdk(message) => format!("Error: {}", message),
        }
    }

    /// True if the attempt stopped before any request was sent
    pub fn blocks_network(&self) -> bool {
        matches!(
            self,
            CheckoutError::Configuration(_) | CheckoutError::EmptyCart
        )
    }
}

/// Failure of the underlying HTTP exchange (no response to interpret)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

impl From<TransportError> for CheckoutError {
    fn from(_: TransportError) -> Self {
        CheckoutError::session_unavailable()
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
