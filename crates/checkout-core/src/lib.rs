//! # checkout-core
//!
//! Core types, seams and flow for the checkout-kit initiator.
//!
//! This crate provides:
//! - `CartRow`, `CartLineItem` and `collect_line_items` for reading the cart
//! - `SessionTransport` and `SessionClient` for the session endpoint
//! - `PaymentSdk` for the injected payment SDK
//! - `CheckoutInitiator::attempt` as the pure checkout operation
//! - `CheckoutController` mapping attempt results to the trigger control and
//!   user notifications
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutConfig, CheckoutController, CheckoutInitiator, CheckoutVariant};
//!
//! let config = CheckoutConfig::new().with_publishable_key("pk_test_...");
//! let initiator = CheckoutInitiator::new(
//!     CheckoutVariant::Redirect,
//!     config,
//!     Box::new(cart_source),
//!     Box::new(transport),
//!     Box::new(sdk),
//! );
//! let controller = CheckoutController::new(initiator, Box::new(notifier))
//!     .with_control(Box::new(button));
//!
//! // On click:
//! controller.activate().await;
//! ```

pub mod cart;
pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod initiator;
pub mod sdk;
pub mod session;

// Re-exports for convenience
pub use cart::{collect_line_items, CartLineItem, CartRow, CartSource, CheckoutItems};
pub use config::{CheckoutConfig, DomSelectors, DEFAULT_ENDPOINT};
pub use control::{Notifier, TriggerControl};
pub use controller::{Activation, CheckoutController, CheckoutState};
pub use error::{CheckoutError, CheckoutResult, TransportError, GENERIC_FAILURE_MESSAGE};
pub use initiator::{CheckoutInitiator, CheckoutOutcome, CheckoutVariant, Handoff};
pub use sdk::{EmbeddedCheckout, PaymentSdk};
pub use session::{ClientSecret, RawResponse, SessionClient, SessionId, SessionTransport};
