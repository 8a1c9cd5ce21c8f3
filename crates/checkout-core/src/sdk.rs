//! # Payment SDK Seam
//!
//! The vendor SDK (Stripe.js in the browser) is injected through this trait
//! instead of being read from a global, so the flow can run against a test
//! double or the CLI's console implementation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PaymentSdk (trait)                      │
//! │  ├── create_embedded_checkout() -> EmbeddedCheckout         │
//! │  ├── redirect_to_checkout()                                 │
//! │  └── sdk_name()                                             │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┴─────────────────┐
//!  ┌───────┴───────┐                   ┌───────┴───────┐
//!  │   StripeJs    │                   │  ConsoleSdk   │
//!  │ (checkout-wasm)│                  │ (checkout-cli)│
//!  └───────────────┘                   └───────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::session::{ClientSecret, SessionId};
use async_trait::async_trait;

/// An embedded checkout created by the SDK, not yet attached to the page
#[async_trait(?Send)]
pub trait EmbeddedCheckout {
    /// Attach the widget to the element matched by `container`
    async fn mount(&self, container: &str) -> CheckoutResult<()>;
}

/// Capabilities the initiator needs from the payment SDK.
///
/// Errors should be reported as `CheckoutError::Sdk`.
#[async_trait(?Send)]
pub trait PaymentSdk {
    /// Create the inline widget for a client secret
    async fn create_embedded_checkout(
        &self,
        client_secret: &ClientSecret,
    ) -> CheckoutResult<Box<dyn EmbeddedCheckout>>;

    /// Hand control to the hosted payment page.
    ///
    /// Returning `Ok` means navigation has started.
    async fn redirect_to_checkout(&self, session_id: &SessionId) -> CheckoutResult<()>;

    /// Name used in logs
    fn sdk_name(&self) -> &'static str;
}
