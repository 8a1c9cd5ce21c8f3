//! # Checkout Initiator
//!
//! One checkout attempt as a pure result-producing operation: validate,
//! collect cart, make the session request, hand off to the SDK. UI effects
//! live in [`crate::controller`].

use crate::cart::{collect_line_items, CartSource, CheckoutItems};
use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::sdk::PaymentSdk;
use crate::session::{SessionClient, SessionId, SessionTransport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Which flow the page uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutVariant {
    /// Payment form mounted inline, triggered on page ready
    Embedded,
    /// Hosted payment page, triggered by a button click
    Redirect,
}

impl std::fmt::Display for CheckoutVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutVariant::Embedded => write!(f, "embedded"),
            CheckoutVariant::Redirect => write!(f, "redirect"),
        }
    }
}

/// What a successful attempt handed control to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Widget mounted into this container
    Mounted { container: String },
    /// Browser is leaving for the hosted page of this session
    Navigating { session_id: SessionId },
}

/// Result of a successful attempt
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub attempt_id: Uuid,
    pub variant: CheckoutVariant,
    pub handoff: Handoff,
    pub started_at: DateTime<Utc>,
}

/// Runs checkout attempts for one page
pub struct CheckoutInitiator {
    variant: CheckoutVariant,
    config: CheckoutConfig,
    cart: Box<dyn CartSource>,
    sessions: SessionClient,
    sdk: Box<dyn PaymentSdk>,
}

impl CheckoutInitiator {
    pub fn new(
        variant: CheckoutVariant,
        config: CheckoutConfig,
        cart: Box<dyn CartSource>,
        transport: Box<dyn SessionTransport>,
        sdk: Box<dyn PaymentSdk>,
    ) -> Self {
        let sessions = SessionClient::new(transport, config.endpoint.clone());
        Self {
            variant,
            config,
            cart,
            sessions,
            sdk,
        }
    }

    pub fn variant(&self) -> CheckoutVariant {
        self.variant
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Run one attempt. Issues at most one request to the session endpoint.
    #[instrument(skip(self), fields(variant = %self.variant, sdk = self.sdk.sdk_name()))]
    pub async fn attempt(&self) -> CheckoutResult<CheckoutOutcome> {
        let attempt_id = Uuid::new_v4();
        let started_at = Utc::now();

        if self.variant == CheckoutVariant::Redirect {
            self.config.require_publishable_key().map_err(|e| {
                warn!("Checkout blocked: {}", e);
                e
            })?;
        }

        let items = collect_line_items(&self.cart.rows());
        if items.is_empty() {
            warn!("Checkout blocked: no valid cart rows");
            return Err(CheckoutError::EmptyCart);
        }
        let items = CheckoutItems::new(items);

        info!(
            "Starting checkout: attempt={}, {} line items, {} units",
            attempt_id,
            items.items.len(),
            items.unit_count()
        );

        let handoff = match self.variant {
            CheckoutVariant::Embedded => self.mount_embedded().await?,
            CheckoutVariant::Redirect => self.redirect(&items).await?,
        };

        Ok(CheckoutOutcome {
            attempt_id,
            variant: self.variant,
            handoff,
            started_at,
        })
    }

    async fn mount_embedded(&self) -> CheckoutResult<Handoff> {
        let secret = self.sessions.create_embedded_session().await?;

        let checkout = self.sdk.create_embedded_checkout(&secret).await?;
        let container = self.config.container_selector.clone();
        checkout.mount(&container).await?;

        info!("Mounted embedded checkout into {}", container);
        Ok(Handoff::Mounted { container })
    }

    async fn redirect(&self, items: &CheckoutItems) -> CheckoutResult<Handoff> {
        let session_id = self.sessions.create_redirect_session(items).await?;

        self.sdk.redirect_to_checkout(&session_id).await?;

        info!("Redirecting to hosted checkout: session={}", session_id);
        Ok(Handoff::Navigating { session_id })
    }
}
