//! # Checkout Controller
//!
//! Presentation layer over [`CheckoutInitiator`]. Owns the trigger control
//! and notifier, maps each attempt result to UI changes, and tracks the
//! flow state.
//!
//! ```text
//! redirect:  Idle ─▶ Submitting ─┬─▶ Navigating
//!                                └─▶ Idle (control restored, message shown)
//! embedded:  Idle ─▶ FetchingSecret ─┬─▶ Mounted
//!                                    └─▶ Idle (control restored, message shown)
//! ```

use crate::control::{IdleLabel, Notifier, TriggerControl};
use crate::error::CheckoutError;
use crate::initiator::{CheckoutInitiator, CheckoutOutcome, CheckoutVariant};
use std::cell::Cell;
use tracing::{debug, error, info};

/// Flow state of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    /// Redirect request in flight
    Submitting,
    /// Embedded secret request in flight
    FetchingSecret,
    /// Terminal: browser is leaving the page
    Navigating,
    /// Terminal: widget owns the page
    Mounted,
}

impl CheckoutState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Navigating | CheckoutState::Mounted)
    }
}

/// What one activation did
#[derive(Debug, Clone)]
pub enum Activation {
    /// Another attempt was in flight or the flow had finished
    Ignored,
    Completed(CheckoutOutcome),
    Failed(CheckoutError),
}

pub struct CheckoutController {
    initiator: CheckoutInitiator,
    control: Option<Box<dyn TriggerControl>>,
    notifier: Box<dyn Notifier>,
    state: Cell<CheckoutState>,
}

impl CheckoutController {
    pub fn new(initiator: CheckoutInitiator, notifier: Box<dyn Notifier>) -> Self {
        Self {
            initiator,
            control: None,
            notifier,
            state: Cell::new(CheckoutState::Idle),
        }
    }

    /// Builder: attach the trigger control
    pub fn with_control(mut self, control: Box<dyn TriggerControl>) -> Self {
        self.control = Some(control);
        self
    }

    pub fn state(&self) -> CheckoutState {
        self.state.get()
    }

    /// Handle one activation (page ready or click).
    ///
    /// A disabled control or a non-idle state makes this a no-op.
    pub async fn activate(&self) -> Activation {
        if self.state.get() != CheckoutState::Idle {
            debug!("Ignoring activation in state {:?}", self.state.get());
            return Activation::Ignored;
        }
        if let Some(control) = &self.control {
            if !control.is_enabled() {
                debug!("Ignoring activation: trigger is disabled");
                return Activation::Ignored;
            }
        }

        let idle_label = self.control.as_deref().map(|control| {
            IdleLabel::capture(control, &self.initiator.config().processing_label)
        });
        self.state.set(match self.initiator.variant() {
            CheckoutVariant::Embedded => CheckoutState::FetchingSecret,
            CheckoutVariant::Redirect => CheckoutState::Submitting,
        });

        match self.initiator.attempt().await {
            Ok(outcome) => {
                self.state.set(match outcome.variant {
                    CheckoutVariant::Embedded => CheckoutState::Mounted,
                    CheckoutVariant::Redirect => CheckoutState::Navigating,
                });
                info!("Checkout handed off: attempt={}", outcome.attempt_id);
                Activation::Completed(outcome)
            }
            Err(err) => {
                error!("Checkout failed: {}", err);
                if let (Some(control), Some(idle)) = (self.control.as_deref(), idle_label) {
                    idle.restore(control);
                }
                self.state.set(CheckoutState::Idle);
                self.notifier.notify(&err.user_message());
                Activation::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartRow;
    use crate::config::CheckoutConfig;
    use crate::control::tests::{FakeButton, RecordingNotifier};
    use crate::error::{TransportError, GENERIC_FAILURE_MESSAGE};
    use crate::initiator::tests::{cart, redirect_config, RecordingSdk};
    use crate::session::tests::ScriptedTransport;
    use crate::session::{RawResponse, SessionTransport};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tokio::sync::Notify;

    struct Page {
        controller: CheckoutController,
        button: FakeButton,
        notifier: RecordingNotifier,
    }

    fn redirect_page(transport: impl SessionTransport + 'static, sdk: RecordingSdk) -> Page {
        let button = FakeButton::new("Checkout");
        let notifier = RecordingNotifier::default();
        let initiator = CheckoutInitiator::new(
            CheckoutVariant::Redirect,
            redirect_config(),
            Box::new(cart()),
            Box::new(transport),
            Box::new(sdk),
        );
        let controller = CheckoutController::new(initiator, Box::new(notifier.clone()))
            .with_control(Box::new(button.clone()));

        Page {
            controller,
            button,
            notifier,
        }
    }

    #[tokio::test]
    async fn test_server_error_restores_control() {
        let transport = ScriptedTransport::respond(400, r#"{"error":"Card declined"}"#);
        let page = redirect_page(transport, RecordingSdk::default());

        let activation = page.controller.activate().await;

        assert!(matches!(activation, Activation::Failed(_)));
        assert_eq!(*page.notifier.messages.borrow(), vec!["Error: Card declined"]);
        assert_eq!(*page.button.state.borrow(), (true, "Checkout".to_string()));
        assert_eq!(page.controller.state(), CheckoutState::Idle);
    }

    #[tokio::test]
    async fn test_network_failure_shows_generic_message() {
        let transport = ScriptedTransport::fail("dns lookup failed");
        let page = redirect_page(transport, RecordingSdk::default());

        page.controller.activate().await;

        assert_eq!(*page.notifier.messages.borrow(), vec![GENERIC_FAILURE_MESSAGE]);
        assert!(page.button.state.borrow().0);
    }

    #[tokio::test]
    async fn test_success_leaves_control_disabled() {
        let transport = ScriptedTransport::respond(200, r#"{"id":"sess_123"}"#);
        let sdk = RecordingSdk::default();
        let page = redirect_page(transport.clone(), sdk.clone());

        let activation = page.controller.activate().await;

        assert!(matches!(activation, Activation::Completed(_)));
        assert_eq!(*sdk.redirects.borrow(), vec!["sess_123".to_string()]);
        assert_eq!(*page.button.state.borrow(), (false, "Processing...".to_string()));
        assert_eq!(page.controller.state(), CheckoutState::Navigating);
        assert!(page.notifier.messages.borrow().is_empty());

        // Navigating is terminal
        assert!(matches!(page.controller.activate().await, Activation::Ignored));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_sdk_error_restores_control() {
        let transport = ScriptedTransport::respond(200, r#"{"id":"sess_123"}"#);
        let sdk = RecordingSdk {
            redirect_error: Some("Network unavailable".into()),
            ..Default::default()
        };
        let page = redirect_page(transport, sdk);

        page.controller.activate().await;

        assert_eq!(*page.notifier.messages.borrow(), vec!["Error: Network unavailable"]);
        assert_eq!(*page.button.state.borrow(), (true, "Checkout".to_string()));
    }

    #[tokio::test]
    async fn test_failure_is_retryable() {
        let transport = ScriptedTransport::respond(500, r#"{"error":"Try again"}"#);
        let page = redirect_page(transport.clone(), RecordingSdk::default());

        page.controller.activate().await;
        page.controller.activate().await;

        assert_eq!(transport.calls(), 2);
        assert_eq!(page.notifier.messages.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_cart_notifies_without_request() {
        let transport = ScriptedTransport::respond(200, r#"{"id":"sess_123"}"#);
        let notifier = RecordingNotifier::default();
        let initiator = CheckoutInitiator::new(
            CheckoutVariant::Redirect,
            redirect_config(),
            Box::new(vec![CartRow::new("mug", "0")]),
            Box::new(transport.clone()),
            Box::new(RecordingSdk::default()),
        );
        let controller = CheckoutController::new(initiator, Box::new(notifier.clone()));

        let activation = controller.activate().await;

        assert!(matches!(activation, Activation::Failed(CheckoutError::EmptyCart)));
        assert_eq!(*notifier.messages.borrow(), vec!["Your cart is empty."]);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_notifies_without_request() {
        let transport = ScriptedTransport::respond(200, r#"{"id":"sess_123"}"#);
        let notifier = RecordingNotifier::default();
        let initiator = CheckoutInitiator::new(
            CheckoutVariant::Redirect,
            CheckoutConfig::new(),
            Box::new(cart()),
            Box::new(transport.clone()),
            Box::new(RecordingSdk::default()),
        );
        let controller = CheckoutController::new(initiator, Box::new(notifier.clone()));

        controller.activate().await;

        assert_eq!(
            *notifier.messages.borrow(),
            vec!["Payment is not configured. Please contact support."]
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_embedded_failure_returns_to_idle() {
        let transport = ScriptedTransport::respond(500, r#"{"error":"Stripe unavailable"}"#);
        let notifier = RecordingNotifier::default();
        let initiator = CheckoutInitiator::new(
            CheckoutVariant::Embedded,
            CheckoutConfig::new(),
            Box::new(cart()),
            Box::new(transport),
            Box::new(RecordingSdk::default()),
        );
        let controller = CheckoutController::new(initiator, Box::new(notifier.clone()));

        controller.activate().await;

        assert_eq!(controller.state(), CheckoutState::Idle);
        assert_eq!(*notifier.messages.borrow(), vec!["Error: Stripe unavailable"]);
    }

    #[tokio::test]
    async fn test_embedded_sdk_error_restores_control() {
        let transport = ScriptedTransport::respond(200, r#"{"clientSecret":"cs_abc"}"#);
        let sdk = RecordingSdk {
            mount_error: Some("Container not found".into()),
            ..Default::default()
        };
        let button = FakeButton::new("Pay now");
        let notifier = RecordingNotifier::default();
        let initiator = CheckoutInitiator::new(
            CheckoutVariant::Embedded,
            CheckoutConfig::new(),
            Box::new(cart()),
            Box::new(transport.clone()),
            Box::new(sdk),
        );
        let controller = CheckoutController::new(initiator, Box::new(notifier.clone()))
            .with_control(Box::new(button.clone()));

        let activation = controller.activate().await;

        assert!(matches!(activation, Activation::Failed(CheckoutError::Sdk(_))));
        assert_eq!(controller.state(), CheckoutState::Idle);
        assert_eq!(*notifier.messages.borrow(), vec!["Error: Container not found"]);
        assert_eq!(*button.state.borrow(), (true, "Pay now".to_string()));

        // Button click retries
        controller.activate().await;
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_embedded_success_is_terminal() {
        let transport = ScriptedTransport::respond(200, r#"{"clientSecret":"cs_abc"}"#);
        let sdk = RecordingSdk::default();
        let initiator = CheckoutInitiator::new(
            CheckoutVariant::Embedded,
            CheckoutConfig::new(),
            Box::new(cart()),
            Box::new(transport.clone()),
            Box::new(sdk.clone()),
        );
        let controller =
            CheckoutController::new(initiator, Box::new(RecordingNotifier::default()));

        controller.activate().await;
        let second = controller.activate().await;

        assert_eq!(controller.state(), CheckoutState::Mounted);
        assert!(matches!(second, Activation::Ignored));
        assert_eq!(sdk.mounts.borrow().len(), 1);
        assert_eq!(transport.calls(), 1);
    }

    /// Holds every request until the gate opens
    struct GatedTransport {
        gate: Rc<Notify>,
        calls: Rc<RefCell<usize>>,
    }

    #[async_trait(?Send)]
    impl SessionTransport for GatedTransport {
        async fn post(&self, _endpoint: &str, _body: Option<String>) -> Result<RawResponse, TransportError> {
            *self.calls.borrow_mut() += 1;
            self.gate.notified().await;
            Ok(RawResponse::new(200, r#"{"id":"sess_123"}"#))
        }
    }

    #[tokio::test]
    async fn test_rapid_activations_make_one_request() {
        let gate = Rc::new(Notify::new());
        let calls = Rc::new(RefCell::new(0));
        let transport = GatedTransport {
            gate: gate.clone(),
            calls: calls.clone(),
        };
        let page = redirect_page(transport, RecordingSdk::default());

        let (first, second, _) = tokio::join!(
            page.controller.activate(),
            page.controller.activate(),
            async {
                tokio::task::yield_now().await;
                gate.notify_one();
            }
        );

        assert_eq!(*calls.borrow(), 1);
        let ignored = [&first, &second]
            .iter()
            .filter(|a| matches!(a, Activation::Ignored))
            .count();
        assert_eq!(ignored, 1);
        assert_eq!(page.controller.state(), CheckoutState::Navigating);
    }
}
