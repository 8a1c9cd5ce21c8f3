//! Terminal stand-ins for the payment SDK and the blocking notification.

use async_trait::async_trait;
use checkout_core::{
    CheckoutResult, ClientSecret, EmbeddedCheckout, Notifier, PaymentSdk, SessionId,
};
use tracing::info;

/// Prints the session reference it would hand to Stripe.js
pub struct ConsoleSdk;

struct ConsoleWidget {
    client_secret: ClientSecret,
}

/// Keep only the secret's prefix on screen
fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(8).collect();
    format!("{}…", visible)
}

#[async_trait(?Send)]
impl EmbeddedCheckout for ConsoleWidget {
    async fn mount(&self, container: &str) -> CheckoutResult<()> {
        info!("Mounting embedded checkout into {}", container);
        println!(
            "Embedded checkout ready for {} (client secret {})",
            container,
            redact(&self.client_secret.0)
        );
        Ok(())
    }
}

#[async_trait(?Send)]
impl PaymentSdk for ConsoleSdk {
    async fn create_embedded_checkout(
        &self,
        client_secret: &ClientSecret,
    ) -> CheckoutResult<Box<dyn EmbeddedCheckout>> {
        Ok(Box::new(ConsoleWidget {
            client_secret: client_secret.clone(),
        }))
    }

    async fn redirect_to_checkout(&self, session_id: &SessionId) -> CheckoutResult<()> {
        println!("Redirect to hosted checkout with sessionId: {}", session_id);
        Ok(())
    }

    fn sdk_name(&self) -> &'static str {
        "console"
    }
}

/// Writes notifications to stderr
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}
