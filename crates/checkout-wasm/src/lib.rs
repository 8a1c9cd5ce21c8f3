//! # checkout-wasm
//!
//! WebAssembly bindings for checkout-kit.
//!
//! This crate wires the core checkout flow to the page:
//! - `startEmbeddedCheckout` mounts the embedded widget once the page is ready
//! - `bindRedirectCheckout` attaches the redirect flow to the checkout button
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { bindRedirectCheckout, startEmbeddedCheckout } from 'checkout-wasm';
//!
//! await init();
//!
//! // Redirect variant
//! bindRedirectCheckout({ publishableKey: 'pk_test_...' });
//!
//! // Embedded variant
//! await startEmbeddedCheckout({ publishableKey: 'pk_test_...', containerSelector: '#checkout' });
//! ```
//!
//! Stripe.js (`https://js.stripe.com/v3/`) must be loaded before either call.
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod dom;
pub mod fetch;
pub mod stripe;

use checkout_core::{
    CheckoutConfig, CheckoutController, CheckoutError, CheckoutInitiator, CheckoutVariant,
    Notifier,
};
use dom::{AlertNotifier, DomCartSource, DomTrigger};
use fetch::FetchTransport;
use std::rc::Rc;
use stripe::StripeJs;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Document;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Best-effort message from a thrown JS value
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

/// Parse options passed from JS; `undefined`/`null` means defaults
pub fn config_from_js(options: JsValue) -> Result<CheckoutConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CheckoutConfig::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid checkout options: {}", e)))
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))
}

/// Stripe.js for the configured key, or a notified configuration error
fn stripe_for(config: &CheckoutConfig) -> Result<StripeJs, CheckoutError> {
    let key = config.require_publishable_key()?;
    StripeJs::new(key)
}

fn build_controller(
    variant: CheckoutVariant,
    config: CheckoutConfig,
    document: Document,
    sdk: StripeJs,
) -> CheckoutController {
    let cart = DomCartSource::new(document, config.selectors.clone());
    let initiator = CheckoutInitiator::new(
        variant,
        config,
        Box::new(cart),
        Box::new(FetchTransport),
        Box::new(sdk),
    );
    CheckoutController::new(initiator, Box::new(AlertNotifier))
}

/// Mount the embedded checkout once the page is ready
#[wasm_bindgen(js_name = startEmbeddedCheckout)]
pub fn start_embedded_checkout(options: JsValue) -> Result<(), JsValue> {
    let config = config_from_js(options)?;
    let document = document()?;

    let sdk = match stripe_for(&config) {
        Ok(sdk) => sdk,
        Err(err) => {
            AlertNotifier.notify(&err.user_message());
            return Err(JsValue::from_str(&err.to_string()));
        }
    };

    // Optional: without a trigger only a reload retries after a failure
    let trigger = DomTrigger::find(&document, &config.selectors.trigger);
    let mut controller = build_controller(CheckoutVariant::Embedded, config, document.clone(), sdk);
    if let Some(trigger) = &trigger {
        controller = controller.with_control(Box::new(trigger.clone()));
    }
    let controller = Rc::new(controller);
    if let Some(trigger) = &trigger {
        activate_on_click(trigger, controller.clone())?;
    }

    let run = move || {
        let controller = controller.clone();
        wasm_bindgen_futures::spawn_local(async move {
            controller.activate().await;
        });
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::once(run);
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        )?;
        on_ready.forget();
    } else {
        run();
    }

    Ok(())
}

/// Start the redirect checkout whenever the trigger button is clicked
#[wasm_bindgen(js_name = bindRedirectCheckout)]
pub fn bind_redirect_checkout(options: JsValue) -> Result<(), JsValue> {
    let config = config_from_js(options)?;
    let document = document()?;

    let trigger = DomTrigger::find(&document, &config.selectors.trigger).ok_or_else(|| {
        JsValue::from_str(&format!(
            "Checkout button not found: {}",
            config.selectors.trigger
        ))
    })?;

    let sdk = match stripe_for(&config) {
        Ok(sdk) => sdk,
        Err(err) => {
            // Button stays usable so the missing key is reported on every click
            let message = err.user_message();
            let on_click = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                AlertNotifier.notify(&message);
            });
            trigger
                .element()
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
            return Ok(());
        }
    };

    let controller = Rc::new(
        build_controller(CheckoutVariant::Redirect, config, document, sdk)
            .with_control(Box::new(trigger.clone())),
    );

    activate_on_click(&trigger, controller)
}

/// Run one activation per click; the controller drops clicks while busy
fn activate_on_click(trigger: &DomTrigger, controller: Rc<CheckoutController>) -> Result<(), JsValue> {
    let on_click = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let controller = controller.clone();
        wasm_bindgen_futures::spawn_local(async move {
            controller.activate().await;
        });
    });
    trigger
        .element()
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use checkout_core::{
        CartRow, CartSource, CheckoutResult, ClientSecret, EmbeddedCheckout, PaymentSdk,
        SessionId, TriggerControl,
    };
    use std::cell::RefCell;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    struct UnusedSdk;

    #[async_trait(?Send)]
    impl PaymentSdk for UnusedSdk {
        async fn create_embedded_checkout(
            &self,
            _client_secret: &ClientSecret,
        ) -> CheckoutResult<Box<dyn EmbeddedCheckout>> {
            Err(CheckoutError::Sdk("not available in tests".into()))
        }

        async fn redirect_to_checkout(&self, _session_id: &SessionId) -> CheckoutResult<()> {
            Err(CheckoutError::Sdk("not available in tests".into()))
        }

        fn sdk_name(&self) -> &'static str {
            "unused"
        }
    }

    #[derive(Clone, Default)]
    struct Messages(Rc<RefCell<Vec<String>>>);

    impl Notifier for Messages {
        fn notify(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_config_from_js_defaults() {
        let config = config_from_js(JsValue::UNDEFINED).unwrap();
        assert_eq!(config.endpoint, "/create-checkout-session");
    }

    #[wasm_bindgen_test]
    fn test_config_from_js_object() {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"publishableKey".into(), &"pk_test_abc".into()).unwrap();
        js_sys::Reflect::set(&options, &"containerSelector".into(), &"#pay".into()).unwrap();

        let config = config_from_js(options.into()).unwrap();

        assert_eq!(config.publishable_key.as_deref(), Some("pk_test_abc"));
        assert_eq!(config.container_selector, "#pay");
    }

    #[wasm_bindgen_test]
    fn test_js_error_message() {
        let err: JsValue = js_sys::Error::new("boom").into();
        assert_eq!(js_error_message(&err), "boom");
        assert_eq!(js_error_message(&"plain".into()), "plain");
    }

    #[wasm_bindgen_test]
    fn test_dom_cart_rows() {
        let document = document().unwrap();
        let body = document.body().unwrap();
        body.set_inner_html(
            r#"
            <div data-cart-row data-product-id="mug"><input name="quantity" value="2"></div>
            <div data-cart-row data-product-id="hat"><input name="quantity" value="0"></div>
            <div data-cart-row><input name="quantity" value="1"></div>
            "#,
        );

        let source = DomCartSource::new(document, Default::default());
        let items = checkout_core::collect_line_items(&source.rows());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "mug");
        assert_eq!(items[0].quantity, 2);
    }

    #[wasm_bindgen_test]
    fn test_dom_trigger() {
        let document = document().unwrap();
        let button: web_sys::HtmlButtonElement =
            document.create_element("button").unwrap().unchecked_into();
        button.set_text_content(Some("Checkout"));

        let trigger = DomTrigger::new(button);
        trigger.set_enabled(false);
        trigger.set_label("Processing...");

        assert!(!trigger.is_enabled());
        assert_eq!(trigger.label(), "Processing...");
    }

    #[wasm_bindgen_test]
    async fn test_click_activates_controller() {
        let document = document().unwrap();
        let button: web_sys::HtmlButtonElement =
            document.create_element("button").unwrap().unchecked_into();
        button.set_text_content(Some("Checkout"));
        let trigger = DomTrigger::new(button.clone());
        let messages = Messages::default();

        let initiator = CheckoutInitiator::new(
            CheckoutVariant::Embedded,
            CheckoutConfig::default(),
            Box::new(Vec::<CartRow>::new()),
            Box::new(FetchTransport),
            Box::new(UnusedSdk),
        );
        let controller = Rc::new(
            CheckoutController::new(initiator, Box::new(messages.clone()))
                .with_control(Box::new(trigger.clone())),
        );
        activate_on_click(&trigger, controller.clone()).unwrap();

        button.click();
        for _ in 0..2 {
            JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL))
                .await
                .unwrap();
        }

        assert_eq!(*messages.0.borrow(), vec!["Your cart is empty.".to_string()]);
        assert!(trigger.is_enabled());
        assert_eq!(trigger.label(), "Checkout");
    }

    #[wasm_bindgen_test]
    async fn test_client_secret_callback_is_reusable() {
        let callback = stripe::client_secret_callback(&ClientSecret("cs_test_abc".into()));
        let function: &js_sys::Function = callback.as_ref().unchecked_ref();

        for _ in 0..2 {
            let promise: js_sys::Promise =
                function.call0(&JsValue::NULL).unwrap().unchecked_into();
            let secret = JsFuture::from(promise).await.unwrap();
            assert_eq!(secret.as_string().as_deref(), Some("cs_test_abc"));
        }
    }
}
