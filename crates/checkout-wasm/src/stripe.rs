//! # Stripe.js Bindings
//!
//! Minimal bindings to the global `Stripe` factory loaded from
//! `https://js.stripe.com/v3/`, wrapped as a `PaymentSdk`.

use crate::js_error_message;
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, ClientSecret, EmbeddedCheckout, PaymentSdk, SessionId,
};
use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    /// Instance returned by `Stripe(publishableKey)`
    type StripeInstance;

    #[wasm_bindgen(catch, js_name = Stripe)]
    fn create_stripe(publishable_key: &str) -> Result<StripeInstance, JsValue>;

    #[wasm_bindgen(method, catch, js_name = initEmbeddedCheckout)]
    fn init_embedded_checkout(this: &StripeInstance, options: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = redirectToCheckout)]
    fn redirect_to_checkout(this: &StripeInstance, options: &JsValue) -> Result<Promise, JsValue>;

    type StripeEmbeddedHandle;

    #[wasm_bindgen(method, catch)]
    fn mount(this: &StripeEmbeddedHandle, selector: &str) -> Result<(), JsValue>;
}

/// Stripe.js as the checkout SDK
pub struct StripeJs {
    stripe: StripeInstance,
}

impl StripeJs {
    /// Initialize Stripe.js with a publishable key
    pub fn new(publishable_key: &str) -> CheckoutResult<Self> {
        let stripe = create_stripe(publishable_key).map_err(|e| {
            CheckoutError::Configuration(format!(
                "Stripe.js could not be initialized: {}",
                js_error_message(&e)
            ))
        })?;
        Ok(Self { stripe })
    }
}

fn sdk_error(err: JsValue) -> CheckoutError {
    CheckoutError::Sdk(js_error_message(&err))
}

fn set(target: &Object, key: &str, value: &JsValue) -> CheckoutResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(sdk_error)
}

/// `fetchClientSecret` for `initEmbeddedCheckout`. Stripe may call it again
/// when the session refreshes.
pub(crate) fn client_secret_callback(client_secret: &ClientSecret) -> Closure<dyn FnMut() -> Promise> {
    let secret = JsValue::from_str(&client_secret.0);
    Closure::new(move || Promise::resolve(&secret))
}

struct StripeEmbeddedCheckout {
    handle: StripeEmbeddedHandle,
}

#[async_trait(?Send)]
impl EmbeddedCheckout for StripeEmbeddedCheckout {
    async fn mount(&self, container: &str) -> CheckoutResult<()> {
        self.handle.mount(container).map_err(sdk_error)
    }
}

#[async_trait(?Send)]
impl PaymentSdk for StripeJs {
    async fn create_embedded_checkout(
        &self,
        client_secret: &ClientSecret,
    ) -> CheckoutResult<Box<dyn EmbeddedCheckout>> {
        let fetch_client_secret = client_secret_callback(client_secret);

        let options = Object::new();
        set(&options, "fetchClientSecret", fetch_client_secret.as_ref())?;
        fetch_client_secret.forget();

        let promise = self
            .stripe
            .init_embedded_checkout(&options)
            .map_err(sdk_error)?;
        let handle = JsFuture::from(promise).await.map_err(sdk_error)?;

        Ok(Box::new(StripeEmbeddedCheckout {
            handle: handle.unchecked_into(),
        }))
    }

    async fn redirect_to_checkout(&self, session_id: &SessionId) -> CheckoutResult<()> {
        let options = Object::new();
        set(&options, "sessionId", &JsValue::from_str(&session_id.0))?;

        let promise = self
            .stripe
            .redirect_to_checkout(&options)
            .map_err(sdk_error)?;
        let result = JsFuture::from(promise).await.map_err(sdk_error)?;

        // Resolves with `{ error }` only when navigation did not happen
        let error = Reflect::get(&result, &JsValue::from_str("error")).unwrap_or(JsValue::UNDEFINED);
        if error.is_undefined() || error.is_null() {
            Ok(())
        } else {
            Err(sdk_error(error))
        }
    }

    fn sdk_name(&self) -> &'static str {
        "stripe-js"
    }
}
