//! # fetch Session Transport
//!
//! `SessionTransport` over the browser's `fetch`. Relative endpoints resolve
//! against the page origin.

use crate::js_error_message;
use async_trait::async_trait;
use checkout_core::{RawResponse, SessionTransport, TransportError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

pub struct FetchTransport;

fn transport_error(err: JsValue) -> TransportError {
    TransportError(js_error_message(&err))
}

#[async_trait(?Send)]
impl SessionTransport for FetchTransport {
    async fn post(&self, endpoint: &str, body: Option<String>) -> Result<RawResponse, TransportError> {
        let window =
            web_sys::window().ok_or_else(|| TransportError("no window available".to_string()))?;

        let headers = Headers::new().map_err(transport_error)?;
        headers
            .set("Accept", "application/json")
            .map_err(transport_error)?;

        let init = RequestInit::new();
        init.set_method("POST");
        if let Some(body) = body {
            headers
                .set("Content-Type", "application/json")
                .map_err(transport_error)?;
            init.set_body(&JsValue::from_str(&body));
        }
        init.set_headers(&headers);

        let request = Request::new_with_str_and_init(endpoint, &init).map_err(transport_error)?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?
            .dyn_into()
            .map_err(transport_error)?;

        let text = JsFuture::from(response.text().map_err(transport_error)?)
            .await
            .map_err(transport_error)?;

        Ok(RawResponse::new(
            response.status(),
            text.as_string().unwrap_or_default(),
        ))
    }
}
