//! # reqwest Session Transport
//!
//! Native `SessionTransport` over `reqwest`. Relative endpoints such as
//! `/create-checkout-session` are resolved against the configured base URL.

use crate::HttpError;
use async_trait::async_trait;
use checkout_core::{RawResponse, SessionTransport, TransportError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Session transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpSessionTransport {
    client: Client,
    base_url: String,
}

impl HttpSessionTransport {
    /// Create a transport with no request timeout of its own
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpError> {
        let client = Client::builder()
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a transport whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for an endpoint
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

#[async_trait(?Send)]
impl SessionTransport for HttpSessionTransport {
    #[instrument(skip(self, body), fields(has_body = body.is_some()))]
    async fn post(&self, endpoint: &str, body: Option<String>) -> Result<RawResponse, TransportError> {
        let url = self.resolve(endpoint);
        debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            TransportError(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        debug!("Session endpoint responded: status={}", status);
        Ok(RawResponse::new(status, body))
    }
}
