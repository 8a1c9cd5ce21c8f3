//! # Session Creation
//!
//! The single request/response cycle with the session endpoint.
//!
//! `SessionTransport` only moves bytes; `SessionClient` owns the wire
//! contract so every transport (reqwest, browser `fetch`, test doubles)
//! interprets responses the same way.

use crate::cart::CheckoutItems;
use crate::error::{CheckoutError, CheckoutResult, TransportError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one `POST` against the session endpoint.
///
/// `body` is a serialized JSON document; `None` means an empty request body.
#[async_trait(?Send)]
pub trait SessionTransport {
    async fn post(&self, endpoint: &str, body: Option<String>) -> Result<RawResponse, TransportError>;
}

/// Client secret for the embedded widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecret(pub String);

/// Session id for the hosted payment page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedSessionResponse {
    #[serde(default)]
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RedirectSessionResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Session endpoint client
pub struct SessionClient {
    transport: Box<dyn SessionTransport>,
    endpoint: String,
}

impl SessionClient {
    pub fn new(transport: Box<dyn SessionTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `POST` with no body, expecting `{ "clientSecret": ... }`
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn create_embedded_session(&self) -> CheckoutResult<ClientSecret> {
        let response = self.send(None).await?;
        let parsed: EmbeddedSessionResponse = parse_success(&response)?;

        match parsed.client_secret.filter(|s| !s.is_empty()) {
            Some(secret) => {
                info!("Received client secret for embedded checkout");
                Ok(ClientSecret(secret))
            }
            None => {
                error!("Session response has no clientSecret");
                Err(CheckoutError::SessionCreation {
                    message: None,
                    status: Some(response.status),
                })
            }
        }
    }

    /// `POST { "items": [...] }`, expecting `{ "id": ... }`
    #[instrument(skip(self, items), fields(endpoint = %self.endpoint, items = items.items.len()))]
    pub async fn create_redirect_session(&self, items: &CheckoutItems) -> CheckoutResult<SessionId> {
        let body = serde_json::to_string(items).map_err(|e| {
            error!("Failed to serialize checkout items: {}", e);
            CheckoutError::session_unavailable()
        })?;

        let response = self.send(Some(body)).await?;
        let parsed: RedirectSessionResponse = parse_success(&response)?;

        match parsed.id.filter(|s| !s.is_empty()) {
            Some(id) => {
                info!("Created checkout session: id={}", id);
                Ok(SessionId(id))
            }
            None => {
                error!("Session response has no id");
                Err(CheckoutError::SessionCreation {
                    message: None,
                    status: Some(response.status),
                })
            }
        }
    }

    async fn send(&self, body: Option<String>) -> CheckoutResult<RawResponse> {
        debug!("POST {} (body: {})", self.endpoint, body.is_some());

        self.transport
            .post(&self.endpoint, body)
            .await
            .map_err(|e| {
                error!("Session request failed: {}", e);
                CheckoutError::from(e)
            })
    }
}

/// Decode a success body, or turn a failure status into `SessionCreation`
fn parse_success<T: serde::de::DeserializeOwned>(response: &RawResponse) -> CheckoutResult<T> {
    if !response.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .map(|b| b.error)
            .filter(|m| !m.is_empty());

        error!(
            "Session endpoint error: status={}, message={:?}",
            response.status, message
        );

        return Err(CheckoutError::SessionCreation {
            message,
            status: Some(response.status),
        });
    }

    serde_json::from_str(&response.body).map_err(|e| {
        error!("Failed to parse session response: {}", e);
        CheckoutError::SessionCreation {
            message: None,
            status: Some(response.status),
        }
    })
}
