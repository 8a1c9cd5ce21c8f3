//! # checkout-http
//!
//! Native HTTP transport for checkout-kit.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_core::SessionClient;
//! use checkout_http::HttpSessionTransport;
//!
//! let transport = HttpSessionTransport::new("http://localhost:8000")?;
//! let client = SessionClient::new(Box::new(transport), "/create-checkout-session");
//! let session_id = client.create_redirect_session(&items).await?;
//! ```

pub mod transport;

pub use transport::HttpSessionTransport;

use thiserror::Error;

/// Errors setting up the HTTP transport
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}
