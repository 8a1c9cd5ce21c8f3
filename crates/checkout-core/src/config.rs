//! # Checkout Configuration
//!
//! Page-level settings for the initiator. The publishable key comes from the
//! hosting page; everything else has defaults matching the stock markup.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::env;

/// Default session-creation endpoint
pub const DEFAULT_ENDPOINT: &str = "/create-checkout-session";

/// Selectors used to find the page elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomSelectors {
    /// Marked cart rows
    pub cart_row: String,
    /// Attribute on a row holding the product identifier
    pub product_id_attribute: String,
    /// Quantity input inside a row
    pub quantity_input: String,
    /// Trigger control
    pub trigger: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            cart_row: "[data-cart-row]".to_string(),
            product_id_attribute: "data-product-id".to_string(),
            quantity_input: "input[name=\"quantity\"]".to_string(),
            trigger: "#checkout-button".to_string(),
        }
    }
}

/// Checkout initiator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutConfig {
    /// Publishable key (pk_test_... or pk_live_...), required for redirect
    pub publishable_key: Option<String>,

    /// Session-creation endpoint
    pub endpoint: String,

    /// Element the embedded widget mounts into
    pub container_selector: String,

    /// Trigger label while an attempt is in flight
    pub processing_label: String,

    pub selectors: DomSelectors,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            publishable_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            container_selector: "#checkout".to_string(),
            processing_label: "Processing...".to_string(),
            selectors: DomSelectors::default(),
        }
    }
}

impl CheckoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `STRIPE_PUBLISHABLE_KEY`, `CHECKOUT_ENDPOINT`,
    /// `CHECKOUT_CONTAINER` and `CHECKOUT_PROCESSING_LABEL`; unset values
    /// keep their defaults. The key is not validated here.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        config.publishable_key = env::var("STRIPE_PUBLISHABLE_KEY").ok();
        if let Ok(endpoint) = env::var("CHECKOUT_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(container) = env::var("CHECKOUT_CONTAINER") {
            config.container_selector = container;
        }
        if let Ok(label) = env::var("CHECKOUT_PROCESSING_LABEL") {
            config.processing_label = label;
        }
        config
    }

    /// Load from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Builder: set publishable key
    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = Some(key.into());
        self
    }

    /// Builder: set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builder: set widget container
    pub fn with_container(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = selector.into();
        self
    }

    /// Builder: set in-flight label
    pub fn with_processing_label(mut self, label: impl Into<String>) -> Self {
        self.processing_label = label.into();
        self
    }

    /// The publishable key, or `Configuration` if it is missing or malformed
    pub fn require_publishable_key(&self) -> Result<&str, CheckoutError> {
        let key = self
            .publishable_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CheckoutError::Configuration("publishable key is not set".to_string())
            })?;

        if !key.starts_with("pk_test_") && !key.starts_with("pk_live_") {
            return Err(CheckoutError::Configuration(
                "publishable key must start with pk_test_ or pk_live_".to_string(),
            ));
        }

        Ok(key)
    }

    /// Check if using a test key
    pub fn is_test_mode(&self) -> bool {
        self.publishable_key
            .as_deref()
            .is_some_and(|k| k.starts_with("pk_test_"))
    }
}
