//! # Cart Types
//!
//! Raw cart rows as read from the page and the validated line items that
//! are sent to the session endpoint.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A line item in a checkout request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product identifier, never empty
    pub id: String,

    /// Requested quantity, at least 1
    pub quantity: u32,
}

impl CartLineItem {
    /// Build a line item from a raw row, or `None` if the row does not qualify
    pub fn from_row(row: &CartRow) -> Option<Self> {
        let id = row.product_id.as_deref()?;
        if id.trim().is_empty() {
            return None;
        }
        let quantity = parse_quantity(row.quantity.as_deref()?)?;

        Some(Self {
            id: id.to_string(),
            quantity,
        })
    }
}

/// One marked cart row, exactly as the page exposes it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRow {
    /// Product-identifier attribute, if the row has one
    #[serde(default, rename = "id")]
    pub product_id: Option<String>,

    /// Text of the row's quantity input, if the row has one
    #[serde(default)]
    pub quantity: Option<String>,
}

impl CartRow {
    pub fn new(product_id: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            product_id: Some(product_id.into()),
            quantity: Some(quantity.into()),
        }
    }
}

/// Source of cart rows (the DOM in the browser, a file in the CLI)
pub trait CartSource {
    /// Read every marked row. Called once per attempt.
    fn rows(&self) -> Vec<CartRow>;
}

impl CartSource for Vec<CartRow> {
    fn rows(&self) -> Vec<CartRow> {
        self.clone()
    }
}

/// Keep the rows with a non-empty identifier and a positive integer quantity
pub fn collect_line_items(rows: &[CartRow]) -> Vec<CartLineItem> {
    let items: Vec<CartLineItem> = rows.iter().filter_map(CartLineItem::from_row).collect();

    if items.len() != rows.len() {
        debug!(
            "Dropped {} of {} cart rows without a valid id or quantity",
            rows.len() - items.len(),
            rows.len()
        );
    }

    items
}

fn parse_quantity(text: &str) -> Option<u32> {
    match text.trim().parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Request body for the redirect variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItems {
    pub items: Vec<CartLineItem>,
}

impl CheckoutItems {
    pub fn new(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }

    /// Total units across all line items
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}
