//! # Cart Files
//!
//! TOML stand-in for the page's cart rows:
//!
//! ```toml
//! [[rows]]
//! id = "mug"
//! quantity = "2"
//!
//! [[rows]]
//! id = "poster"
//! quantity = 1
//! ```
//!
//! Values are kept raw; validation happens in `collect_line_items` exactly as
//! for DOM rows.

use anyhow::Context;
use checkout_core::CartRow;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct CartFile {
    #[serde(default)]
    rows: Vec<FileRow>,
}

#[derive(Debug, Deserialize)]
struct FileRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    quantity: Option<toml::Value>,
}

impl From<FileRow> for CartRow {
    fn from(row: FileRow) -> Self {
        let quantity = row.quantity.map(|value| match value {
            toml::Value::String(text) => text,
            other => other.to_string(),
        });
        CartRow {
            product_id: row.id,
            quantity,
        }
    }
}

/// Parse cart rows from TOML text
pub fn parse_cart(toml_str: &str) -> anyhow::Result<Vec<CartRow>> {
    let file: CartFile = toml::from_str(toml_str).context("invalid cart file")?;
    Ok(file.rows.into_iter().map(CartRow::from).collect())
}

/// Load cart rows from a file
pub fn load_cart(path: &Path) -> anyhow::Result<Vec<CartRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read cart file {}", path.display()))?;
    let rows = parse_cart(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} cart rows from {}", rows.len(), path.display());
    Ok(rows)
}
