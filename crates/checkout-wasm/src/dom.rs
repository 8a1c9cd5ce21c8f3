//! # DOM Adapters
//!
//! Page-side implementations of the core seams: cart rows read from marked
//! elements, a button as the trigger control, and `window.alert` as the
//! notifier.

use checkout_core::{CartRow, CartSource, DomSelectors, Notifier, TriggerControl};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};

/// Reads cart rows from the document on every call
pub struct DomCartSource {
    document: Document,
    selectors: DomSelectors,
}

impl DomCartSource {
    pub fn new(document: Document, selectors: DomSelectors) -> Self {
        Self {
            document,
            selectors,
        }
    }

    fn read_row(&self, row: &Element) -> CartRow {
        let quantity = row
            .query_selector(&self.selectors.quantity_input)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value());

        CartRow {
            product_id: row.get_attribute(&self.selectors.product_id_attribute),
            quantity,
        }
    }
}

impl CartSource for DomCartSource {
    fn rows(&self) -> Vec<CartRow> {
        let Ok(nodes) = self.document.query_selector_all(&self.selectors.cart_row) else {
            web_sys::console::warn_1(&"Invalid cart row selector".into());
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|row| self.read_row(&row))
            .collect()
    }
}

/// A `<button>` as the trigger control
#[derive(Clone)]
pub struct DomTrigger {
    button: HtmlButtonElement,
}

impl DomTrigger {
    pub fn new(button: HtmlButtonElement) -> Self {
        Self { button }
    }

    /// Find the trigger in the document
    pub fn find(document: &Document, selector: &str) -> Option<Self> {
        document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            .map(Self::new)
    }

    pub fn element(&self) -> &HtmlButtonElement {
        &self.button
    }
}

impl TriggerControl for DomTrigger {
    fn is_enabled(&self) -> bool {
        !self.button.disabled()
    }

    fn set_enabled(&self, enabled: bool) {
        self.button.set_disabled(!enabled);
    }

    fn label(&self) -> String {
        self.button.text_content().unwrap_or_default()
    }

    fn set_label(&self, label: &str) {
        self.button.set_text_content(Some(label));
    }
}

/// `window.alert` notifications
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        match web_sys::window() {
            Some(window) => {
                if window.alert_with_message(message).is_err() {
                    web_sys::console::error_1(&message.into());
                }
            }
            None => web_sys::console::error_1(&message.into()),
        }
    }
}
