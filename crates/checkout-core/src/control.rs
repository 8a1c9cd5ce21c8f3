//! # Trigger Control and Notifications
//!
//! UI seams used by the presentation layer. In the browser these are a
//! button and `window.alert`.

/// The control that starts a checkout attempt
pub trait TriggerControl {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
    fn label(&self) -> String;
    fn set_label(&self, label: &str);
}

/// Blocking user notification
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Label captured when an attempt starts, restored when it fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IdleLabel(pub String);

impl IdleLabel {
    /// Disable the control and show the in-flight label
    pub fn capture(control: &dyn TriggerControl, processing_label: &str) -> Self {
        let original = IdleLabel(control.label());
        control.set_enabled(false);
        control.set_label(processing_label);
        original
    }

    /// Back to idle: original label, enabled
    pub fn restore(&self, control: &dyn TriggerControl) {
        control.set_label(&self.0);
        control.set_enabled(true);
    }
}
