//! Keeps the configuration store in step with host property changes.

use tracing::{debug, error};
use vbridge_config::{ConfigError, PortConfigStore, Setting, WriteOutcome};
use vbridge_events::{PropertyEvent, PropertyEventListener};

/// What the listener did with one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// The key is not a managed setting.
    Ignored,
    /// A set was validated; the store decided the outcome.
    Written(WriteOutcome),
    /// A set carried an unparsable value; the store is unchanged.
    Rejected(ConfigError),
    /// The setting was reset to its default.
    Reset,
}

/// Applies host property notifications to a [`PortConfigStore`].
///
/// XML-sourced notifications are handled exactly like plain ones.
#[derive(Debug, Clone)]
pub struct PropertyChangeListener {
    store: PortConfigStore,
}

impl PropertyChangeListener {
    /// Listener writing into `store`.
    #[must_use]
    pub const fn new(store: PortConfigStore) -> Self {
        Self { store }
    }

    /// Apply one notification.
    ///
    /// A set without a `value` parameter is treated as an unparsable value.
    pub fn apply(&self, event: &PropertyEvent) -> Handled {
        let Some(setting) = Setting::by_host_key(&event.key) else {
            return Handled::Ignored;
        };

        if !event.kind.is_set() {
            self.store.delete(setting);
            debug!(setting = %setting.name, kind = event.kind.as_str(), "setting reset to default");
            return Handled::Reset;
        }

        let raw = event.params.value().unwrap_or_default();
        match self.store.set(setting, raw) {
            Ok(outcome) => Handled::Written(outcome),
            Err(err) => {
                error!(
                    setting = %setting.name,
                    key = %event.key,
                    value = raw,
                    error = %err,
                    "rejected property change"
                );
                Handled::Rejected(err)
            }
        }
    }
}

impl PropertyEventListener for PropertyChangeListener {
    fn on_property_event(&self, event: &PropertyEvent) {
        self.apply(event);
    }
}
