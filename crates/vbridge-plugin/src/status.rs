//! Serializable status for host-side administrative display.

use chrono::{DateTime, Utc};
use serde::Serialize;
use vbridge_config::{RuntimeValues, SettingName};

use crate::error::{PluginError, PluginResult};
use crate::lifecycle::LifecycleState;

/// Point-in-time view of the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginStatus {
    /// Lifecycle phase.
    pub state: LifecycleState,
    /// Registered subdomain, when active.
    pub subdomain: Option<&'static str>,
    /// Values currently in the configuration store.
    pub configured: Option<RuntimeValues>,
    /// Values in effect since activation.
    pub effective: Option<RuntimeValues>,
    /// Whether `configured` differs from `effective`.
    pub restart_needed: bool,
    /// Settings that differ.
    pub pending_changes: Vec<SettingName>,
    /// When `effective` was captured.
    pub snapshot_captured_at: Option<DateTime<Utc>>,
}

impl PluginStatus {
    /// Status of a plugin that is not running.
    #[must_use]
    pub const fn inactive(state: LifecycleState) -> Self {
        Self {
            state,
            subdomain: None,
            configured: None,
            effective: None,
            restart_needed: false,
            pending_changes: Vec::new(),
            snapshot_captured_at: None,
        }
    }

    /// Render as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> PluginResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|source| PluginError::Serialize { source })
    }
}
