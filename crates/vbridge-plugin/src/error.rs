//! # Design
//!
//! - Separate host refusals (`ComponentError`) from plugin-level failures.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Lifecycle failures are logged by the controller; these types let queries
//!   and tests observe them without the host ever seeing a panic.

use thiserror::Error;

use crate::lifecycle::LifecycleState;

/// Result alias for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors reported by the host's component layer or a component factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// The host refused to add or remove a component.
    #[error("component manager refused the request")]
    Refused {
        /// Operation identifier.
        operation: &'static str,
        /// Subdomain the request targeted.
        subdomain: String,
        /// Host-supplied reason.
        reason: String,
    },
    /// The bridge component could not be constructed.
    #[error("component construction failed")]
    Construction {
        /// Factory-supplied reason.
        reason: String,
    },
}

/// Plugin-level error type.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A query that needs a running bridge was made while inactive.
    #[error("plugin is not running")]
    NotRunning {
        /// State the plugin was in.
        state: LifecycleState,
    },
    /// The host refused the component registration.
    #[error("component registration failed")]
    Registration {
        /// Subdomain the component was registered under.
        subdomain: &'static str,
        /// Host error.
        source: ComponentError,
    },
    /// The bridge component could not be built.
    #[error("component construction failed")]
    ComponentBuild {
        /// Factory error.
        source: ComponentError,
    },
    /// Status could not be serialized.
    #[error("status serialization failed")]
    Serialize {
        /// Source serializer error.
        source: serde_json::Error,
    },
}

impl ComponentError {
    /// Host refusal for `operation` on `subdomain`.
    #[must_use]
    pub fn refused(
        operation: &'static str,
        subdomain: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Refused {
            operation,
            subdomain: subdomain.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_stay_constant_and_sources_are_kept() {
        let refused = ComponentError::refused("add_component", "jitsi-videobridge", "taken");
        assert_eq!(refused.to_string(), "component manager refused the request");

        let err = PluginError::Registration {
            subdomain: "jitsi-videobridge",
            source: refused.clone(),
        };
        assert_eq!(err.to_string(), "component registration failed");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("component manager refused the request"));

        let not_running = PluginError::NotRunning {
            state: LifecycleState::Destroyed,
        };
        assert!(not_running.source().is_none());
        assert!(matches!(
            not_running,
            PluginError::NotRunning {
                state: LifecycleState::Destroyed
            }
        ));
    }
}
