//! Plugin lifecycle: bootstrap, registration, activation, teardown.
//!
//! # Design
//! - Every piece of state that only exists while running lives in one
//!   `ActiveRuntime`, so registration is either complete or absent.
//! - Nothing here returns an error to the host from `initialize` or `destroy`;
//!   failures are logged and reflected in [`LifecycleState`].
//! - The snapshot is captured before the listener subscribes, so no change
//!   notification can land between seeding and capture.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};
use vbridge_config::{
    PortConfigStore, RestartEvaluator, RuntimeValues, SETTINGS, SettingName, StartupSnapshot,
    WriteOutcome,
};
use vbridge_events::{PropertyDispatcher, Subscription};
use vbridge_natives::{BootstrapOutcome, NativeBootstrapper};
use vbridge_telemetry::{LoggingConfig, init_logging};

use crate::component::{ComponentParams, SUBDOMAIN};
use crate::error::{PluginError, PluginResult};
use crate::host::{BridgeComponent, ComponentFactory, ComponentManager, HostHandles};
use crate::listener::PropertyChangeListener;
use crate::status::PluginStatus;

/// Host property holding the log level override.
pub const LOG_LEVEL_PROPERTY: &str = "plugin.videobridge.log.level";
/// Host property holding the log format override (`json` or `pretty`).
pub const LOG_FORMAT_PROPERTY: &str = "plugin.videobridge.log.format";

/// Lifecycle phase of the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Constructed, never initialized.
    Uninitialized,
    /// Preparing native resources.
    Bootstrapping,
    /// Registering the component with the host.
    Registering,
    /// Registered, seeded, and listening for changes.
    Active,
    /// Torn down, or activation failed.
    Destroyed,
}

impl LifecycleState {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Bootstrapping => "bootstrapping",
            Self::Registering => "registering",
            Self::Active => "active",
            Self::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

struct Registration {
    manager: Arc<dyn ComponentManager>,
    component: Arc<dyn BridgeComponent>,
    subdomain: &'static str,
}

struct ActiveRuntime {
    registration: Registration,
    store: PortConfigStore,
    evaluator: RestartEvaluator,
    dispatcher: PropertyDispatcher,
    subscription: Subscription,
}

/// Attaches the bridge to the host and exposes its runtime configuration.
pub struct BridgePlugin {
    factory: Arc<dyn ComponentFactory>,
    state: LifecycleState,
    bootstrap: Option<BootstrapOutcome>,
    runtime: Option<ActiveRuntime>,
}

impl fmt::Debug for BridgePlugin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BridgePlugin")
            .field("state", &self.state)
            .field("bootstrap", &self.bootstrap)
            .field("registered", &self.runtime.is_some())
            .finish()
    }
}

impl BridgePlugin {
    /// Plugin that builds its component with `factory`.
    #[must_use]
    pub fn new(factory: Arc<dyn ComponentFactory>) -> Self {
        Self {
            factory,
            state: LifecycleState::Uninitialized,
            bootstrap: None,
            runtime: None,
        }
    }

    /// Start the plugin. Never fails from the host's point of view; the
    /// resulting state tells whether the bridge became active.
    pub fn initialize(&mut self, handles: &HostHandles) -> LifecycleState {
        if self.state == LifecycleState::Active {
            warn!("initialize called on an active plugin; ignoring");
            return self.state;
        }

        install_logging(handles);
        let span = info_span!("videobridge_plugin", subdomain = SUBDOMAIN);
        let _entered = span.enter();
        info!("videobridge plugin starting");

        self.state = LifecycleState::Bootstrapping;
        let bootstrapper =
            NativeBootstrapper::new(&handles.plugin_binary, Arc::clone(&handles.search_path));
        self.bootstrap = match bootstrapper.ensure_native_resources() {
            Ok(outcome) => {
                debug!(?outcome, "native bootstrap finished");
                Some(outcome)
            }
            Err(err) => {
                warn!(error = %err, "native bootstrap failed; continuing without native libraries");
                None
            }
        };

        self.state = LifecycleState::Registering;
        let registration = match self.register(handles) {
            Ok(registration) => registration,
            Err(err) => {
                error!(error = %err, "the component could not be added; plugin inactive");
                self.runtime = None;
                self.state = LifecycleState::Destroyed;
                return self.state;
            }
        };

        let store = PortConfigStore::new(Arc::clone(&handles.backend));
        seed_store(&store, handles);
        let snapshot = Arc::new(StartupSnapshot::capture(&store));
        let evaluator = RestartEvaluator::new(snapshot, store.clone());
        let listener = Arc::new(PropertyChangeListener::new(store.clone()));
        let subscription = handles.dispatcher.subscribe(listener);

        self.runtime = Some(ActiveRuntime {
            registration,
            store,
            evaluator,
            dispatcher: handles.dispatcher.clone(),
            subscription,
        });
        self.state = LifecycleState::Active;
        info!("videobridge plugin active");
        self.state
    }

    /// Stop the plugin. Idempotent; host refusals are logged and swallowed.
    pub fn destroy(&mut self) {
        let span = info_span!("videobridge_plugin", subdomain = SUBDOMAIN);
        let _entered = span.enter();

        let Some(runtime) = self.runtime.take() else {
            debug!(state = %self.state, "destroy called without an active registration");
            if self.state != LifecycleState::Uninitialized {
                self.state = LifecycleState::Destroyed;
            }
            return;
        };

        let ActiveRuntime {
            registration,
            dispatcher,
            subscription,
            ..
        } = runtime;
        dispatcher.unsubscribe(subscription);
        if let Err(err) = registration
            .manager
            .remove_component(registration.subdomain)
        {
            error!(error = %err, "failed to remove component during shutdown");
        }
        self.state = LifecycleState::Destroyed;
        info!("videobridge plugin stopped");
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the bridge is registered and serving.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.runtime.is_some()
    }

    /// Result of the last native bootstrap, if it succeeded.
    #[must_use]
    pub const fn bootstrap_outcome(&self) -> Option<&BootstrapOutcome> {
        self.bootstrap.as_ref()
    }

    /// The registered bridge component.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn component_handle(&self) -> PluginResult<Arc<dyn BridgeComponent>> {
        Ok(Arc::clone(&self.active()?.registration.component))
    }

    /// Configured single port; may differ from the one in effect.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn single_port(&self) -> PluginResult<i32> {
        Ok(self.active()?.store.single_port())
    }

    /// Configured lower bound of the port range.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn min_port(&self) -> PluginResult<i32> {
        Ok(self.active()?.store.min_port())
    }

    /// Configured upper bound of the port range.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn max_port(&self) -> PluginResult<i32> {
        Ok(self.active()?.store.max_port())
    }

    /// Whether RTP over TCP is configured as enabled.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn tcp_enabled(&self) -> PluginResult<bool> {
        Ok(self.active()?.store.is_tcp_enabled())
    }

    /// Configured TCP port, `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn tcp_port(&self) -> PluginResult<Option<i32>> {
        Ok(self.active()?.store.tcp_port())
    }

    /// Whether configured values drifted from those in effect.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn restart_needed(&self) -> PluginResult<bool> {
        Ok(self.active()?.evaluator.restart_needed())
    }

    /// Settings that only take effect after a restart.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn pending_changes(&self) -> PluginResult<Vec<SettingName>> {
        Ok(self.active()?.evaluator.pending_changes())
    }

    /// Values in effect since activation.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRunning`] unless the plugin is active.
    pub fn effective_values(&self) -> PluginResult<RuntimeValues> {
        Ok(*self.active()?.evaluator.snapshot().values())
    }

    /// Point-in-time view for administrative display.
    #[must_use]
    pub fn status(&self) -> PluginStatus {
        match &self.runtime {
            Some(runtime) => {
                let snapshot = runtime.evaluator.snapshot();
                let pending = runtime.evaluator.pending_changes();
                PluginStatus {
                    state: self.state,
                    subdomain: Some(runtime.registration.subdomain),
                    configured: Some(runtime.store.current()),
                    effective: Some(*snapshot.values()),
                    restart_needed: !pending.is_empty(),
                    pending_changes: pending,
                    snapshot_captured_at: Some(snapshot.captured_at()),
                }
            }
            None => PluginStatus::inactive(self.state),
        }
    }

    fn active(&self) -> PluginResult<&ActiveRuntime> {
        self.runtime
            .as_ref()
            .ok_or(PluginError::NotRunning { state: self.state })
    }

    fn register(&self, handles: &HostHandles) -> PluginResult<Registration> {
        let params = ComponentParams::embedded(&handles.server);
        let component = self
            .factory
            .create(&params)
            .map_err(|source| PluginError::ComponentBuild { source })?;
        handles
            .components
            .add_component(params.subdomain, Arc::clone(&component))
            .map_err(|source| PluginError::Registration {
                subdomain: params.subdomain,
                source,
            })?;
        info!(component = component.name(), "component registered");
        Ok(Registration {
            manager: Arc::clone(&handles.components),
            component,
            subdomain: params.subdomain,
        })
    }
}

fn install_logging(handles: &HostHandles) {
    let level = handles.properties.property(LOG_LEVEL_PROPERTY);
    let format = handles.properties.property(LOG_FORMAT_PROPERTY);
    let config = LoggingConfig::from_overrides(level.as_deref(), format.as_deref());
    if let Err(err) = init_logging(&config) {
        debug!(error = %err, "host already installed a subscriber; keeping it");
    }
}

fn seed_store(store: &PortConfigStore, handles: &HostHandles) {
    for setting in &SETTINGS {
        let host_value = handles.properties.property(setting.host_key);
        match store.seed(setting, host_value.as_deref()) {
            Ok(WriteOutcome::IgnoredOutOfRange) => {
                debug!(setting = %setting.name, "host value out of range; keeping stored value");
            }
            Ok(_) => {}
            Err(err) => {
                warn!(setting = %setting.name, error = %err, "host value rejected while seeding");
            }
        }
    }
}
