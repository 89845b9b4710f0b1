//! Contracts consumed from the host server.
//!
//! # Design
//! - The host is a black box reached through small traits so the lifecycle
//!   controller can be driven by test doubles.
//! - `HostHandles` bundles everything `initialize` needs; nothing is looked up
//!   through process-wide globals except the default library search path.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use vbridge_config::ConfigBackend;
use vbridge_events::PropertyDispatcher;
use vbridge_natives::LibrarySearchPath;

use crate::component::ComponentParams;
use crate::error::ComponentError;

/// Identity of the hosting XMPP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Host name of the server machine.
    pub hostname: String,
    /// XMPP domain served by the host.
    pub xmpp_domain: String,
}

/// The wrapped bridge service as seen by the host.
pub trait BridgeComponent: Send + Sync + fmt::Debug {
    /// Human-readable component name.
    fn name(&self) -> &str;
}

/// The host's addressable-component namespace.
pub trait ComponentManager: Send + Sync {
    /// Attach `component` under `subdomain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the registration.
    fn add_component(
        &self,
        subdomain: &str,
        component: Arc<dyn BridgeComponent>,
    ) -> Result<(), ComponentError>;

    /// Detach whatever is registered under `subdomain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the removal.
    fn remove_component(&self, subdomain: &str) -> Result<(), ComponentError>;
}

/// Builds the bridge component once its parameters are known.
pub trait ComponentFactory: Send + Sync {
    /// Construct a component from `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the component cannot be built.
    fn create(&self, params: &ComponentParams) -> Result<Arc<dyn BridgeComponent>, ComponentError>;
}

/// Read access to the host's administrator-editable properties.
pub trait HostProperties: Send + Sync {
    /// Raw value of `key`, if set.
    fn property(&self, key: &str) -> Option<String>;
}

impl HostProperties for BTreeMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl HostProperties for HashMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Everything the host hands the plugin at initialization.
#[derive(Clone)]
pub struct HostHandles {
    /// Server identity used for component parameters.
    pub server: ServerInfo,
    /// Component namespace the bridge registers into.
    pub components: Arc<dyn ComponentManager>,
    /// Host properties seeding the configuration store.
    pub properties: Arc<dyn HostProperties>,
    /// Property-change notification hub.
    pub dispatcher: PropertyDispatcher,
    /// Configuration backend read by the bridge.
    pub backend: Arc<dyn ConfigBackend>,
    /// Location of the plugin binary; native archives sit next to it.
    pub plugin_binary: PathBuf,
    /// Search path updated once native libraries are in place.
    pub search_path: Arc<LibrarySearchPath>,
}

impl fmt::Debug for HostHandles {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HostHandles")
            .field("server", &self.server)
            .field("dispatcher", &self.dispatcher)
            .field("plugin_binary", &self.plugin_binary)
            .finish_non_exhaustive()
    }
}

impl HostHandles {
    /// Handles using the process-wide library search path.
    #[must_use]
    pub fn new(
        server: ServerInfo,
        components: Arc<dyn ComponentManager>,
        properties: Arc<dyn HostProperties>,
        dispatcher: PropertyDispatcher,
        backend: Arc<dyn ConfigBackend>,
        plugin_binary: impl Into<PathBuf>,
    ) -> Self {
        Self {
            server,
            components,
            properties,
            dispatcher,
            backend,
            plugin_binary: plugin_binary.into(),
            search_path: LibrarySearchPath::global(),
        }
    }

    /// Replace the library search path.
    #[must_use]
    pub fn with_search_path(mut self, search_path: Arc<LibrarySearchPath>) -> Self {
        self.search_path = search_path;
        self
    }
}
