//! Construction parameters for the embedded bridge component.
//!
//! Inside the host the bridge is not an external component, so the port and
//! shared secret it would normally connect with are left empty. The bundle
//! set is fixed before the factory runs.

use crate::host::ServerInfo;

/// Subdomain the bridge is registered under.
pub const SUBDOMAIN: &str = "jitsi-videobridge";

/// Service bundles loaded alongside the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleConfig {
    /// Whether the bridge's REST API is started.
    pub rest_api: bool,
}

impl BundleConfig {
    /// Bundle set used when embedded in the host: everything but the REST API.
    #[must_use]
    pub const fn embedded() -> Self {
        Self { rest_api: false }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Inputs to [`ComponentFactory::create`](crate::host::ComponentFactory::create).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentParams {
    /// Host name of the server machine.
    pub hostname: String,
    /// External component port; unused when embedded.
    pub port: Option<u16>,
    /// XMPP domain served by the host.
    pub domain: String,
    /// Subdomain the component answers on.
    pub subdomain: &'static str,
    /// External component secret; unused when embedded.
    pub secret: Option<String>,
    /// Bundles to load.
    pub bundles: BundleConfig,
}

impl ComponentParams {
    /// Parameters for a bridge embedded in the host described by `server`.
    #[must_use]
    pub fn embedded(server: &ServerInfo) -> Self {
        Self {
            hostname: server.hostname.clone(),
            port: None,
            domain: server.xmpp_domain.clone(),
            subdomain: SUBDOMAIN,
            secret: None,
            bundles: BundleConfig::embedded(),
        }
    }
}
