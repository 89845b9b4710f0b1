#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Host plugin wrapping the videobridge.
//!
//! Layout: `host.rs` (host contracts), `component.rs` (component parameters),
//! `listener.rs` (property change listener), `lifecycle.rs` (`BridgePlugin`),
//! `status.rs` (administrative status), `error.rs` (`PluginError`).

pub mod component;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod listener;
pub mod status;

pub use component::{BundleConfig, ComponentParams, SUBDOMAIN};
pub use error::{ComponentError, PluginError, PluginResult};
pub use host::{
    BridgeComponent, ComponentFactory, ComponentManager, HostHandles, HostProperties, ServerInfo,
};
pub use lifecycle::{BridgePlugin, LOG_FORMAT_PROPERTY, LOG_LEVEL_PROPERTY, LifecycleState};
pub use listener::{Handled, PropertyChangeListener};
pub use status::PluginStatus;
