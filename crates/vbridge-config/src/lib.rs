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

//! Runtime configuration facade for the videobridge plugin.
//!
//! Layout: `model.rs` (setting table), `backend.rs` (`ConfigBackend` + in-memory
//! store), `validate.rs` (parsing helpers), `store.rs` (`PortConfigStore`),
//! `snapshot.rs` (startup snapshot and restart evaluation).

pub mod backend;
mod defaults;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod store;
mod validate;

pub use backend::{ConfigBackend, MemoryBackend};
pub use defaults::{
    DISABLE_TCP_DEFAULT, MAX_PORT_DEFAULT, MIN_PORT_DEFAULT, PORT_RANGE, SINGLE_PORT_DEFAULT,
    TCP_PORT_UNSET,
};
pub use error::{ConfigError, ConfigResult};
pub use model::{
    DISABLE_TCP, MAX_PORT, MIN_PORT, SETTINGS, SINGLE_PORT, Setting, SettingKind, SettingName,
    TCP_PORT,
};
pub use snapshot::{RestartEvaluator, RuntimeValues, StartupSnapshot};
pub use store::{PortConfigStore, WriteOutcome};
