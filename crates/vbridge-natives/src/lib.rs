//! Native resource bootstrap for the videobridge plugin.
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

pub mod bootstrap;
pub mod error;
pub mod platform;
pub mod search_path;

pub use bootstrap::{ARCHIVE_EXTENSION, BootstrapOutcome, NATIVE_DIR_NAME, NativeBootstrapper};
pub use error::{BootstrapError, BootstrapResult};
pub use platform::Platform;
pub use search_path::LibrarySearchPath;
