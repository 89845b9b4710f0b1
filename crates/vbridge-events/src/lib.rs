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

//! Property-change notifications from the host server.
//!
//! The host fans every property change out to subscribed listeners on its own
//! threads. Subscriptions are explicit values owned by whoever subscribed, so a
//! listener's lifetime is tied to its owner rather than to process-wide state.

pub mod dispatch;
pub mod payloads;

pub use dispatch::{PropertyDispatcher, PropertyEventListener, Subscription};
pub use payloads::{PropertyEvent, PropertyEventKind, PropertyParams, VALUE_PARAM};
