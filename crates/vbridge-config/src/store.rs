//! Typed accessor over the configuration backend.
//!
//! # Design
//! - Every read goes through the backend; nothing is cached here.
//! - A write is a single backend call issued after validation, so concurrent
//!   writers never interleave a read-modify-write.
//! - Out-of-range writes are dropped without an error. Callers that need to
//!   know can inspect [`WriteOutcome::IgnoredOutOfRange`].

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::backend::ConfigBackend;
use crate::defaults::{
    DISABLE_TCP_DEFAULT, MAX_PORT_DEFAULT, MIN_PORT_DEFAULT, SINGLE_PORT_DEFAULT, TCP_PORT_UNSET,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{DISABLE_TCP, MAX_PORT, MIN_PORT, SINGLE_PORT, Setting, SettingKind, TCP_PORT};
use crate::snapshot::RuntimeValues;
use crate::validate::{parse_flag, parse_port};

/// Result of a validated write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was written to the backend.
    Applied,
    /// The value parsed but fell outside the valid range; nothing was written.
    IgnoredOutOfRange,
    /// No value was supplied; nothing was written.
    Skipped,
}

/// Port and transport settings stored in the bridge's configuration backend.
#[derive(Clone)]
pub struct PortConfigStore {
    backend: Arc<dyn ConfigBackend>,
}

impl fmt::Debug for PortConfigStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PortConfigStore")
            .field("values", &self.current())
            .finish()
    }
}

impl PortConfigStore {
    /// Wrap a backend handle.
    #[must_use]
    pub fn new(backend: Arc<dyn ConfigBackend>) -> Self {
        Self { backend }
    }

    /// UDP port used for multiplexing media streams.
    ///
    /// This is the configured value, which may differ from the one in effect
    /// until the bridge restarts.
    #[must_use]
    pub fn single_port(&self) -> i32 {
        self.backend.get_int(SINGLE_PORT.store_key, SINGLE_PORT_DEFAULT)
    }

    /// Lower bound of the fallback UDP port range.
    #[must_use]
    pub fn min_port(&self) -> i32 {
        self.backend.get_int(MIN_PORT.store_key, MIN_PORT_DEFAULT)
    }

    /// Upper bound of the fallback UDP port range.
    #[must_use]
    pub fn max_port(&self) -> i32 {
        self.backend.get_int(MAX_PORT.store_key, MAX_PORT_DEFAULT)
    }

    /// Whether RTP over TCP is allowed. The backend stores a "disable" flag.
    #[must_use]
    pub fn is_tcp_enabled(&self) -> bool {
        !self.backend.get_bool(DISABLE_TCP.store_key, DISABLE_TCP_DEFAULT)
    }

    /// TCP port for RTP over TCP, or `None` when the bridge picks its default.
    #[must_use]
    pub fn tcp_port(&self) -> Option<i32> {
        let value = self.backend.get_int(TCP_PORT.store_key, TCP_PORT_UNSET);
        (value != TCP_PORT_UNSET).then_some(value)
    }

    /// Read all settings at once.
    #[must_use]
    pub fn current(&self) -> RuntimeValues {
        RuntimeValues {
            single_port: self.single_port(),
            min_port: self.min_port(),
            max_port: self.max_port(),
            tcp_enabled: self.is_tcp_enabled(),
            tcp_port: self.tcp_port(),
        }
    }

    /// Validate `raw` and write it to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFormat`] when `raw` does not parse; the
    /// stored value is left untouched.
    pub fn set(&self, setting: &Setting, raw: &str) -> ConfigResult<WriteOutcome> {
        let rendered = match setting.kind {
            SettingKind::Port { .. } | SettingKind::OptionalPort { .. } => {
                match parse_port(setting, raw) {
                    Ok(port) => port.to_string(),
                    Err(ConfigError::OutOfRange { value, .. }) => {
                        debug!(setting = %setting.name, value, "ignoring out-of-range port");
                        return Ok(WriteOutcome::IgnoredOutOfRange);
                    }
                    Err(err) => return Err(err),
                }
            }
            SettingKind::Flag { .. } => parse_flag(setting, raw)?.to_string(),
        };

        self.backend.set_property(setting.store_key, &rendered);
        Ok(WriteOutcome::Applied)
    }

    /// Reset the setting to its default value in the backend.
    pub fn delete(&self, setting: &Setting) {
        self.backend
            .set_property(setting.store_key, &setting.default_raw());
    }

    /// Seed a setting from the value the host exposes.
    ///
    /// Port settings with a default take the host value when it parses and the
    /// default otherwise. Optional ports and flags are only written when the
    /// host supplies a value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFormat`] when an optional port or flag is
    /// present on the host but does not parse.
    pub fn seed(&self, setting: &Setting, host_value: Option<&str>) -> ConfigResult<WriteOutcome> {
        match (setting.kind, host_value) {
            (SettingKind::Port { default }, value) => {
                let port = value
                    .and_then(|raw| raw.trim().parse::<i32>().ok())
                    .unwrap_or(default);
                self.set(setting, &port.to_string())
            }
            (_, Some(raw)) => self.set(setting, raw),
            (_, None) => Ok(WriteOutcome::Skipped),
        }
    }
}
