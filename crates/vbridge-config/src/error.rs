//! Error types for configuration writes.

use thiserror::Error;

use crate::model::SettingName;

/// Validation failures raised while writing a setting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The raw value could not be parsed into the setting's kind.
    #[error("invalid setting value format")]
    InvalidFormat {
        /// Setting that rejected the value.
        setting: SettingName,
        /// Raw value supplied by the caller.
        value: String,
        /// Kind of value the setting expects.
        expected: &'static str,
    },
    /// The parsed value fell outside the setting's valid range.
    #[error("setting value out of range")]
    OutOfRange {
        /// Setting that rejected the value.
        setting: SettingName,
        /// Parsed value supplied by the caller.
        value: i32,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
