//! Parsing helpers for raw setting values.

use crate::error::{ConfigError, ConfigResult};
use crate::model::Setting;

/// Parse a raw port value, enforcing the setting's range.
pub(crate) fn parse_port(setting: &Setting, raw: &str) -> ConfigResult<i32> {
    let port = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| ConfigError::InvalidFormat {
            setting: setting.name,
            value: raw.to_string(),
            expected: "integer",
        })?;

    match setting.valid_range() {
        Some(range) if !range.contains(&port) => Err(ConfigError::OutOfRange {
            setting: setting.name,
            value: port,
        }),
        _ => Ok(port),
    }
}

/// Parse a raw boolean flag (`true`/`false`, case-insensitive).
pub(crate) fn parse_flag(setting: &Setting, raw: &str) -> ConfigResult<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidFormat {
            setting: setting.name,
            value: raw.to_string(),
            expected: "boolean",
        })
    }
}
