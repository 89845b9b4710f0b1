//! Logging initialisation primitives.
//!
//! # Design
//! - Centralises logging setup (fmt or JSON) with a single entry point.
//! - Tolerates hosts that already installed a subscriber: the caller decides
//!   whether a [`TelemetryError::SubscriberInstall`] is fatal.

use once_cell::sync::OnceCell;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for example,
/// because the host process already set one globally).
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    // First caller wins; later installs keep the recorded SHA.
    let _ = BUILD_SHA.set(config.build_sha.to_string());

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(fmt::layer().with_target(false).with_thread_ids(false))
            .try_init(),
    }
    .map_err(|source| TelemetryError::SubscriberInstall { source })?;

    debug!(
        level = config.level,
        format = ?config.format,
        build_sha = config.build_sha,
        "tracing subscriber installed"
    );
    Ok(())
}

/// Access the build SHA recorded during logging initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `info`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
    /// Build identifier recorded in structured logs.
    pub build_sha: &'a str,
}

impl<'a> LoggingConfig<'a> {
    /// Build a configuration from optional level and format overrides.
    ///
    /// Blank values fall back to the defaults.
    #[must_use]
    pub fn from_overrides(level: Option<&'a str>, format: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            level: level
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.level),
            format: format.map_or(defaults.format, LogFormat::parse_lossy),
            build_sha: defaults.build_sha,
        }
    }
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: build_sha(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable, pretty-printed logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Map a configured format name, falling back to [`LogFormat::infer`].
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::infer(),
        }
    }
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lossy_maps_known_formats() {
        assert_eq!(LogFormat::parse_lossy("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse_lossy(" Pretty "), LogFormat::Pretty);
        assert_eq!(LogFormat::parse_lossy("unknown"), LogFormat::infer());
    }

    #[test]
    fn from_overrides_falls_back_to_defaults() {
        let config = LoggingConfig::from_overrides(None, None);
        assert_eq!(config.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.format, LogFormat::infer());

        let blank = LoggingConfig::from_overrides(Some("  "), Some("json"));
        assert_eq!(blank.level, DEFAULT_LOG_LEVEL);
        assert_eq!(blank.format, LogFormat::Json);

        let custom = LoggingConfig::from_overrides(Some("debug"), Some("pretty"));
        assert_eq!(custom.level, "debug");
        assert_eq!(custom.format, LogFormat::Pretty);
    }

    #[test]
    fn init_logging_installs_subscriber_once() {
        let config = LoggingConfig {
            level: "info",
            format: LogFormat::Pretty,
            build_sha: "dev",
        };
        let _ = init_logging(&config);
        assert!(tracing::dispatcher::has_been_set());
        assert!(init_logging(&config).is_err());
    }
}
