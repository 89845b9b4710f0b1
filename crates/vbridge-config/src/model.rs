//! Statically enumerated settings shared between the host and the bridge.
//!
//! # Design
//! - Every setting carries two keys: the one the host exposes to
//!   administrators and the one the bridge's configuration backend reads.
//! - Keys are stable identifiers and must not change between releases.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::defaults::{
    DISABLE_TCP_DEFAULT, MAX_PORT_DEFAULT, MIN_PORT_DEFAULT, PORT_RANGE, SINGLE_PORT_DEFAULT,
    TCP_PORT_UNSET,
};

/// Identifier for each managed setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingName {
    /// Single UDP port used for multiplexed media.
    SinglePort,
    /// Lower bound of the dynamic UDP port range.
    MinPort,
    /// Upper bound of the dynamic UDP port range.
    MaxPort,
    /// Flag disabling the TCP harvester.
    DisableTcp,
    /// TCP harvester port, unset by default.
    TcpPort,
}

impl SettingName {
    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SinglePort => "single_port",
            Self::MinPort => "min_port",
            Self::MaxPort => "max_port",
            Self::DisableTcp => "disable_tcp",
            Self::TcpPort => "tcp_port",
        }
    }
}

impl fmt::Display for SettingName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Value shape of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// Port number with a concrete default.
    Port {
        /// Value reported when the backend holds nothing usable.
        default: i32,
    },
    /// Port number that may be unset; the backend stores a sentinel.
    OptionalPort {
        /// Backend value meaning "unset".
        unset: i32,
    },
    /// Boolean flag.
    Flag {
        /// Value reported when the backend holds nothing usable.
        default: bool,
    },
}

/// A named, typed, bounded configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    /// Identifier used in logs and status output.
    pub name: SettingName,
    /// Property key exposed by the host server.
    pub host_key: &'static str,
    /// Property key read by the bridge's configuration backend.
    pub store_key: &'static str,
    /// Value shape and default.
    pub kind: SettingKind,
}

impl Setting {
    /// Range accepted by writes, or `None` for flags.
    #[must_use]
    pub const fn valid_range(&self) -> Option<RangeInclusive<i32>> {
        match self.kind {
            SettingKind::Port { .. } | SettingKind::OptionalPort { .. } => Some(PORT_RANGE),
            SettingKind::Flag { .. } => None,
        }
    }

    /// Default rendered in the backend's native string form.
    #[must_use]
    pub fn default_raw(&self) -> String {
        match self.kind {
            SettingKind::Port { default } => default.to_string(),
            SettingKind::OptionalPort { unset } => unset.to_string(),
            SettingKind::Flag { default } => default.to_string(),
        }
    }

    /// Look up a setting by the key the host notifies about.
    #[must_use]
    pub fn by_host_key(key: &str) -> Option<&'static Self> {
        SETTINGS.iter().find(|setting| setting.host_key == key)
    }

    /// Look up a setting by name.
    #[must_use]
    pub fn by_name(name: SettingName) -> &'static Self {
        match name {
            SettingName::SinglePort => &SINGLE_PORT,
            SettingName::MinPort => &MIN_PORT,
            SettingName::MaxPort => &MAX_PORT,
            SettingName::DisableTcp => &DISABLE_TCP,
            SettingName::TcpPort => &TCP_PORT,
        }
    }
}

/// Single UDP port for multiplexed media streams.
pub const SINGLE_PORT: Setting = Setting {
    name: SettingName::SinglePort,
    host_key: "org.jitsi.videobridge.media.SINGLE_PORT_HARVESTER_PORT",
    store_key: "org.jitsi.videobridge.SINGLE_PORT_HARVESTER_PORT",
    kind: SettingKind::Port {
        default: SINGLE_PORT_DEFAULT,
    },
};

/// Lower bound of the fallback UDP port range.
pub const MIN_PORT: Setting = Setting {
    name: SettingName::MinPort,
    host_key: "org.jitsi.videobridge.media.MIN_PORT_NUMBER",
    store_key: "org.jitsi.service.neomedia.MIN_PORT_NUMBER",
    kind: SettingKind::Port {
        default: MIN_PORT_DEFAULT,
    },
};

/// Upper bound of the fallback UDP port range.
pub const MAX_PORT: Setting = Setting {
    name: SettingName::MaxPort,
    host_key: "org.jitsi.videobridge.media.MAX_PORT_NUMBER",
    store_key: "org.jitsi.service.neomedia.MAX_PORT_NUMBER",
    kind: SettingKind::Port {
        default: MAX_PORT_DEFAULT,
    },
};

/// Flag disabling RTP over TCP.
pub const DISABLE_TCP: Setting = Setting {
    name: SettingName::DisableTcp,
    host_key: "org.jitsi.videobridge.media.DISABLE_TCP_HARVESTER",
    store_key: "org.jitsi.videobridge.DISABLE_TCP_HARVESTER",
    kind: SettingKind::Flag {
        default: DISABLE_TCP_DEFAULT,
    },
};

/// TCP port for RTP over TCP.
pub const TCP_PORT: Setting = Setting {
    name: SettingName::TcpPort,
    host_key: "org.jitsi.videobridge.media.TCP_HARVESTER_PORT",
    store_key: "org.jitsi.videobridge.TCP_HARVESTER_PORT",
    kind: SettingKind::OptionalPort {
        unset: TCP_PORT_UNSET,
    },
};

/// All managed settings, in reporting order.
pub static SETTINGS: [Setting; 5] = [SINGLE_PORT, MIN_PORT, MAX_PORT, DISABLE_TCP, TCP_PORT];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let host: HashSet<_> = SETTINGS.iter().map(|setting| setting.host_key).collect();
        let store: HashSet<_> = SETTINGS.iter().map(|setting| setting.store_key).collect();
        assert_eq!(host.len(), SETTINGS.len());
        assert_eq!(store.len(), SETTINGS.len());
    }

    #[test]
    fn lookup_by_host_key_and_name_agree() {
        for setting in &SETTINGS {
            assert_eq!(Setting::by_host_key(setting.host_key), Some(setting));
            assert_eq!(Setting::by_name(setting.name), setting);
        }
        assert!(Setting::by_host_key(SINGLE_PORT.store_key).is_none());
        assert!(Setting::by_host_key("xmpp.domain").is_none());
    }

    #[test]
    fn defaults_render_in_native_form() {
        assert_eq!(SINGLE_PORT.default_raw(), "10000");
        assert_eq!(MIN_PORT.default_raw(), "10001");
        assert_eq!(MAX_PORT.default_raw(), "20000");
        assert_eq!(DISABLE_TCP.default_raw(), "false");
        assert_eq!(TCP_PORT.default_raw(), "-1");
        assert!(DISABLE_TCP.valid_range().is_none());
        assert_eq!(TCP_PORT.valid_range(), Some(1..=65_535));
    }
}
