//! Mapping from the running target to a native archive flavour.

use std::fmt;

/// Operating system and word size combinations that ship native archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// 32-bit Linux.
    Linux32,
    /// 64-bit Linux.
    Linux64,
    /// 32-bit Windows.
    Windows32,
    /// 64-bit Windows.
    Windows64,
    /// macOS (single universal archive).
    MacOsX,
}

impl Platform {
    /// Platform of the running process, if a native archive exists for it.
    #[must_use]
    pub fn detect() -> Option<Self> {
        Self::from_target(std::env::consts::OS, usize::BITS)
    }

    /// Map an OS name (as in [`std::env::consts::OS`]) and pointer width.
    #[must_use]
    pub fn from_target(os: &str, pointer_width: u32) -> Option<Self> {
        match (os, pointer_width) {
            ("linux", 32) => Some(Self::Linux32),
            ("linux", 64) => Some(Self::Linux64),
            ("windows", 32) => Some(Self::Windows32),
            ("windows", 64) => Some(Self::Windows64),
            ("macos", _) => Some(Self::MacOsX),
            _ => None,
        }
    }

    /// Suffix inserted after the binary's stem to name the archive.
    #[must_use]
    pub const fn archive_suffix(self) -> &'static str {
        match self {
            Self::Linux32 => "-native-linux-32",
            Self::Linux64 => "-native-linux-64",
            Self::Windows32 => "-native-windows-32",
            Self::Windows64 => "-native-windows-64",
            Self::MacOsX => "-native-macosx",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.archive_suffix().trim_start_matches("-native-"))
    }
}
