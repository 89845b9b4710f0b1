//! Default values applied when the backend holds no usable value.
//!
//! # Design
//! - Keep the bridge's own defaults in one place so store reads, deletes and
//!   host seeding agree.

use std::ops::RangeInclusive;

/// UDP port used when multiplexing media streams over a single port.
pub const SINGLE_PORT_DEFAULT: i32 = 10_000;
/// Lower bound of the dynamically allocated UDP port range.
pub const MIN_PORT_DEFAULT: i32 = 10_001;
/// Upper bound of the dynamically allocated UDP port range.
pub const MAX_PORT_DEFAULT: i32 = 20_000;
/// TCP connectivity is enabled unless explicitly disabled.
pub const DISABLE_TCP_DEFAULT: bool = false;
/// Backend sentinel meaning "no TCP port configured".
pub const TCP_PORT_UNSET: i32 = -1;
/// Port numbers accepted for any port setting.
pub const PORT_RANGE: RangeInclusive<i32> = 1..=65_535;
