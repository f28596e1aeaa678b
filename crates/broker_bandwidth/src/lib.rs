//! # broker_bandwidth
//!
//! The Bandwidth Regulator: a per-client token bucket that gates outbound
//! publication bytes. The clock is injectable so refill behavior is
//! deterministically testable.

pub mod clock;
pub mod regulator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use regulator::{BandwidthRegulator, UsageSnapshot, DEFAULT_TARGET_BYTES_PER_SECOND};
