//! Demo broker configuration.
//!
//! Not a file-backed config layer — the broker core takes configuration by
//! value (§9 "Global mutable state"), so this struct is assembled from CLI
//! flags in `main` and passed straight into the component constructors.

use broker_tiers::TierManagerConfig;

/// Configuration for one run of the demo publication harness.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub tier: TierManagerConfig,
    /// Per-observer byte budget. `<= 0` means unlimited.
    pub max_bytes: i64,
    /// Bandwidth regulator target, in bytes per second. `<= 0` falls back
    /// to the regulator's own default.
    pub target_bytes_per_second: f64,
    /// Number of synthetic observers to simulate.
    pub observer_count: usize,
    /// Number of synthetic entities to simulate.
    pub entity_count: usize,
    /// Interval between producer ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Number of ticks to run. `0` means run indefinitely.
    pub max_ticks: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            tier: TierManagerConfig::default(),
            max_bytes: 4_096,
            target_bytes_per_second: broker_bandwidth::DEFAULT_TARGET_BYTES_PER_SECOND,
            observer_count: 3,
            entity_count: 25,
            tick_interval_ms: 100,
            max_ticks: 0,
        }
    }
}

impl BrokerConfig {
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: i64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn with_target_bytes_per_second(mut self, target: f64) -> Self {
        self.target_bytes_per_second = target;
        self
    }

    #[must_use]
    pub fn with_observer_count(mut self, count: usize) -> Self {
        self.observer_count = count;
        self
    }

    #[must_use]
    pub fn with_entity_count(mut self, count: usize) -> Self {
        self.entity_count = count;
        self
    }

    #[must_use]
    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}
