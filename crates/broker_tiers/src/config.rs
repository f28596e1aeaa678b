//! Tier Manager configuration and range normalization.

/// Broker-wide defaults and spatial-indexing knobs for the Tier Manager.
///
/// Per-observer `nearby_range_m` / `radar_range_m` overrides (see
/// [`broker_model::ObserverState`]) replace the corresponding default when
/// positive; `extended_range_m` has no per-observer override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierManagerConfig {
    pub nearby_range_m: f64,
    pub radar_range_m: f64,
    pub extended_range_m: f64,
    pub arc_chunk_degrees: f64,
    pub chunk_radius: i64,
}

impl TierManagerConfig {
    pub const DEFAULT_NEARBY_RANGE_M: f64 = 600.0;
    pub const DEFAULT_RADAR_RANGE_M: f64 = 3_000.0;
    pub const DEFAULT_EXTENDED_RANGE_M: f64 = 9_000.0;
    pub const DEFAULT_CHUNK_RADIUS: i64 = 3;

    /// Normalize a caller-supplied configuration: non-positive ranges fall
    /// back to defaults, and the three ranges are raised so that
    /// `nearby <= radar <= extended` always holds. A negative chunk radius
    /// is raised to zero; arc-degree validation is delegated to
    /// [`broker_spatial::ArcChunkIndex`].
    #[must_use]
    pub fn normalized(self) -> Self {
        let nearby_range_m = positive_or(self.nearby_range_m, Self::DEFAULT_NEARBY_RANGE_M);
        let radar_range_m =
            positive_or(self.radar_range_m, Self::DEFAULT_RADAR_RANGE_M).max(nearby_range_m);
        let extended_range_m =
            positive_or(self.extended_range_m, Self::DEFAULT_EXTENDED_RANGE_M).max(radar_range_m);
        Self {
            nearby_range_m,
            radar_range_m,
            extended_range_m,
            arc_chunk_degrees: self.arc_chunk_degrees,
            chunk_radius: self.chunk_radius.max(0),
        }
    }
}

impl Default for TierManagerConfig {
    fn default() -> Self {
        Self {
            nearby_range_m: Self::DEFAULT_NEARBY_RANGE_M,
            radar_range_m: Self::DEFAULT_RADAR_RANGE_M,
            extended_range_m: Self::DEFAULT_EXTENDED_RANGE_M,
            arc_chunk_degrees: broker_spatial::DEFAULT_ARC_DEGREES,
            chunk_radius: Self::DEFAULT_CHUNK_RADIUS,
        }
    }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_ranges_fall_back_to_defaults() {
        let config = TierManagerConfig {
            nearby_range_m: 0.0,
            radar_range_m: -1.0,
            extended_range_m: 0.0,
            arc_chunk_degrees: 15.0,
            chunk_radius: 3,
        }
        .normalized();
        assert_eq!(config.nearby_range_m, TierManagerConfig::DEFAULT_NEARBY_RANGE_M);
        assert_eq!(config.radar_range_m, TierManagerConfig::DEFAULT_RADAR_RANGE_M);
        assert_eq!(config.extended_range_m, TierManagerConfig::DEFAULT_EXTENDED_RANGE_M);
    }

    #[test]
    fn test_ranges_raised_to_stay_monotonic() {
        let config = TierManagerConfig {
            nearby_range_m: 10_000.0,
            radar_range_m: 100.0,
            extended_range_m: 200.0,
            arc_chunk_degrees: 15.0,
            chunk_radius: 3,
        }
        .normalized();
        assert!(config.nearby_range_m <= config.radar_range_m);
        assert!(config.radar_range_m <= config.extended_range_m);
    }

    #[test]
    fn test_negative_chunk_radius_raised_to_zero() {
        let config = TierManagerConfig {
            chunk_radius: -5,
            ..TierManagerConfig::default()
        }
        .normalized();
        assert_eq!(config.chunk_radius, 0);
    }
}
