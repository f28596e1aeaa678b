//! Interest tiers and the per-observer, per-entity tier assignment.

use serde::{Deserialize, Serialize};

/// The priority class assigned to an entity from one observer's perspective.
///
/// Strict priority order for inclusion is the declaration order below:
/// `SelfTier > Nearby > Radar > Extended > Passive`. `SelfTier` and
/// `Nearby` are *essential* — see [`InterestTier::is_essential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestTier {
    #[serde(rename = "SELF")]
    SelfTier,
    Nearby,
    Radar,
    Extended,
    Passive,
    Unspecified,
}

/// The five tiers in strict priority order, essential tiers first.
/// `Unspecified` is never a computed or hinted tier — it only appears as
/// the "no override" sentinel on an incoming radar entry.
pub const PRIORITY_ORDER: [InterestTier; 5] = [
    InterestTier::SelfTier,
    InterestTier::Nearby,
    InterestTier::Radar,
    InterestTier::Extended,
    InterestTier::Passive,
];

impl InterestTier {
    /// Lower rank means stronger (higher-priority) tier. Used both for
    /// selection order and to decide whether a radar hint upgrades a
    /// distance-computed tier.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::SelfTier => 0,
            Self::Nearby => 1,
            Self::Radar => 2,
            Self::Extended => 3,
            Self::Passive => 4,
            Self::Unspecified => 5,
        }
    }

    /// `SELF` and `NEARBY` are protected from budget-driven drop during
    /// selection (Phase B); they can only be shed as the last-resort
    /// Phase-C step.
    #[must_use]
    pub const fn is_essential(self) -> bool {
        matches!(self, Self::SelfTier | Self::Nearby)
    }

    /// `true` if `self` is a strictly stronger tier than `other`.
    #[must_use]
    pub fn is_stronger_than(self, other: Self) -> bool {
        self.rank() < other.rank()
    }
}

/// Why a given entity was included in an observer's snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAssignment {
    pub schema_version: String,
    pub observer_id: String,
    pub entity_id: String,
    pub tier: InterestTier,
    pub computed_at_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_matches_rank() {
        for pair in PRIORITY_ORDER.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_essential_tiers() {
        assert!(InterestTier::SelfTier.is_essential());
        assert!(InterestTier::Nearby.is_essential());
        assert!(!InterestTier::Radar.is_essential());
        assert!(!InterestTier::Extended.is_essential());
        assert!(!InterestTier::Passive.is_essential());
    }

    #[test]
    fn test_radar_hint_upgrade_comparison() {
        // A hint of RADAR is a stronger tier than a computed EXTENDED.
        assert!(InterestTier::Radar.is_stronger_than(InterestTier::Extended));
        // A hint of PASSIVE never upgrades a computed RADAR.
        assert!(!InterestTier::Passive.is_stronger_than(InterestTier::Radar));
    }

    #[test]
    fn test_self_tier_wire_name_is_self() {
        let json = serde_json::to_string(&InterestTier::SelfTier).unwrap();
        assert_eq!(json, "\"SELF\"");
    }

    #[test]
    fn test_symbolic_wire_names() {
        assert_eq!(serde_json::to_string(&InterestTier::Nearby).unwrap(), "\"NEARBY\"");
        assert_eq!(serde_json::to_string(&InterestTier::Radar).unwrap(), "\"RADAR\"");
        assert_eq!(
            serde_json::to_string(&InterestTier::Extended).unwrap(),
            "\"EXTENDED\""
        );
        assert_eq!(
            serde_json::to_string(&InterestTier::Passive).unwrap(),
            "\"PASSIVE\""
        );
    }

    #[test]
    fn test_assignment_binary_roundtrip() {
        let assignment = TierAssignment {
            schema_version: "1".to_string(),
            observer_id: "pilot-alpha".to_string(),
            entity_id: "bandit-1".to_string(),
            tier: InterestTier::Radar,
            computed_at_ms: 42,
        };
        let bytes = rmp_serde::to_vec_named(&assignment).unwrap();
        let restored: TierAssignment = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(assignment, restored);
    }
}
