//! Entity snapshot — the per-tick, per-entity state replicated to observers.

use broker_geometry::{Orientation, Vector3};
use serde::{Deserialize, Serialize};

/// An immutable snapshot of one entity's state at a single tick.
///
/// `entity_id` is the stable key across ticks: a later snapshot with the
/// same id entirely replaces the prior one, it does not merge with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub schema_version: String,
    pub entity_id: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub velocity: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub orientation: Option<Orientation>,
    pub speed_mps: f64,
    pub entity_type: String,
    pub radar_cross_section: f64,
    pub tick_id: i64,
    pub keyframe: bool,
    pub captured_at_ms: i64,
}

impl EntitySnapshot {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.entity_id.is_empty()
    }

    /// Clear the `COSMETICS` component (entity type, radar cross-section).
    ///
    /// Never applied to an entity's own `SELF` tier representation by the
    /// budget planner, but this method itself has no notion of tier — the
    /// caller enforces that.
    pub fn strip_cosmetics(&mut self) {
        self.entity_type.clear();
        self.radar_cross_section = 0.0;
    }

    /// Clear the `ORIENTATION` component.
    pub fn strip_orientation(&mut self) {
        self.orientation = None;
    }

    /// Clear the `VELOCITY` component (velocity vector and scalar speed).
    pub fn strip_velocity(&mut self) {
        self.velocity = None;
        self.speed_mps = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntitySnapshot {
        EntitySnapshot {
            schema_version: "1".to_string(),
            entity_id: "bandit-1".to_string(),
            active: true,
            position: Some(Vector3::new(10.0, 20.0, 30.0)),
            velocity: Some(Vector3::new(1.0, 0.0, 0.0)),
            orientation: Some(Orientation::new(90.0, 0.0, 0.0)),
            speed_mps: 250.0,
            entity_type: "f16".to_string(),
            radar_cross_section: 1.5,
            tick_id: 10,
            keyframe: false,
            captured_at_ms: 1_000,
        }
    }

    #[test]
    fn test_is_valid_requires_non_empty_id() {
        let mut e = sample();
        assert!(e.is_valid());
        e.entity_id.clear();
        assert!(!e.is_valid());
    }

    #[test]
    fn test_strip_cosmetics() {
        let mut e = sample();
        e.strip_cosmetics();
        assert!(e.entity_type.is_empty());
        assert_eq!(e.radar_cross_section, 0.0);
        assert!(e.orientation.is_some(), "cosmetics strip must not touch orientation");
    }

    #[test]
    fn test_strip_orientation() {
        let mut e = sample();
        e.strip_orientation();
        assert!(e.orientation.is_none());
    }

    #[test]
    fn test_strip_velocity() {
        let mut e = sample();
        e.strip_velocity();
        assert!(e.velocity.is_none());
        assert_eq!(e.speed_mps, 0.0);
    }

    #[test]
    fn test_binary_roundtrip() {
        let e = sample();
        let bytes = rmp_serde::to_vec_named(&e).unwrap();
        let restored: EntitySnapshot = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(e, restored);
    }

    #[test]
    fn test_textual_suppresses_absent_position() {
        let mut e = sample();
        e.position = None;
        let json = serde_json::to_string(&e).unwrap();
        assert!(!json.contains("\"position\""));
    }
}
