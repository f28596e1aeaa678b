//! Observer state — the pose and range overrides for one connected client.

use broker_geometry::Vector3;
use serde::{Deserialize, Serialize};

/// State for one observer, as reported by the transport on handshake and
/// subsequent pose updates.
///
/// `observer_id` identifies the entity the observer controls, used by the
/// Tier Manager to detect the `SELF` tier by id-equality — no back-pointer
/// to an entity record is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverState {
    pub schema_version: String,
    pub observer_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<Vector3>,
    /// Override for the nearby range, in meters. Non-positive means "use
    /// the broker-wide default".
    pub nearby_range_m: f64,
    /// Override for the radar range, in meters. Non-positive means "use
    /// the broker-wide default".
    pub radar_range_m: f64,
}

impl ObserverState {
    /// Returns the effective `observer_id`, defaulting to `key` when the
    /// reported id is empty (mirrors the Tier Manager's `UpdateObserver`
    /// normalization).
    #[must_use]
    pub fn effective_observer_id<'a>(&'a self, key: &'a str) -> &'a str {
        if self.observer_id.is_empty() {
            key
        } else {
            &self.observer_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_observer_id_falls_back_to_key() {
        let state = ObserverState {
            schema_version: "1".to_string(),
            observer_id: String::new(),
            position: None,
            nearby_range_m: 0.0,
            radar_range_m: 0.0,
        };
        assert_eq!(state.effective_observer_id("conn-7"), "conn-7");
    }

    #[test]
    fn test_effective_observer_id_prefers_explicit_value() {
        let state = ObserverState {
            schema_version: "1".to_string(),
            observer_id: "pilot-alpha".to_string(),
            position: None,
            nearby_range_m: 0.0,
            radar_range_m: 0.0,
        };
        assert_eq!(state.effective_observer_id("conn-7"), "pilot-alpha");
    }

    #[test]
    fn test_binary_roundtrip() {
        let state = ObserverState {
            schema_version: "1".to_string(),
            observer_id: "pilot-alpha".to_string(),
            position: Some(Vector3::new(1.0, 2.0, 3.0)),
            nearby_range_m: 500.0,
            radar_range_m: 2500.0,
        };
        let bytes = rmp_serde::to_vec_named(&state).unwrap();
        let restored: ObserverState = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(state, restored);
    }
}
