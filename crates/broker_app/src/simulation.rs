//! Synthetic world-state generation for the demo harness.
//!
//! Not a simulation of anything real — deterministic circular motion so the
//! publication pipeline has nontrivial entities to classify and shed
//! without pulling in an RNG dependency or an actual physics source.

use broker_geometry::{Orientation, Vector3};
use broker_model::{ComponentPriority, EntitySnapshot, WorldSnapshot};

const ENTITY_TYPES: [&str; 3] = ["fighter", "tanker", "awacs"];

/// The entity id controlled by observer `index` (observers double as
/// entities, per the cyclic observer/entity design note).
#[must_use]
pub fn observer_entity_id(index: usize) -> String {
    format!("entity-{index}")
}

#[must_use]
pub fn observer_key(index: usize) -> String {
    format!("observer-{index}")
}

/// Build the full world snapshot for `tick_id`: `entity_count` entities in
/// deterministic circular motion around the origin.
#[must_use]
pub fn generate_world_snapshot(tick_id: u64, entity_count: usize, captured_at_ms: i64) -> WorldSnapshot {
    let keyframe = tick_id % 50 == 0;
    let entities = (0..entity_count)
        .map(|index| generate_entity(index, tick_id, keyframe, captured_at_ms))
        .collect();

    WorldSnapshot {
        schema_version: "1".to_string(),
        captured_at_ms,
        tick_id: tick_id as i64,
        keyframe,
        entities,
        assignments: Vec::new(),
        component_priorities: ComponentPriority::canonical_table(),
    }
}

fn generate_entity(index: usize, tick_id: u64, keyframe: bool, captured_at_ms: i64) -> EntitySnapshot {
    let radius = 200.0 + (index as f64) * 750.0;
    let angle = (tick_id as f64) * 0.05 + (index as f64);
    let x = radius * angle.cos();
    let y = radius * angle.sin();

    // Every eleventh entity is periodically inactive, to exercise PASSIVE
    // classification independent of distance.
    let active = !(index % 11 == 0 && tick_id % 20 < 10);

    EntitySnapshot {
        schema_version: "1".to_string(),
        entity_id: observer_entity_id(index),
        active,
        position: Some(Vector3::new(x, y, 0.0)),
        velocity: Some(Vector3::new(-radius * angle.sin() * 0.05, radius * angle.cos() * 0.05, 0.0)),
        orientation: Some(Orientation::new(angle.to_degrees() % 360.0, 0.0, 0.0)),
        speed_mps: radius * 0.05,
        entity_type: ENTITY_TYPES[index % ENTITY_TYPES.len()].to_string(),
        radar_cross_section: 1.0 + (index % 5) as f64,
        tick_id: tick_id as i64,
        keyframe,
        captured_at_ms,
    }
}
