//! The publication envelope and the shed-priority table it carries.

use serde::{Deserialize, Serialize};

use crate::entity::EntitySnapshot;
use crate::tier::TierAssignment;

/// A component of an [`EntitySnapshot`] that can be progressively shed to
/// meet a byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotComponent {
    Radar,
    Cosmetics,
    Orientation,
    Velocity,
    Nearby,
}

impl SnapshotComponent {
    /// Lower sheds first. This is a fixed table, not a computed value — the
    /// shed loop dispatches over it directly rather than over any kind of
    /// reflection on the entity's fields.
    #[must_use]
    pub const fn shed_priority(self) -> u32 {
        match self {
            Self::Radar => 1,
            Self::Cosmetics => 2,
            Self::Orientation => 3,
            Self::Velocity => 4,
            Self::Nearby => 5,
        }
    }

    /// The canonical shed order, lowest priority (sheds first) to highest.
    pub const ORDER: [SnapshotComponent; 5] = [
        Self::Radar,
        Self::Cosmetics,
        Self::Orientation,
        Self::Velocity,
        Self::Nearby,
    ];
}

/// One row of the envelope's `componentPriorities` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPriority {
    pub component: SnapshotComponent,
    pub priority: u32,
}

impl ComponentPriority {
    /// Build the canonical, ordered shed table for a fresh envelope.
    #[must_use]
    pub fn canonical_table() -> Vec<ComponentPriority> {
        SnapshotComponent::ORDER
            .iter()
            .map(|&component| ComponentPriority {
                component,
                priority: component.shed_priority(),
            })
            .collect()
    }
}

/// The unit of publication: one observer's tailored view of the world for
/// one tick.
///
/// `assignments[i]` always describes `entities[i]` — the planner appends
/// both vectors in lockstep, so there is no separate stability contract to
/// maintain beyond "don't reorder one without the other".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub schema_version: String,
    pub captured_at_ms: i64,
    pub tick_id: i64,
    pub keyframe: bool,
    pub entities: Vec<EntitySnapshot>,
    pub assignments: Vec<TierAssignment>,
    pub component_priorities: Vec<ComponentPriority>,
}

impl WorldSnapshot {
    /// Seed a result envelope by cloning the source's metadata and
    /// installing the canonical shed table, leaving `entities` and
    /// `assignments` empty for the planner to populate.
    #[must_use]
    pub fn seed_from(source: &WorldSnapshot) -> Self {
        Self {
            schema_version: source.schema_version.clone(),
            captured_at_ms: source.captured_at_ms,
            tick_id: source.tick_id,
            keyframe: source.keyframe,
            entities: Vec::new(),
            assignments: Vec::new(),
            component_priorities: ComponentPriority::canonical_table(),
        }
    }
}
