//! # broker_model
//!
//! Wire-facing value types for the world-state broker: entity snapshots,
//! observer state, interest tiers, and the publication envelope. These are
//! the "nouns" the rest of the workspace operates on — pure data, no
//! behavior beyond small accessors.
//!
//! Every type here is `Clone` and carries a `schema_version` field that is
//! propagated verbatim from producer to consumer (never parsed or
//! validated by this crate).

pub mod entity;
pub mod envelope;
pub mod observer;
pub mod radar;
pub mod tier;

pub use entity::EntitySnapshot;
pub use envelope::{ComponentPriority, SnapshotComponent, WorldSnapshot};
pub use observer::ObserverState;
pub use radar::{RadarContact, RadarEntry, RadarFrame};
pub use tier::{InterestTier, TierAssignment, PRIORITY_ORDER};
