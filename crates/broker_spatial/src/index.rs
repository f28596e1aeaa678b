//! Angular-bucket spatial index.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use broker_geometry::Vector3;

/// Default arc width in degrees, used whenever a configured value falls
/// outside `(0, 360)`.
pub const DEFAULT_ARC_DEGREES: f64 = 15.0;

/// The bucket an entity was assigned to: a numbered angular chunk, or the
/// distinguished "global" bucket for entities with no known position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Chunk(usize),
    Global,
}

struct IndexState {
    /// Entities with no known position. Always included in every query.
    global: BTreeSet<String>,
    /// Entities grouped by angular chunk index.
    chunks: HashMap<usize, BTreeSet<String>>,
    /// Reverse map for O(1) removal / atomic reassignment.
    assignments: HashMap<String, Bucket>,
}

impl IndexState {
    fn new() -> Self {
        Self {
            global: BTreeSet::new(),
            chunks: HashMap::new(),
            assignments: HashMap::new(),
        }
    }

    fn remove_locked(&mut self, entity_id: &str) {
        if let Some(bucket) = self.assignments.remove(entity_id) {
            match bucket {
                Bucket::Global => {
                    self.global.remove(entity_id);
                }
                Bucket::Chunk(chunk) => {
                    if let Some(set) = self.chunks.get_mut(&chunk) {
                        set.remove(entity_id);
                        if set.is_empty() {
                            self.chunks.remove(&chunk);
                        }
                    }
                }
            }
        }
    }
}

/// A polar spatial index over the horizontal plane.
///
/// Reads and writes are guarded by a single reader/writer lock: queries
/// always observe a consistent snapshot, never a torn update.
pub struct ArcChunkIndex {
    arc_radians: f64,
    chunk_count: usize,
    state: RwLock<IndexState>,
}

impl ArcChunkIndex {
    /// Create a new index. `arc_degrees` outside `(0, 360)` falls back to
    /// [`DEFAULT_ARC_DEGREES`].
    #[must_use]
    pub fn new(arc_degrees: f64) -> Self {
        let arc_degrees = normalize_arc_degrees(arc_degrees);
        let arc_radians = arc_degrees.to_radians();
        let chunk_count = chunk_count_for(arc_radians);
        tracing::debug!(arc_degrees, chunk_count, "arc-chunk index initialized");
        Self {
            arc_radians,
            chunk_count,
            state: RwLock::new(IndexState::new()),
        }
    }

    /// The number of angular chunks, always `>= 1`.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Assign `entity_id` to the chunk containing `position` (or the global
    /// bucket if `position` is `None`), atomically removing any prior
    /// assignment first. A no-op (returns `None`) if `entity_id` is empty.
    pub fn update(&self, entity_id: &str, position: Option<Vector3>) -> Option<Bucket> {
        if entity_id.is_empty() {
            return None;
        }

        let bucket = match position {
            None => Bucket::Global,
            Some(pos) => Bucket::Chunk(self.chunk_for(pos)),
        };

        let mut state = self.state.write();
        state.remove_locked(entity_id);
        match bucket {
            Bucket::Global => {
                state.global.insert(entity_id.to_string());
            }
            Bucket::Chunk(chunk) => {
                state
                    .chunks
                    .entry(chunk)
                    .or_default()
                    .insert(entity_id.to_string());
            }
        }
        state.assignments.insert(entity_id.to_string(), bucket);
        Some(bucket)
    }

    /// Remove `entity_id` from its bucket and the reverse map. Idempotent.
    pub fn remove(&self, entity_id: &str) {
        if entity_id.is_empty() {
            return;
        }
        self.state.write().remove_locked(entity_id);
    }

    /// The deduplicated, lexicographically sorted set of entity ids within
    /// `radius` chunks of `position`'s chunk, plus the global bucket
    /// (always included). If `radius < 0` or `position` is `None`, every
    /// tracked id is returned.
    #[must_use]
    pub fn entities_near(&self, position: Option<Vector3>, radius: i64) -> Vec<String> {
        let state = self.state.read();

        if radius < 0 || position.is_none() {
            let mut all: BTreeSet<String> = state.global.clone();
            for set in state.chunks.values() {
                all.extend(set.iter().cloned());
            }
            return all.into_iter().collect();
        }

        let position = position.expect("checked above");
        let center = self.chunk_for(position);
        let mut result: BTreeSet<String> = state.global.clone();

        let span = radius.min(self.chunk_count as i64);
        for offset in -span..=span {
            let chunk = wrap_chunk(center, offset, self.chunk_count);
            if let Some(set) = state.chunks.get(&chunk) {
                result.extend(set.iter().cloned());
            }
        }

        result.into_iter().collect()
    }

    fn chunk_for(&self, position: Vector3) -> usize {
        let angle = position.horizontal_angle();
        let raw = (angle / self.arc_radians).floor() as i64;
        raw.clamp(0, self.chunk_count as i64 - 1) as usize
    }
}

fn normalize_arc_degrees(arc_degrees: f64) -> f64 {
    if arc_degrees > 0.0 && arc_degrees < 360.0 {
        arc_degrees
    } else {
        DEFAULT_ARC_DEGREES
    }
}

fn chunk_count_for(arc_radians: f64) -> usize {
    let count = (std::f64::consts::TAU / arc_radians).ceil();
    (count as usize).max(1)
}

fn wrap_chunk(center: usize, offset: i64, chunk_count: usize) -> usize {
    let chunk_count = chunk_count as i64;
    let raw = (center as i64 + offset).rem_euclid(chunk_count);
    raw as usize
}
