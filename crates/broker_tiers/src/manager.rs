//! The Tier Manager: authoritative mirror of observers, entities, and radar
//! hints; produces per-observer tier buckets.

use std::collections::HashMap;

use parking_lot::RwLock;

use broker_model::{EntitySnapshot, InterestTier, ObserverState, RadarFrame, TierAssignment, WorldSnapshot};
use broker_spatial::ArcChunkIndex;

use crate::buckets::TierBuckets;
use crate::config::TierManagerConfig;

struct State {
    observers: HashMap<String, ObserverState>,
    entities: HashMap<String, EntitySnapshot>,
    radar_hints: HashMap<String, InterestTier>,
    buckets: HashMap<String, TierBuckets>,
}

impl State {
    fn new() -> Self {
        Self {
            observers: HashMap::new(),
            entities: HashMap::new(),
            radar_hints: HashMap::new(),
            buckets: HashMap::new(),
        }
    }
}

/// The authoritative per-broker mirror of observer, entity, and hint state.
///
/// Guarded by a single reader/writer lock (§5): writers recompute inline
/// under the write lock; readers return deep clones so callers never hold a
/// reference into internal state. The arc-chunk index has its own lock;
/// when a recompute touches it, the lock order is always manager-first,
/// index-second.
pub struct TierManager {
    config: TierManagerConfig,
    index: ArcChunkIndex,
    state: RwLock<State>,
}

impl TierManager {
    #[must_use]
    pub fn new(config: TierManagerConfig) -> Self {
        let config = config.normalized();
        Self {
            index: ArcChunkIndex::new(config.arc_chunk_degrees),
            config,
            state: RwLock::new(State::new()),
        }
    }

    /// Store a deep clone of `observer` under `key`, defaulting
    /// `observer_id` to `key` if empty, then recompute that observer's
    /// buckets. A no-op if `key` is empty.
    pub fn update_observer(&self, key: &str, mut observer: ObserverState) {
        if key.is_empty() {
            return;
        }
        if observer.observer_id.is_empty() {
            observer.observer_id = key.to_string();
        }

        let mut state = self.state.write();
        let first_seen = !state.observers.contains_key(key);
        state.observers.insert(key.to_string(), observer);
        self.recompute_one_locked(&mut state, key);
        if first_seen {
            tracing::info!(observer_key = key, "observer attached");
        }
    }

    /// Drop `key`'s observer entry and cached buckets. A no-op if absent.
    pub fn remove_observer(&self, key: &str) {
        let mut state = self.state.write();
        if state.observers.remove(key).is_some() {
            tracing::info!(observer_key = key, "observer detached");
        }
        state.buckets.remove(key);
    }

    /// Store a deep clone of `snapshot`, index it spatially, and recompute
    /// every observer. A no-op if `entity_id` is empty.
    pub fn update_entity(&self, snapshot: EntitySnapshot) {
        if !snapshot.is_valid() {
            return;
        }
        let mut state = self.state.write();
        self.index.update(&snapshot.entity_id, snapshot.position);
        state.entities.insert(snapshot.entity_id.clone(), snapshot);
        self.recompute_all_locked(&mut state);
    }

    /// Drop `entity_id` from the authoritative map, the spatial index, and
    /// every observer's buckets.
    pub fn remove_entity(&self, entity_id: &str) {
        if entity_id.is_empty() {
            return;
        }
        let mut state = self.state.write();
        state.entities.remove(entity_id);
        state.radar_hints.remove(entity_id);
        self.index.remove(entity_id);
        self.recompute_all_locked(&mut state);
    }

    /// Fold every `(target_entity_id, suggested_tier)` pair in `frame` into
    /// the radar-hint map (`UNSPECIFIED` entries are ignored), then
    /// recompute every observer.
    pub fn apply_radar_frame(&self, frame: &RadarFrame) {
        let mut state = self.state.write();
        for (target_entity_id, suggested_tier) in frame.overrides() {
            if target_entity_id.is_empty() {
                continue;
            }
            state
                .radar_hints
                .insert(target_entity_id.to_string(), suggested_tier);
        }
        self.recompute_all_locked(&mut state);
    }

    /// Bulk-ingest every entity in `snapshot` (each as if individually
    /// updated via [`Self::update_entity`]), then recompute once. Entities
    /// absent from `snapshot` are left untouched — this is an upsert, not a
    /// replace; only [`Self::remove_entity`] evicts.
    pub fn ingest_world_snapshot(&self, snapshot: &WorldSnapshot) {
        let mut state = self.state.write();
        for entity in &snapshot.entities {
            if !entity.is_valid() {
                continue;
            }
            self.index.update(&entity.entity_id, entity.position);
            state.entities.insert(entity.entity_id.clone(), entity.clone());
        }
        self.recompute_all_locked(&mut state);
    }

    /// A deep clone of `observer_key`'s cached tier buckets, or an empty
    /// set if the observer is unknown.
    #[must_use]
    pub fn buckets(&self, observer_key: &str) -> TierBuckets {
        self.state
            .read()
            .buckets
            .get(observer_key)
            .cloned()
            .unwrap_or_default()
    }

    /// Materialize a [`TierAssignment`] for every `(observer, entity)` pair
    /// currently classified, across all observers. Diagnostic use only —
    /// the Budget Planner computes its own assignments during selection.
    #[must_use]
    pub fn tier_assignments(&self, now_ms: i64) -> Vec<TierAssignment> {
        let state = self.state.read();
        let mut keys: Vec<&String> = state.observers.keys().collect();
        keys.sort();

        let mut out = Vec::new();
        for key in keys {
            let Some(buckets) = state.buckets.get(key) else {
                continue;
            };
            let observer_id = state.observers[key].effective_observer_id(key).to_string();
            for tier in broker_model::PRIORITY_ORDER {
                for entity_id in buckets.entities_in(tier) {
                    out.push(TierAssignment {
                        schema_version: String::new(),
                        observer_id: observer_id.clone(),
                        entity_id: entity_id.clone(),
                        tier,
                        computed_at_ms: now_ms,
                    });
                }
            }
        }
        out
    }

    fn recompute_all_locked(&self, state: &mut State) {
        let mut keys: Vec<String> = state.observers.keys().cloned().collect();
        keys.sort();
        for key in keys {
            self.recompute_one_locked(state, &key);
        }
    }

    fn recompute_one_locked(&self, state: &mut State, key: &str) {
        let Some(observer) = state.observers.get(key).cloned() else {
            state.buckets.remove(key);
            return;
        };

        let mut candidates = self.index.entities_near(observer.position, self.config.chunk_radius);
        if candidates.is_empty() && !state.entities.is_empty() {
            tracing::debug!(
                observer_key = key,
                "arc-chunk index returned no candidates, falling back to every tracked entity"
            );
            candidates = state.entities.keys().cloned().collect();
            candidates.sort();
        }

        let mut buckets = TierBuckets::default();
        for entity_id in candidates {
            let Some(entity) = state.entities.get(&entity_id) else {
                continue;
            };
            let hint = state.radar_hints.get(&entity_id).copied();
            let tier = self.classify(&observer, entity, hint);
            buckets.push(tier, entity_id);
        }
        tracing::trace!(observer_key = key, entities = buckets.len(), "recomputed tier buckets");
        state.buckets.insert(key.to_string(), buckets);
    }

    fn classify(&self, observer: &ObserverState, entity: &EntitySnapshot, hint: Option<InterestTier>) -> InterestTier {
        if entity.entity_id == observer.observer_id {
            return InterestTier::SelfTier;
        }
        if !entity.active {
            // Inactive entities are always PASSIVE; a radar hint never
            // promotes a contact that isn't actually live.
            return InterestTier::Passive;
        }

        let computed = self.classify_by_distance(observer, entity);
        match hint {
            Some(hinted) if hinted.is_stronger_than(computed) => hinted,
            _ => computed,
        }
    }

    fn classify_by_distance(&self, observer: &ObserverState, entity: &EntitySnapshot) -> InterestTier {
        let distance = match (observer.position, entity.position) {
            (Some(a), Some(b)) => a.distance(b),
            _ => f64::INFINITY,
        };

        let nearby_range = if observer.nearby_range_m > 0.0 {
            observer.nearby_range_m
        } else {
            self.config.nearby_range_m
        };
        let radar_range = if observer.radar_range_m > 0.0 {
            observer.radar_range_m
        } else {
            self.config.radar_range_m
        }
        .max(nearby_range);
        let extended_range = self.config.extended_range_m.max(radar_range);

        if distance <= nearby_range {
            InterestTier::Nearby
        } else if distance <= radar_range {
            InterestTier::Radar
        } else if distance <= extended_range {
            InterestTier::Extended
        } else {
            InterestTier::Passive
        }
    }
}
