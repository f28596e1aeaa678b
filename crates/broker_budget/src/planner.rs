//! The Budget Planner: Phase A/B/C/D selection and progressive shedding.

use std::collections::{HashMap, HashSet};

use broker_model::{EntitySnapshot, InterestTier, TierAssignment, WorldSnapshot, PRIORITY_ORDER};
use broker_tiers::TierBuckets;

use crate::result::BudgetResult;

struct Planned {
    tier: InterestTier,
    entity: EntitySnapshot,
    assignment: TierAssignment,
}

/// Shape `source`'s entities for one observer: select by tier priority
/// within `max_bytes`, then progressively shed until the plan fits (or the
/// shed table is exhausted).
///
/// `max_bytes <= 0` means unlimited. `buckets` supplies the tier
/// classification for `observer_id` (lexicographically ordered within each
/// tier, per [`broker_tiers::TierManager`]); `source` supplies both the
/// envelope metadata and the entity data to look up by id.
#[must_use]
pub fn plan(
    observer_id: &str,
    source: &WorldSnapshot,
    buckets: &TierBuckets,
    max_bytes: i64,
    now_ms: i64,
) -> BudgetResult {
    let max_bytes: usize = if max_bytes <= 0 { usize::MAX } else { max_bytes as usize };

    // Phase A: seed.
    let seed = WorldSnapshot::seed_from(source);
    let mut bytes_used = broker_codec::encoded_size(&seed);
    let mut bytes_by_tier: HashMap<InterestTier, usize> = HashMap::new();
    let mut dropped: HashMap<InterestTier, usize> = HashMap::new();
    let mut exhausted = false;

    let entity_lookup: HashMap<&str, &EntitySnapshot> = source
        .entities
        .iter()
        .map(|entity| (entity.entity_id.as_str(), entity))
        .collect();

    // Phase B: tier-priority selection.
    let mut included: HashSet<String> = HashSet::new();
    let mut planned: Vec<Planned> = Vec::new();

    for tier in PRIORITY_ORDER {
        for entity_id in buckets.entities_in(tier) {
            if entity_id.is_empty() || included.contains(entity_id) {
                continue;
            }
            let Some(entity) = entity_lookup.get(entity_id.as_str()) else {
                continue;
            };
            let entity = (*entity).clone();
            let assignment = TierAssignment {
                schema_version: source.schema_version.clone(),
                observer_id: observer_id.to_string(),
                entity_id: entity_id.clone(),
                tier,
                computed_at_ms: now_ms,
            };
            let entity_size = broker_codec::encoded_size(&entity);
            let assignment_size = broker_codec::encoded_size(&assignment);
            let next_size = bytes_used + entity_size + assignment_size;

            if next_size > max_bytes && !tier.is_essential() {
                *dropped.entry(tier).or_insert(0) += 1;
                exhausted = true;
                continue;
            }

            included.insert(entity_id.clone());
            bytes_used = next_size;
            *bytes_by_tier.entry(tier).or_insert(0) += entity_size + assignment_size;
            planned.push(Planned {
                tier,
                entity,
                assignment,
            });
        }
    }

    // Phase C: progressive shedding.
    if bytes_used > max_bytes {
        shed_drop_tier(
            InterestTier::Radar,
            &mut planned,
            &mut bytes_used,
            &mut bytes_by_tier,
            &mut dropped,
        );
    }
    if bytes_used > max_bytes {
        shed_strip(&mut planned, &mut bytes_used, &mut bytes_by_tier, EntitySnapshot::strip_cosmetics);
    }
    if bytes_used > max_bytes {
        shed_strip(&mut planned, &mut bytes_used, &mut bytes_by_tier, EntitySnapshot::strip_orientation);
    }
    if bytes_used > max_bytes {
        shed_strip(&mut planned, &mut bytes_used, &mut bytes_by_tier, EntitySnapshot::strip_velocity);
    }
    if bytes_used > max_bytes {
        shed_drop_tier(
            InterestTier::Nearby,
            &mut planned,
            &mut bytes_used,
            &mut bytes_by_tier,
            &mut dropped,
        );
    }

    // Phase D: materialize.
    let mut result_snapshot = seed;
    for entry in planned {
        result_snapshot.entities.push(entry.entity);
        result_snapshot.assignments.push(entry.assignment);
    }

    if bytes_used > max_bytes {
        exhausted = true;
    }

    if exhausted {
        tracing::warn!(
            observer_id,
            bytes_used,
            max_bytes,
            dropped = ?dropped,
            "budget plan could not fit every interested entity"
        );
    } else {
        tracing::debug!(observer_id, bytes_used, entities = result_snapshot.entities.len(), "budget plan fit within budget");
    }

    BudgetResult {
        snapshot: result_snapshot,
        bytes_used,
        bytes_by_tier,
        dropped,
        exhausted,
    }
}

/// Drop every planned entity in `tier`, crediting reclaimed bytes back to
/// `bytes_used` and `bytes_by_tier[tier]` (floored at zero).
fn shed_drop_tier(
    tier: InterestTier,
    planned: &mut Vec<Planned>,
    bytes_used: &mut usize,
    bytes_by_tier: &mut HashMap<InterestTier, usize>,
    dropped: &mut HashMap<InterestTier, usize>,
) {
    let mut i = 0;
    while i < planned.len() {
        if planned[i].tier == tier {
            let entry = planned.remove(i);
            let reclaimed =
                broker_codec::encoded_size(&entry.entity) + broker_codec::encoded_size(&entry.assignment);
            *bytes_used = bytes_used.saturating_sub(reclaimed);
            let tier_bytes = bytes_by_tier.entry(tier).or_insert(0);
            *tier_bytes = tier_bytes.saturating_sub(reclaimed);
            *dropped.entry(tier).or_insert(0) += 1;
        } else {
            i += 1;
        }
    }
}

/// Apply `strip` to every non-`SELF` surviving entity, crediting the
/// pre/post encoded-size delta (never negative) back to `bytes_used` and
/// that entity's tier bucket.
fn shed_strip(
    planned: &mut [Planned],
    bytes_used: &mut usize,
    bytes_by_tier: &mut HashMap<InterestTier, usize>,
    strip: fn(&mut EntitySnapshot),
) {
    for entry in planned.iter_mut() {
        if entry.tier == InterestTier::SelfTier {
            continue;
        }
        let before = broker_codec::encoded_size(&entry.entity);
        strip(&mut entry.entity);
        let after = broker_codec::encoded_size(&entry.entity);
        let delta = before.saturating_sub(after);
        if delta > 0 {
            *bytes_used = bytes_used.saturating_sub(delta);
            let tier_bytes = bytes_by_tier.entry(entry.tier).or_insert(0);
            *tier_bytes = tier_bytes.saturating_sub(delta);
        }
    }
}
