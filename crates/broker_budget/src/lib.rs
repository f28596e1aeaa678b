//! # broker_budget
//!
//! The Budget Planner: given an observer's tier buckets and a byte budget,
//! selects entities in tier-priority order and progressively sheds
//! components (then whole tiers) when the budget is exceeded.

pub mod planner;
pub mod result;

pub use planner::plan;
pub use result::BudgetResult;

#[cfg(test)]
mod tests {
    use super::*;
    use broker_geometry::Vector3;
    use broker_model::{ComponentPriority, EntitySnapshot, InterestTier, TierAssignment};
    use broker_tiers::TierBuckets;

    fn entity(id: &str) -> EntitySnapshot {
        EntitySnapshot {
            schema_version: "1".to_string(),
            entity_id: id.to_string(),
            active: true,
            position: Some(Vector3::new(1.0, 2.0, 3.0)),
            velocity: Some(Vector3::new(0.5, 0.0, 0.0)),
            orientation: Some(broker_geometry::Orientation::new(10.0, 0.0, 0.0)),
            speed_mps: 120.0,
            entity_type: "f16".to_string(),
            radar_cross_section: 2.5,
            tick_id: 77,
            keyframe: true,
            captured_at_ms: 1_000,
        }
    }

    fn source_with(entities: Vec<EntitySnapshot>) -> broker_model::WorldSnapshot {
        broker_model::WorldSnapshot {
            schema_version: "1".to_string(),
            captured_at_ms: 1_000,
            tick_id: 77,
            keyframe: true,
            entities,
            assignments: vec![],
            component_priorities: ComponentPriority::canonical_table(),
        }
    }

    fn buckets_with(pairs: &[(InterestTier, &str)]) -> TierBuckets {
        let mut buckets = TierBuckets::default();
        for (tier, id) in pairs {
            buckets.push(*tier, (*id).to_string());
        }
        buckets
    }

    #[test]
    fn test_ample_budget_includes_everything_and_is_not_exhausted() {
        let source = source_with(vec![entity("self"), entity("near"), entity("radar")]);
        let buckets = buckets_with(&[
            (InterestTier::SelfTier, "self"),
            (InterestTier::Nearby, "near"),
            (InterestTier::Radar, "radar"),
        ]);
        let result = plan("self", &source, &buckets, 0, 1_000);
        assert_eq!(result.snapshot.entities.len(), 3);
        assert!(!result.exhausted);
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn test_essential_tier_preservation_scenario() {
        // Mirrors the essential-tier-preservation scenario: budget set to
        // exactly fit SELF + NEARBY; RADAR and EXTENDED must be dropped.
        let source = source_with(vec![
            entity("self"),
            entity("near"),
            entity("radar"),
            entity("extended"),
        ]);
        let buckets = buckets_with(&[
            (InterestTier::SelfTier, "self"),
            (InterestTier::Nearby, "near"),
            (InterestTier::Radar, "radar"),
            (InterestTier::Extended, "extended"),
        ]);

        let seed = broker_model::WorldSnapshot::seed_from(&source);
        let self_assignment = TierAssignment {
            schema_version: source.schema_version.clone(),
            observer_id: "self".to_string(),
            entity_id: "self".to_string(),
            tier: InterestTier::SelfTier,
            computed_at_ms: 1_000,
        };
        let near_assignment = TierAssignment {
            schema_version: source.schema_version.clone(),
            observer_id: "self".to_string(),
            entity_id: "near".to_string(),
            tier: InterestTier::Nearby,
            computed_at_ms: 1_000,
        };
        let essential_only_budget = (broker_codec::encoded_size(&seed)
            + broker_codec::encoded_size(&entity("self"))
            + broker_codec::encoded_size(&self_assignment)
            + broker_codec::encoded_size(&entity("near"))
            + broker_codec::encoded_size(&near_assignment)
            + 1) as i64;

        let result = plan("self", &source, &buckets, essential_only_budget, 1_000);
        let ids: Vec<&str> = result
            .snapshot
            .entities
            .iter()
            .map(|e| e.entity_id.as_str())
            .collect();
        assert_eq!(ids, vec!["self", "near"]);
        assert!(result.dropped.get(&InterestTier::Radar).copied().unwrap_or(0) >= 1);
        assert!(result.exhausted);
    }

    #[test]
    fn test_shed_order_radar_then_cosmetics_then_orientation_then_velocity() {
        let source = source_with(vec![entity("near"), entity("radar")]);
        let buckets = buckets_with(&[
            (InterestTier::Nearby, "near"),
            (InterestTier::Radar, "radar"),
        ]);

        // Budget fits both entities fully.
        let full = plan("near", &source, &buckets, 0, 1_000);
        let full_bytes = full.bytes_used as i64;

        // Budget tight enough to force the RADAR drop only.
        let near_only = plan("near", &source, &buckets, full_bytes - 1, 1_000);
        let ids: Vec<&str> = near_only
            .snapshot
            .entities
            .iter()
            .map(|e| e.entity_id.as_str())
            .collect();
        assert_eq!(ids, vec!["near"]);
        let survivor = &near_only.snapshot.entities[0];
        assert!(!survivor.entity_type.is_empty(), "cosmetics must survive a RADAR-only shed");
        assert!(survivor.orientation.is_some());
        assert!(survivor.velocity.is_some());
    }

    #[test]
    fn test_reconciliation_metadata_preserved_with_ample_budget() {
        let mut alpha = entity("alpha");
        alpha.tick_id = 77;
        alpha.keyframe = true;
        let mut bravo = entity("bravo");
        bravo.tick_id = 76;
        bravo.keyframe = false;

        let source = source_with(vec![alpha, bravo]);
        let buckets = buckets_with(&[
            (InterestTier::Nearby, "alpha"),
            (InterestTier::Nearby, "bravo"),
        ]);
        let result = plan("observer", &source, &buckets, 0, 1_000);

        assert_eq!(result.snapshot.tick_id, 77);
        assert!(result.snapshot.keyframe);
        let alpha_out = result.snapshot.entities.iter().find(|e| e.entity_id == "alpha").unwrap();
        let bravo_out = result.snapshot.entities.iter().find(|e| e.entity_id == "bravo").unwrap();
        assert_eq!(alpha_out.tick_id, 77);
        assert!(alpha_out.keyframe);
        assert_eq!(bravo_out.tick_id, 76);
        assert!(!bravo_out.keyframe);
    }

    #[test]
    fn test_dedup_first_tier_wins_when_id_appears_in_multiple_tiers() {
        let source = source_with(vec![entity("dup")]);
        let buckets = buckets_with(&[(InterestTier::SelfTier, "dup"), (InterestTier::Nearby, "dup")]);
        let result = plan("dup", &source, &buckets, 0, 1_000);
        assert_eq!(result.snapshot.entities.len(), 1);
        assert_eq!(result.snapshot.assignments.len(), 1);
        assert_eq!(result.snapshot.assignments[0].tier, InterestTier::SelfTier);
    }

    #[test]
    fn test_unknown_entity_id_in_bucket_is_skipped() {
        let source = source_with(vec![entity("known")]);
        let buckets = buckets_with(&[(InterestTier::Nearby, "known"), (InterestTier::Nearby, "ghost")]);
        let result = plan("observer", &source, &buckets, 0, 1_000);
        assert_eq!(result.snapshot.entities.len(), 1);
        assert_eq!(result.snapshot.entities[0].entity_id, "known");
    }

    #[test]
    fn test_assignments_and_entities_stay_in_lockstep() {
        let source = source_with(vec![entity("a"), entity("b")]);
        let buckets = buckets_with(&[(InterestTier::Nearby, "a"), (InterestTier::Nearby, "b")]);
        let result = plan("observer", &source, &buckets, 0, 1_000);
        assert_eq!(result.snapshot.entities.len(), result.snapshot.assignments.len());
        for (entity, assignment) in result.snapshot.entities.iter().zip(result.snapshot.assignments.iter()) {
            assert_eq!(entity.entity_id, assignment.entity_id);
        }
    }

    #[test]
    fn test_extreme_budget_drops_everything_down_to_self() {
        let source = source_with(vec![entity("self"), entity("near")]);
        let buckets = buckets_with(&[(InterestTier::SelfTier, "self"), (InterestTier::Nearby, "near")]);
        let result = plan("self", &source, &buckets, 1, 1_000);
        let ids: Vec<&str> = result.snapshot.entities.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["self"]);
        assert!(result.exhausted);
        assert!(result.dropped.get(&InterestTier::Nearby).copied().unwrap_or(0) >= 1);
    }
}
