//! The Budget Planner's output.

use std::collections::HashMap;

use broker_model::{InterestTier, WorldSnapshot};

/// The outcome of one [`crate::plan`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetResult {
    /// The per-observer snapshot, shaped to fit the byte budget.
    pub snapshot: WorldSnapshot,
    /// Total encoded bytes of the result snapshot, as last measured.
    pub bytes_used: usize,
    /// Encoded bytes attributed to surviving entities, grouped by tier.
    pub bytes_by_tier: HashMap<InterestTier, usize>,
    /// Count of entities dropped from each tier (selection skips and
    /// Phase-C tier drops both contribute here).
    pub dropped: HashMap<InterestTier, usize>,
    /// `true` if the budget was exceeded at any point and could not be
    /// fully reclaimed — either a non-essential entity was skipped during
    /// selection, or the final snapshot still exceeds `max_bytes`.
    pub exhausted: bool,
}
