//! # broker_metrics
//!
//! The Snapshot Metrics sidecar: per-client last-encoded payload size and
//! cumulative per-tier drop counts, recorded alongside every Budget Planner
//! call. Not part of the publication path itself — a pure observability
//! mirror, guarded by a single reader/writer lock with copy-on-read
//! semantics matching the rest of the core.

use std::collections::HashMap;

use parking_lot::RwLock;

use broker_model::InterestTier;

/// One client's current metrics snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientGauge {
    /// The encoded size, in bytes, of the last snapshot planned for this
    /// client.
    pub last_encoded_bytes: usize,
    /// Cumulative count of entities dropped from each tier, across every
    /// call to [`SnapshotMetrics::record`] for this client.
    pub dropped_by_tier: HashMap<InterestTier, u64>,
}

#[derive(Default)]
struct State {
    gauges: HashMap<String, ClientGauge>,
}

/// The metrics sidecar. All mutation is lock-guarded; every read returns an
/// owned copy, never a reference into internal state.
#[derive(Default)]
pub struct SnapshotMetrics {
    state: RwLock<State>,
}

impl SnapshotMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one publication cycle's outcome for `client_id`:
    /// `last_encoded_bytes` is overwritten, and `dropped` counts accumulate
    /// into the client's running totals. A no-op if `client_id` is empty.
    pub fn record(&self, client_id: &str, encoded_bytes: usize, dropped: &HashMap<InterestTier, usize>) {
        if client_id.is_empty() {
            return;
        }
        let mut state = self.state.write();
        let gauge = state.gauges.entry(client_id.to_string()).or_default();
        gauge.last_encoded_bytes = encoded_bytes;
        for (&tier, &count) in dropped {
            *gauge.dropped_by_tier.entry(tier).or_insert(0) += count as u64;
        }
    }

    /// A deep clone of `client_id`'s gauge, if one has been recorded.
    #[must_use]
    pub fn gauge(&self, client_id: &str) -> Option<ClientGauge> {
        self.state.read().gauges.get(client_id).cloned()
    }

    /// A deep clone of every tracked client's gauge, keyed by client id.
    #[must_use]
    pub fn all(&self) -> HashMap<String, ClientGauge> {
        self.state.read().gauges.clone()
    }

    /// Drop `client_id`'s gauge entirely.
    pub fn forget_client(&self, client_id: &str) {
        self.state.write().gauges.remove(client_id);
    }
}
