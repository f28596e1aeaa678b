//! The Bandwidth Regulator: a per-client token bucket gating outbound bytes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::Clock;

/// Default target rate, in bytes per second, used when a non-positive value
/// is configured: 48 kbps expressed in bytes (48_000 / 8).
pub const DEFAULT_TARGET_BYTES_PER_SECOND: f64 = 6_000.0;

struct TokenBucket {
    tokens: f64,
    last_refill_ms: i64,
    window_start_ms: i64,
    bytes_sent: i64,
    deny_count: i64,
}

impl TokenBucket {
    fn seeded_full(capacity: f64, now_ms: i64) -> Self {
        Self {
            tokens: capacity,
            last_refill_ms: now_ms,
            window_start_ms: now_ms,
            bytes_sent: 0,
            deny_count: 0,
        }
    }

    fn refill(&mut self, capacity: f64, refill_rate_per_sec: f64, now_ms: i64) {
        let elapsed_ms = now_ms.saturating_sub(self.last_refill_ms);
        if elapsed_ms > 0 {
            let elapsed_s = elapsed_ms as f64 / 1000.0;
            self.tokens = (self.tokens + elapsed_s * refill_rate_per_sec).min(capacity);
        }
        self.last_refill_ms = now_ms;
    }
}

/// A snapshot of one client's bucket usage, as of the moment it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSnapshot {
    pub client_id: String,
    pub available_bytes: f64,
    pub bytes_per_second: f64,
    pub observed_seconds: f64,
    pub denied_deliveries: i64,
    pub last_updated_ms: i64,
}

/// Per-client token-bucket gate for outbound publication bytes.
///
/// Configuration and per-client state are guarded by a single mutex, per
/// the concurrency model: `allow`, `forget`, and `snapshot_usage` all
/// acquire it, and refill happens lazily on access rather than on a
/// background timer.
pub struct BandwidthRegulator {
    target_bytes_per_second: f64,
    clock: Arc<dyn Clock>,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl BandwidthRegulator {
    /// `target_bytes_per_second <= 0.0` falls back to
    /// [`DEFAULT_TARGET_BYTES_PER_SECOND`]. Bucket capacity equals the
    /// refill rate.
    #[must_use]
    pub fn new(target_bytes_per_second: f64, clock: Arc<dyn Clock>) -> Self {
        let target_bytes_per_second = if target_bytes_per_second > 0.0 {
            target_bytes_per_second
        } else {
            DEFAULT_TARGET_BYTES_PER_SECOND
        };
        Self {
            target_bytes_per_second,
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// `true` if `payload_bytes` may be sent to `client_id` now; charges
    /// the bucket if so. An empty `client_id` or non-positive
    /// `payload_bytes` is nothing to charge and always allowed.
    pub fn allow(&self, client_id: &str, payload_bytes: i64) -> bool {
        if client_id.is_empty() || payload_bytes <= 0 {
            return true;
        }

        let now_ms = self.clock.now_ms();
        let capacity = self.target_bytes_per_second;
        let mut buckets = self.buckets.lock();
        let bucket = buckets
            .entry(client_id.to_string())
            .or_insert_with(|| TokenBucket::seeded_full(capacity, now_ms));
        bucket.refill(capacity, self.target_bytes_per_second, now_ms);

        if payload_bytes as f64 > bucket.tokens {
            bucket.deny_count += 1;
            tracing::debug!(client_id, payload_bytes, "bandwidth regulator denied delivery");
            return false;
        }

        bucket.tokens -= payload_bytes as f64;
        bucket.bytes_sent += payload_bytes;
        true
    }

    /// Drop `client_id`'s bucket entirely.
    pub fn forget(&self, client_id: &str) {
        self.buckets.lock().remove(client_id);
    }

    /// A usage snapshot for every tracked client, refreshed against the
    /// current clock. `None` if no client is tracked.
    #[must_use]
    pub fn snapshot_usage(&self) -> Option<Vec<UsageSnapshot>> {
        let now_ms = self.clock.now_ms();
        let capacity = self.target_bytes_per_second;
        let mut buckets = self.buckets.lock();
        if buckets.is_empty() {
            return None;
        }

        let mut out: Vec<UsageSnapshot> = buckets
            .iter_mut()
            .map(|(client_id, bucket)| {
                bucket.refill(capacity, self.target_bytes_per_second, now_ms);
                let observed_ms = now_ms.saturating_sub(bucket.window_start_ms);
                let observed_seconds = observed_ms as f64 / 1000.0;
                let bytes_per_second = if observed_seconds > 0.0 {
                    bucket.bytes_sent as f64 / observed_seconds
                } else {
                    0.0
                };
                UsageSnapshot {
                    client_id: client_id.clone(),
                    available_bytes: bucket.tokens,
                    bytes_per_second,
                    observed_seconds,
                    denied_deliveries: bucket.deny_count,
                    last_updated_ms: bucket.last_refill_ms,
                }
            })
            .collect();
        out.sort_by(|a, b| a.client_id.cmp(&b.client_id));
        Some(out)
    }
}
