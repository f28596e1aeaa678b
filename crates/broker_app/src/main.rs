//! # broker_app — demo publication harness
//!
//! Wires the Arc-Chunk Index, Tier Manager, Budget Planner, Bandwidth
//! Regulator, and Snapshot Metrics together around a synthetic world, to
//! demonstrate the publication cycle end to end. This is a demo harness,
//! not a transport implementation: the "wire" here is an in-process
//! `tokio::sync::watch` channel standing in for whatever real transport a
//! deployment would plug in.

mod config;
mod simulation;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use broker_bandwidth::{BandwidthRegulator, SystemClock};
use broker_metrics::SnapshotMetrics;
use broker_model::{InterestTier, ObserverState, RadarContact, RadarEntry, RadarFrame, WorldSnapshot};
use broker_tiers::{TierManager, TierManagerConfig};

use config::BrokerConfig;
use simulation::{generate_world_snapshot, observer_entity_id, observer_key};

#[derive(Parser)]
#[command(name = "broker_app", about = "World-state broker demo publication harness")]
struct Args {
    /// Number of synthetic observers to simulate
    #[arg(long, default_value_t = 3)]
    observer_count: usize,

    /// Number of synthetic entities to simulate
    #[arg(long, default_value_t = 25)]
    entity_count: usize,

    /// Per-observer byte budget (<= 0 means unlimited)
    #[arg(long, default_value_t = 4_096)]
    max_bytes: i64,

    /// Bandwidth regulator target, in bytes per second (<= 0 uses the default)
    #[arg(long, default_value_t = broker_bandwidth::DEFAULT_TARGET_BYTES_PER_SECOND)]
    target_bytes_per_second: f64,

    /// Interval between producer ticks, in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_interval_ms: u64,

    /// Number of ticks to run (0 means run until interrupted)
    #[arg(long, default_value_t = 0)]
    max_ticks: u64,

    /// Nearby-tier range override, in meters (<= 0 uses the default)
    #[arg(long, default_value_t = 0.0)]
    nearby_range_m: f64,

    /// Radar-tier range override, in meters (<= 0 uses the default)
    #[arg(long, default_value_t = 0.0)]
    radar_range_m: f64,

    /// Extended-tier range, in meters (<= 0 uses the default)
    #[arg(long, default_value_t = 0.0)]
    extended_range_m: f64,
}

impl Args {
    fn into_config(self) -> BrokerConfig {
        BrokerConfig {
            tier: TierManagerConfig {
                nearby_range_m: self.nearby_range_m,
                radar_range_m: self.radar_range_m,
                extended_range_m: self.extended_range_m,
                ..TierManagerConfig::default()
            },
            max_bytes: self.max_bytes,
            target_bytes_per_second: self.target_bytes_per_second,
            observer_count: self.observer_count,
            entity_count: self.entity_count,
            tick_interval_ms: self.tick_interval_ms,
            max_ticks: self.max_ticks,
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("broker_app=info".parse()?))
        .init();

    let config = Args::parse().into_config();
    info!(
        observers = config.observer_count,
        entities = config.entity_count,
        max_bytes = config.max_bytes,
        "broker_app starting"
    );

    let tier_manager = Arc::new(TierManager::new(config.tier));
    let regulator = Arc::new(BandwidthRegulator::new(
        config.target_bytes_per_second,
        Arc::new(SystemClock),
    ));
    let metrics = Arc::new(SnapshotMetrics::new());

    for index in 0..config.observer_count {
        tier_manager.update_observer(
            &observer_key(index),
            ObserverState {
                schema_version: "1".to_string(),
                observer_id: observer_entity_id(index),
                position: None,
                nearby_range_m: 0.0,
                radar_range_m: 0.0,
            },
        );
    }

    let (tx, _initial_rx) = watch::channel::<Option<WorldSnapshot>>(None);
    let receivers: Vec<_> = (0..config.observer_count).map(|_| tx.subscribe()).collect();

    let mut producer = tokio::spawn(run_producer(tier_manager.clone(), tx, config.clone()));

    let consumer_handles: Vec<_> = receivers
        .into_iter()
        .enumerate()
        .map(|(index, rx)| {
            tokio::spawn(run_observer(
                index,
                tier_manager.clone(),
                regulator.clone(),
                metrics.clone(),
                rx,
                config.max_bytes,
            ))
        })
        .collect();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, stopping producer");
            producer.abort();
        }
        result = &mut producer => {
            if let Err(err) = result {
                if !err.is_cancelled() {
                    warn!(%err, "producer task ended unexpectedly");
                }
            }
        }
    }

    for handle in consumer_handles {
        if let Err(err) = handle.await {
            if !err.is_cancelled() {
                warn!(%err, "observer task ended unexpectedly");
            }
        }
    }

    info!("broker_app shut down");
    Ok(())
}

async fn run_producer(tier_manager: Arc<TierManager>, tx: watch::Sender<Option<WorldSnapshot>>, config: BrokerConfig) {
    let mut interval = tokio::time::interval(Duration::from_millis(config.tick_interval_ms.max(1)));
    let mut tick_id: u64 = 0;

    loop {
        if config.max_ticks > 0 && tick_id >= config.max_ticks {
            break;
        }
        interval.tick().await;

        let snapshot = generate_world_snapshot(tick_id, config.entity_count, now_ms());
        tier_manager.ingest_world_snapshot(&snapshot);

        for index in 0..config.observer_count {
            if let Some(entity) = snapshot.entities.get(index) {
                tier_manager.update_observer(
                    &observer_key(index),
                    ObserverState {
                        schema_version: "1".to_string(),
                        observer_id: observer_entity_id(index),
                        position: entity.position,
                        nearby_range_m: 0.0,
                        radar_range_m: 0.0,
                    },
                );
            }
        }

        if tick_id % 10 == 0 {
            if let Some(last_index) = config.entity_count.checked_sub(1) {
                let frame = RadarFrame {
                    contacts: vec![RadarContact {
                        source_entity_id: "awacs-0".to_string(),
                        entries: vec![RadarEntry {
                            target_entity_id: observer_entity_id(last_index),
                            suggested_tier: InterestTier::Radar,
                        }],
                    }],
                };
                tier_manager.apply_radar_frame(&frame);
            }
        }

        debug!(tick = tick_id, entities = snapshot.entities.len(), "tick ingested");

        if tx.send(Some(snapshot)).is_err() {
            debug!("no observers remain, stopping producer");
            break;
        }
        tick_id += 1;
    }

    info!(ticks = tick_id, "producer loop finished");
}

async fn run_observer(
    index: usize,
    tier_manager: Arc<TierManager>,
    regulator: Arc<BandwidthRegulator>,
    metrics: Arc<SnapshotMetrics>,
    mut rx: watch::Receiver<Option<WorldSnapshot>>,
    max_bytes: i64,
) {
    let key = observer_key(index);

    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        let Some(snapshot) = snapshot else {
            continue;
        };

        let buckets = tier_manager.buckets(&key);
        let result = broker_budget::plan(&key, &snapshot, &buckets, max_bytes, snapshot.captured_at_ms);

        let encoded = match broker_codec::to_binary(&result.snapshot) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(client = %key, error = %err, "failed to encode snapshot");
                continue;
            }
        };

        let allowed = regulator.allow(&key, encoded.len() as i64);
        metrics.record(&key, encoded.len(), &result.dropped);

        if allowed {
            debug!(
                client = %key,
                bytes = encoded.len(),
                entities = result.snapshot.entities.len(),
                exhausted = result.exhausted,
                "published snapshot"
            );
        } else {
            warn!(client = %key, bytes = encoded.len(), "bandwidth regulator denied delivery");
        }
    }

    tier_manager.remove_observer(&key);
    regulator.forget(&key);
    metrics.forget_client(&key);
    debug!(client = %key, "observer loop exited");
}
