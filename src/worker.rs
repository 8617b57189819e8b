// Background tasks: snapshot writer (fed by SnapshotManager's queue) and the periodic stats line.

use crate::aggregate_store::AggregateSnapshot;
use crate::engine::FlightEngine;
use crate::snapshot::SnapshotManager;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, interval};

/// Spawns the task that writes queued snapshots to the state store, one at a time.
/// On shutdown, whatever is still queued is collapsed to the newest snapshot and written
/// before the task exits.
pub fn spawn_snapshot_writer(
    mut rx: mpsc::Receiver<AggregateSnapshot>,
    snapshots: Arc<SnapshotManager>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Some(view) => snapshots.persist_logged(&view).await,
                        None => break,
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Snapshot writer shutting down");
                    break;
                }
            }
        }
        rx.close();
        let mut latest = None;
        while let Ok(view) = rx.try_recv() {
            latest = Some(view);
        }
        if let Some(view) = latest {
            snapshots.persist_logged(&view).await;
        }
        tracing::debug!(
            snapshots_saved_total = snapshots.saved_total(),
            "Snapshot writer stopped"
        );
    })
}

/// Logs one INFO "app stats" line every `stats_log_interval_secs` until shutdown.
pub fn spawn_stats_reporter(
    engine: Arc<FlightEngine>,
    stats_log_interval_secs: u64,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let stats_log_interval = Duration::from_secs(stats_log_interval_secs.max(1));
    tokio::spawn(async move {
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick completes immediately; skip it so the first line reflects real traffic.
        stats_log_tick.tick().await;

        loop {
            tokio::select! {
                _ = stats_log_tick.tick() => log_app_stats(&engine),
                _ = &mut shutdown_rx => {
                    tracing::debug!("Stats reporter shutting down");
                    break;
                }
            }
        }
    })
}

fn log_app_stats(engine: &FlightEngine) {
    let counters = engine.counters();
    tracing::info!(
        events_total = counters.events_total.load(Ordering::Relaxed),
        malformed_total = counters.malformed_total.load(Ordering::Relaxed),
        alerts_total = counters.alerts_total.load(Ordering::Relaxed),
        active_alerts = engine.alerts().active_count(),
        total_active = engine.aggregates().total_active(),
        tracked_flights = engine.tracker().all_flights().len(),
        snapshots_saved_total = engine.snapshots().saved_total(),
        snapshots_failed_total = engine.snapshots().failed_total(),
        "app stats"
    );
}
