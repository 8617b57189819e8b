// Count-triggered persistence of the aggregate tables, and restore on startup.
//
// Persistence is best effort: a failed or slow write is logged and dropped, and the
// next trigger writes again. The in-memory store stays authoritative.

mod blob;
mod sqlite;
mod store;

pub use blob::{decode_snapshot, encode_snapshot};
pub use sqlite::SqliteKvStore;
pub use store::{KvStore, MemoryKvStore};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::aggregate_store::{AggregateSnapshot, AggregateStore};
use crate::error::PersistenceError;
use crate::models::PersistedSnapshot;

pub const DEFAULT_SNAPSHOT_KEY: &str = "fleet:stats:summary";
pub const DEFAULT_SNAPSHOT_INTERVAL: u64 = 10;

/// Fires once every `interval` events, counted since the last firing.
#[derive(Debug)]
pub struct SnapshotPolicy {
    interval: u64,
    since_last: AtomicU64,
}

impl SnapshotPolicy {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            since_last: AtomicU64::new(0),
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Records one event; `true` when a snapshot is due. The counter resets on firing.
    pub fn record_event(&self) -> bool {
        let mut due = false;
        let _ = self
            .since_last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                let next = n + 1;
                due = next >= self.interval;
                Some(if due { 0 } else { next })
            });
        due
    }

    /// Events recorded since the last firing.
    pub fn pending(&self) -> u64 {
        self.since_last.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotSettings {
    pub key: String,
    pub interval: u64,
    /// Snapshots waiting for the writer; triggers beyond this are skipped.
    pub queue_capacity: usize,
    /// Bound on each state-store read or write.
    pub io_timeout: Duration,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_SNAPSHOT_KEY.to_string(),
            interval: DEFAULT_SNAPSHOT_INTERVAL,
            queue_capacity: 4,
            io_timeout: Duration::from_secs(2),
        }
    }
}

pub struct SnapshotManager {
    store: Arc<dyn KvStore>,
    key: String,
    io_timeout: Duration,
    policy: SnapshotPolicy,
    queue: mpsc::Sender<AggregateSnapshot>,
    saved_total: AtomicU64,
    failed_total: AtomicU64,
}

impl SnapshotManager {
    /// Returns the manager and the receiving end of its write queue,
    /// to be drained by [`crate::worker::spawn_snapshot_writer`].
    pub fn new(
        store: Arc<dyn KvStore>,
        settings: SnapshotSettings,
    ) -> (Self, mpsc::Receiver<AggregateSnapshot>) {
        let (queue, rx) = mpsc::channel(settings.queue_capacity.max(1));
        let manager = Self {
            store,
            key: settings.key,
            io_timeout: settings.io_timeout,
            policy: SnapshotPolicy::new(settings.interval),
            queue,
            saved_total: AtomicU64::new(0),
            failed_total: AtomicU64::new(0),
        };
        (manager, rx)
    }

    pub fn policy(&self) -> &SnapshotPolicy {
        &self.policy
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Called once per ingested event. When the policy fires, queues a copy of the
    /// current tables for the writer without waiting. Returns whether a copy was queued.
    pub fn maybe_persist(&self, aggregates: &AggregateStore) -> bool {
        if !self.policy.record_event() {
            return false;
        }
        match self.queue.try_send(aggregates.snapshot_view()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(
                    operation = "queue_snapshot",
                    "snapshot writer busy; skipping this trigger"
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!(
                    operation = "queue_snapshot",
                    "snapshot writer stopped; snapshot not queued"
                );
                false
            }
        }
    }

    /// Encodes and writes one snapshot, bounded by the I/O timeout.
    pub async fn persist(&self, view: &AggregateSnapshot) -> Result<(), PersistenceError> {
        let snapshot = view.to_persisted(chrono::Utc::now().timestamp_millis());
        let bytes = encode_snapshot(&snapshot)?;
        let result = match tokio::time::timeout(self.io_timeout, self.store.put(&self.key, bytes))
            .await
        {
            Ok(r) => r,
            Err(_) => Err(PersistenceError::Timeout(self.io_timeout)),
        };
        match result {
            Ok(()) => {
                self.saved_total.fetch_add(1, Ordering::Relaxed);
                debug!(
                    operation = "persist_snapshot",
                    total_active = snapshot.total_active,
                    "Snapshot saved"
                );
                Ok(())
            }
            Err(e) => {
                self.failed_total.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// [`persist`](Self::persist), with failures logged and swallowed.
    pub async fn persist_logged(&self, view: &AggregateSnapshot) {
        if let Err(e) = self.persist(view).await {
            warn!(
                error = %e,
                operation = "persist_snapshot",
                "snapshot write failed; in-memory state remains authoritative"
            );
        }
    }

    /// Loads the last persisted snapshot. Absent, unreadable or corrupt state yields `None`
    /// (cold start); never an error.
    pub async fn restore(&self) -> Option<PersistedSnapshot> {
        let bytes = match tokio::time::timeout(self.io_timeout, self.store.get(&self.key)).await {
            Ok(Ok(Some(bytes))) => bytes,
            Ok(Ok(None)) => {
                info!(key = %self.key, "no persisted snapshot; starting empty");
                return None;
            }
            Ok(Err(e)) => {
                warn!(error = %e, operation = "restore_snapshot", "could not read snapshot; starting empty");
                return None;
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.io_timeout.as_millis() as u64,
                    operation = "restore_snapshot",
                    "state store timed out; starting empty"
                );
                return None;
            }
        };
        match decode_snapshot(&bytes) {
            Ok(snapshot) => {
                info!(
                    total_active = snapshot.total_active,
                    last_update_ms = snapshot.last_update_ms,
                    "Restored fleet stats from state store"
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, operation = "restore_snapshot", "corrupt snapshot; starting empty");
                None
            }
        }
    }

    pub fn saved_total(&self) -> u64 {
        self.saved_total.load(Ordering::Relaxed)
    }

    pub fn failed_total(&self) -> u64 {
        self.failed_total.load(Ordering::Relaxed)
    }
}
