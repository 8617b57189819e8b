// Keyed running statistics: one table per dimension, buckets in first-observation order.

use indexmap::IndexMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::classifier::Classification;
use crate::models::{AggregateRecord, BucketEntry, Dimension, PersistedSnapshot};

type Table = IndexMap<String, AggregateRecord>;

/// Point-in-time copy of every table. Safe to read while ingestion continues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSnapshot {
    tables: [Table; 4],
}

impl AggregateSnapshot {
    pub fn dimension(&self, dimension: Dimension) -> &IndexMap<String, AggregateRecord> {
        &self.tables[dimension.index()]
    }

    /// Sum of airline counts.
    pub fn total_active(&self) -> u64 {
        total_active(&self.tables)
    }

    pub fn to_persisted(&self, last_update_ms: i64) -> PersistedSnapshot {
        let mut out = PersistedSnapshot {
            total_active: self.total_active(),
            last_update_ms,
            ..Default::default()
        };
        for dimension in Dimension::ALL {
            *out.entries_mut(dimension) = self
                .dimension(dimension)
                .iter()
                .map(|(bucket, record)| BucketEntry {
                    bucket: bucket.clone(),
                    record: *record,
                })
                .collect();
        }
        out
    }
}

/// Owns the live tables. Every mutation and every copy goes through one mutex.
#[derive(Debug, Default)]
pub struct AggregateStore {
    tables: Mutex<[Table; 4]>,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrates from a persisted snapshot. `samples` is clamped to `count`.
    pub fn from_snapshot(snapshot: PersistedSnapshot) -> Self {
        let mut tables: [Table; 4] = Default::default();
        for dimension in Dimension::ALL {
            let table = &mut tables[dimension.index()];
            for entry in snapshot.entries(dimension) {
                let mut record = entry.record;
                record.samples = record.samples.min(record.count);
                table.insert(entry.bucket.clone(), record);
            }
        }
        let restored = total_active(&tables);
        if restored != snapshot.total_active {
            debug!(
                stored = snapshot.total_active,
                restored, "persisted total_active differs from airline counts; using counts"
            );
        }
        Self {
            tables: Mutex::new(tables),
        }
    }

    // A panic mid-update leaves at most one record partially folded; keep serving.
    fn lock(&self) -> MutexGuard<'_, [Table; 4]> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Folds one observation into `(dimension, bucket)`, creating the bucket on first sight.
    pub fn update(
        &self,
        dimension: Dimension,
        bucket: &str,
        altitude: Option<f64>,
        velocity: Option<f64>,
    ) {
        let mut tables = self.lock();
        fold(&mut tables[dimension.index()], bucket, altitude, velocity);
    }

    /// Applies the four per-event updates under a single lock acquisition.
    pub fn observe(
        &self,
        classification: &Classification,
        altitude: Option<f64>,
        velocity: Option<f64>,
    ) {
        let mut tables = self.lock();
        for dimension in Dimension::ALL {
            fold(
                &mut tables[dimension.index()],
                classification.bucket(dimension),
                altitude,
                velocity,
            );
        }
    }

    pub fn record(&self, dimension: Dimension, bucket: &str) -> Option<AggregateRecord> {
        self.lock()[dimension.index()].get(bucket).copied()
    }

    /// Derived on every call from the airline table; never cached.
    pub fn total_active(&self) -> u64 {
        total_active(&self.lock())
    }

    pub fn snapshot_view(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            tables: self.lock().clone(),
        }
    }
}

fn fold(table: &mut Table, bucket: &str, altitude: Option<f64>, velocity: Option<f64>) {
    match table.get_mut(bucket) {
        Some(record) => record.observe(altitude, velocity),
        None => {
            let mut record = AggregateRecord::default();
            record.observe(altitude, velocity);
            table.insert(bucket.to_string(), record);
        }
    }
}

fn total_active(tables: &[Table; 4]) -> u64 {
    tables[Dimension::Airline.index()]
        .values()
        .map(|r| r.count)
        .sum()
}
