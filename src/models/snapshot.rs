// Persisted form of the aggregate tables (one blob under one state-store key).

use wincode::{SchemaRead, SchemaWrite};

use super::{AggregateRecord, Dimension};

#[derive(Debug, Clone, PartialEq, SchemaRead, SchemaWrite)]
pub struct BucketEntry {
    pub bucket: String,
    pub record: AggregateRecord,
}

/// Buckets are stored in first-observation order so ranking ties survive a restart.
/// `total_active` is informational; it is recomputed from `by_airline` on restore.
#[derive(Debug, Clone, Default, PartialEq, SchemaRead, SchemaWrite)]
pub struct PersistedSnapshot {
    pub by_airline: Vec<BucketEntry>,
    pub by_origin: Vec<BucketEntry>,
    pub by_destination: Vec<BucketEntry>,
    pub by_aircraft_type: Vec<BucketEntry>,
    pub total_active: u64,
    /// Unix millis of the write.
    pub last_update_ms: i64,
}

impl PersistedSnapshot {
    pub fn entries(&self, dimension: Dimension) -> &[BucketEntry] {
        match dimension {
            Dimension::Airline => &self.by_airline,
            Dimension::Origin => &self.by_origin,
            Dimension::Destination => &self.by_destination,
            Dimension::AircraftType => &self.by_aircraft_type,
        }
    }

    pub fn entries_mut(&mut self, dimension: Dimension) -> &mut Vec<BucketEntry> {
        match dimension {
            Dimension::Airline => &mut self.by_airline,
            Dimension::Origin => &mut self.by_origin,
            Dimension::Destination => &mut self.by_destination,
            Dimension::AircraftType => &mut self.by_aircraft_type,
        }
    }
}
