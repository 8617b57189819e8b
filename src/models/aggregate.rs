// Running statistics per (dimension, bucket).

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

/// Grouping axis for fleet statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Airline,
    Origin,
    Destination,
    AircraftType,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Airline,
        Dimension::Origin,
        Dimension::Destination,
        Dimension::AircraftType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Airline => "airline",
            Dimension::Origin => "origin",
            Dimension::Destination => "destination",
            Dimension::AircraftType => "aircraft_type",
        }
    }

    /// Position in `Dimension::ALL`; used to index per-dimension tables.
    pub fn index(&self) -> usize {
        match self {
            Dimension::Airline => 0,
            Dimension::Origin => 1,
            Dimension::Destination => 2,
            Dimension::AircraftType => 3,
        }
    }
}

/// Running totals for one bucket. `samples` counts events that supplied
/// an altitude or a velocity, so `samples <= count` always holds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite,
)]
pub struct AggregateRecord {
    pub count: u64,
    pub total_altitude: f64,
    pub total_velocity: f64,
    pub samples: u64,
}

impl AggregateRecord {
    /// Folds one event into the totals. Non-finite metrics are ignored.
    pub fn observe(&mut self, altitude: Option<f64>, velocity: Option<f64>) {
        let altitude = altitude.filter(|v| v.is_finite());
        let velocity = velocity.filter(|v| v.is_finite());
        self.count += 1;
        if altitude.is_some() || velocity.is_some() {
            self.samples += 1;
        }
        if let Some(a) = altitude {
            self.total_altitude += a;
        }
        if let Some(v) = velocity {
            self.total_velocity += v;
        }
    }

    pub fn avg_altitude(&self) -> f64 {
        if self.samples > 0 {
            self.total_altitude / self.samples as f64
        } else {
            0.0
        }
    }

    pub fn avg_velocity(&self) -> f64 {
        if self.samples > 0 {
            self.total_velocity / self.samples as f64
        } else {
            0.0
        }
    }

    /// Read view with averages rounded to 2 decimals.
    pub fn stats(&self) -> BucketStats {
        BucketStats {
            count: self.count,
            avg_altitude: round2(self.avg_altitude()),
            avg_velocity: round2(self.avg_velocity()),
        }
    }
}

/// Per-bucket projection served by the stats endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub count: u64,
    pub avg_altitude: f64,
    pub avg_velocity: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
