// Read-only projections over the aggregate tables and the alert ledger.
// Computed fresh on every call from a point-in-time copy; nothing is cached.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::aggregate_store::{AggregateSnapshot, AggregateStore};
use crate::alert_ledger::AlertLedger;
use crate::models::{AlertRecord, BucketStats, Dimension};

/// Threshold behind the summary's `airlines_with_10_plus_flights` list.
pub const SUMMARY_MIN_FLIGHTS: i64 = 10;

/// Bucket → stats in first-observation order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown(pub Vec<(String, BucketStats)>);

impl Breakdown {
    pub fn get(&self, bucket: &str) -> Option<&BucketStats> {
        self.0.iter().find(|(b, _)| b == bucket).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(bucket, stats)| (bucket, stats)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary {
    /// Unix seconds.
    pub timestamp: f64,
    pub total_active_flights: u64,
    pub by_airline: Breakdown,
    pub airlines_with_10_plus_flights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirlineRanking {
    pub airline: String,
    pub count: u64,
    pub avg_altitude: f64,
    pub avg_velocity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinFlightsView {
    pub min_flights: i64,
    pub airlines: Vec<AirlineRanking>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveAlertsView {
    pub alerts: IndexMap<String, AlertRecord>,
    pub count: usize,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertHistoryView {
    pub history: Vec<AlertRecord>,
    pub count: usize,
    pub total: usize,
    pub timestamp: String,
}

pub struct QueryService {
    aggregates: Arc<AggregateStore>,
    alerts: Arc<AlertLedger>,
}

impl QueryService {
    pub fn new(aggregates: Arc<AggregateStore>, alerts: Arc<AlertLedger>) -> Self {
        Self { aggregates, alerts }
    }

    pub fn breakdown(&self, dimension: Dimension) -> Breakdown {
        breakdown_of(&self.aggregates.snapshot_view(), dimension)
    }

    pub fn summary(&self) -> FleetSummary {
        let view = self.aggregates.snapshot_view();
        let leaders = ranked_exceeding(&view, Dimension::Airline, SUMMARY_MIN_FLIGHTS)
            .into_iter()
            .map(|(airline, _)| airline)
            .collect();
        FleetSummary {
            timestamp: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
            total_active_flights: view.total_active(),
            by_airline: breakdown_of(&view, Dimension::Airline),
            airlines_with_10_plus_flights: leaders,
        }
    }

    /// Buckets with strictly more than `min_flights` events, count descending;
    /// ties keep first-observation order. A negative threshold matches every bucket.
    pub fn buckets_exceeding(
        &self,
        dimension: Dimension,
        min_flights: i64,
    ) -> Vec<(String, BucketStats)> {
        ranked_exceeding(&self.aggregates.snapshot_view(), dimension, min_flights)
    }

    pub fn airlines_with_min_flights(&self, min_flights: i64) -> MinFlightsView {
        let airlines: Vec<AirlineRanking> = self
            .buckets_exceeding(Dimension::Airline, min_flights)
            .into_iter()
            .map(|(airline, stats)| AirlineRanking {
                airline,
                count: stats.count,
                avg_altitude: stats.avg_altitude,
                avg_velocity: stats.avg_velocity,
            })
            .collect();
        MinFlightsView {
            min_flights,
            count: airlines.len(),
            airlines,
        }
    }

    pub fn active_alerts(&self) -> ActiveAlertsView {
        let alerts = self.alerts.active();
        ActiveAlertsView {
            count: alerts.len(),
            alerts,
            timestamp: now_iso(),
        }
    }

    pub fn alert_history(&self, limit: usize) -> AlertHistoryView {
        let history = self.alerts.history(limit);
        AlertHistoryView {
            count: history.len(),
            total: self.alerts.history_len(),
            history,
            timestamp: now_iso(),
        }
    }
}

fn breakdown_of(view: &AggregateSnapshot, dimension: Dimension) -> Breakdown {
    Breakdown(
        view.dimension(dimension)
            .iter()
            .map(|(bucket, record)| (bucket.clone(), record.stats()))
            .collect(),
    )
}

fn ranked_exceeding(
    view: &AggregateSnapshot,
    dimension: Dimension,
    min_flights: i64,
) -> Vec<(String, BucketStats)> {
    let mut ranked: Vec<(String, BucketStats)> = view
        .dimension(dimension)
        .iter()
        .filter(|(_, record)| exceeds(record.count, min_flights))
        .map(|(bucket, record)| (bucket.clone(), record.stats()))
        .collect();
    // Stable sort keeps insertion order among equal counts.
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    ranked
}

fn exceeds(count: u64, min_flights: i64) -> bool {
    u64::try_from(min_flights).map_or(true, |min| count > min)
}

fn now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}
