// Shared test helpers
#![allow(dead_code)]

use fleetwatch::aggregate_store::{AggregateSnapshot, AggregateStore};
use fleetwatch::alert_ledger::AlertLedger;
use fleetwatch::classifier::DemoClassifier;
use fleetwatch::engine::{EngineDeps, FlightEngine};
use fleetwatch::query::QueryService;
use fleetwatch::snapshot::{KvStore, MemoryKvStore, SnapshotManager, SnapshotSettings};
use fleetwatch::tracker::{AirportConfig, AirportTracker};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::mpsc;

pub const SNAPSHOT_KEY: &str = "fleet:stats:summary";

/// A direct (un-enveloped) flight update body.
pub fn flight_json(
    icao24: &str,
    callsign: &str,
    squawk: &str,
    baro_altitude: f64,
    velocity: f64,
) -> Value {
    json!({
        "icao24": icao24,
        "callsign": callsign,
        "squawk": squawk,
        "baro_altitude": baro_altitude,
        "velocity": velocity,
        "origin_country": "United States",
        "on_ground": false,
    })
}

pub fn body(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

pub fn jfk() -> AirportConfig {
    AirportConfig {
        icao: "KJFK".into(),
        name: "John F. Kennedy International Airport".into(),
        latitude: 40.6413,
        longitude: -73.7781,
        radius_km: 50.0,
        arrival_threshold_m: 3000.0,
        departure_threshold_m: 5000.0,
    }
}

pub struct TestEngine {
    pub engine: Arc<FlightEngine>,
    pub queries: Arc<QueryService>,
    pub store: Arc<MemoryKvStore>,
    pub snapshots: Arc<SnapshotManager>,
    pub snapshot_rx: mpsc::Receiver<AggregateSnapshot>,
}

/// Engine wired to an in-memory state store, snapshot every `interval` events.
pub fn test_engine(interval: u64) -> TestEngine {
    let store = Arc::new(MemoryKvStore::new());
    let (manager, snapshot_rx) = SnapshotManager::new(
        store.clone() as Arc<dyn KvStore>,
        SnapshotSettings {
            interval,
            ..Default::default()
        },
    );
    let snapshots = Arc::new(manager);
    let aggregates = Arc::new(AggregateStore::new());
    let alerts = Arc::new(AlertLedger::new());
    let engine = Arc::new(FlightEngine::new(EngineDeps {
        classifier: Arc::new(DemoClassifier),
        aggregates: aggregates.clone(),
        alerts: alerts.clone(),
        snapshots: snapshots.clone(),
        tracker: Arc::new(AirportTracker::new(vec![jfk()])),
        archive: None,
    }));
    let queries = Arc::new(QueryService::new(aggregates, alerts));
    TestEngine {
        engine,
        queries,
        store,
        snapshots,
        snapshot_rx,
    }
}
