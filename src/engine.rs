// Event ingestion: normalize → classify → aggregate / alert → track → maybe persist.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::aggregate_store::AggregateStore;
use crate::alert_ledger::AlertLedger;
use crate::archive::{self, ArchiveSink};
use crate::classifier::Classifier;
use crate::error::MalformedEvent;
use crate::models::{AlertRecord, Dimension};
use crate::normalizer::{self, NormalizedEvent};
use crate::snapshot::SnapshotManager;
use crate::tracker::AirportTracker;

/// Result of one accepted event.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Recorded,
    AlertRaised(AlertRecord),
}

/// Optional raw-event archival.
pub struct ArchiveTarget {
    pub sink: Arc<dyn ArchiveSink>,
    pub timeout: Duration,
}

pub struct EngineDeps {
    pub classifier: Arc<dyn Classifier>,
    pub aggregates: Arc<AggregateStore>,
    pub alerts: Arc<AlertLedger>,
    pub snapshots: Arc<SnapshotManager>,
    pub tracker: Arc<AirportTracker>,
    pub archive: Option<ArchiveTarget>,
}

#[derive(Debug, Default)]
pub struct EngineCounters {
    pub events_total: AtomicU64,
    pub malformed_total: AtomicU64,
    pub alerts_total: AtomicU64,
}

pub struct FlightEngine {
    classifier: Arc<dyn Classifier>,
    aggregates: Arc<AggregateStore>,
    alerts: Arc<AlertLedger>,
    snapshots: Arc<SnapshotManager>,
    tracker: Arc<AirportTracker>,
    archive: Option<ArchiveTarget>,
    counters: EngineCounters,
}

impl FlightEngine {
    pub fn new(deps: EngineDeps) -> Self {
        let EngineDeps {
            classifier,
            aggregates,
            alerts,
            snapshots,
            tracker,
            archive,
        } = deps;
        Self {
            classifier,
            aggregates,
            alerts,
            snapshots,
            tracker,
            archive,
            counters: EngineCounters::default(),
        }
    }

    /// Decodes and processes one raw request body. A malformed body is counted,
    /// logged and dropped; it never reaches the stores.
    pub fn ingest(&self, body: &[u8]) -> Result<IngestOutcome, MalformedEvent> {
        match normalizer::normalize(body) {
            Ok(event) => Ok(self.process(event)),
            Err(e) => {
                self.counters.malformed_total.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, operation = "normalize", "dropping malformed flight update");
                Err(e)
            }
        }
    }

    pub fn process(&self, event: NormalizedEvent) -> IngestOutcome {
        let flight = &event.flight;
        self.counters.events_total.fetch_add(1, Ordering::Relaxed);

        let classification = self.classifier.classify(flight);
        self.aggregates
            .observe(&classification, flight.baro_altitude, flight.velocity);

        let outcome = match self.classifier.emergency_code_of(flight) {
            Some(code) => {
                let alert = self.alerts.record(flight, code);
                self.counters.alerts_total.fetch_add(1, Ordering::Relaxed);
                warn!(
                    alert_id = %alert.alert_id,
                    squawk = code.code(),
                    callsign = %alert.flight.callsign,
                    icao24 = %alert.flight.icao24,
                    "EMERGENCY ALERT: {}",
                    code.description()
                );
                IngestOutcome::AlertRaised(alert)
            }
            None => IngestOutcome::Recorded,
        };

        self.tracker.observe(flight);

        if let Some(target) = &self.archive {
            archive::spawn_archive(target.sink.clone(), &event.payload, target.timeout);
        }

        self.snapshots.maybe_persist(&self.aggregates);

        debug!(
            airline = %classification.airline,
            airline_count = self
                .aggregates
                .record(Dimension::Airline, &classification.airline)
                .map(|r| r.count)
                .unwrap_or(0),
            total_active = self.aggregates.total_active(),
            "Updated stats"
        );
        outcome
    }

    pub fn aggregates(&self) -> &Arc<AggregateStore> {
        &self.aggregates
    }

    pub fn alerts(&self) -> &Arc<AlertLedger> {
        &self.alerts
    }

    pub fn snapshots(&self) -> &Arc<SnapshotManager> {
        &self.snapshots
    }

    pub fn tracker(&self) -> &Arc<AirportTracker> {
        &self.tracker
    }

    pub fn counters(&self) -> &EngineCounters {
        &self.counters
    }
}
