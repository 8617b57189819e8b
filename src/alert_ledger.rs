// Emergency alerts: active map (until cleared) plus a bounded history ring.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::instrument;

use crate::models::{AlertFlight, AlertRecord, EmergencyCode, FlightUpdate};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Default)]
struct LedgerState {
    active: IndexMap<String, AlertRecord>,
    history: VecDeque<AlertRecord>,
}

#[derive(Debug)]
pub struct AlertLedger {
    state: Mutex<LedgerState>,
    capacity: usize,
}

impl Default for AlertLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// History keeps at most `capacity` records (minimum 1), evicting the oldest.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(LedgerState {
                active: IndexMap::new(),
                history: VecDeque::with_capacity(capacity),
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new alert stamped with the current time. Repeated emergencies are not deduplicated.
    pub fn record(&self, flight: &FlightUpdate, code: EmergencyCode) -> AlertRecord {
        self.record_at(flight, code, Utc::now())
    }

    /// As [`record`](Self::record) with an explicit clock reading.
    /// Two alerts for the same aircraft at the same instant share an ID; the later one
    /// replaces the earlier in the active map, and both stay in history.
    #[instrument(skip(self, flight), fields(operation = "record_alert", squawk = code.code()))]
    pub fn record_at(
        &self,
        flight: &FlightUpdate,
        code: EmergencyCode,
        at: DateTime<Utc>,
    ) -> AlertRecord {
        let snapshot = AlertFlight::from(flight);
        let alert = AlertRecord {
            alert_id: format!(
                "{}-{}",
                snapshot.icao24,
                at.format("%Y-%m-%dT%H:%M:%S%.6f")
            ),
            timestamp: at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            squawk_code: code,
            description: code.description().to_string(),
            flight: snapshot,
        };

        let mut state = self.lock();
        state.active.insert(alert.alert_id.clone(), alert.clone());
        state.history.push_back(alert.clone());
        while state.history.len() > self.capacity {
            state.history.pop_front();
        }
        alert
    }

    /// Copy of the active alerts in creation order.
    pub fn active(&self) -> IndexMap<String, AlertRecord> {
        self.lock().active.clone()
    }

    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }

    /// `true` if the alert was active and is now cleared. History is untouched.
    pub fn clear(&self, alert_id: &str) -> bool {
        self.lock().active.shift_remove(alert_id).is_some()
    }

    /// Clears every active alert; returns how many were removed.
    pub fn clear_all(&self) -> usize {
        let mut state = self.lock();
        let removed = state.active.len();
        state.active.clear();
        removed
    }

    /// Most recent first, at most `min(limit, capacity)` records.
    pub fn history(&self, limit: usize) -> Vec<AlertRecord> {
        self.lock()
            .history
            .iter()
            .rev()
            .take(limit.min(self.capacity))
            .cloned()
            .collect()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }
}
