// Alert ledger: IDs, active map, bounded history, clearing

use chrono::{Duration, TimeZone, Utc};
use fleetwatch::alert_ledger::AlertLedger;
use fleetwatch::models::{EmergencyCode, FlightUpdate};

fn flight(icao24: &str, callsign: &str) -> FlightUpdate {
    FlightUpdate {
        icao24: icao24.into(),
        callsign: callsign.into(),
        squawk: Some("7700".into()),
        latitude: Some(40.5),
        longitude: Some(-73.75),
        baro_altitude: Some(3_000.0),
        velocity: Some(150.0),
        origin_country: Some("United States".into()),
        ..Default::default()
    }
}

#[test]
fn test_alert_id_and_timestamp_format() {
    let ledger = AlertLedger::new();
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::microseconds(42);
    let alert = ledger.record_at(&flight("abc123", "DL100"), EmergencyCode::GeneralEmergency, at);
    assert_eq!(alert.alert_id, "abc123-2024-01-01T12:00:00.000042");
    assert_eq!(alert.timestamp, "2024-01-01T12:00:00.000042Z");
    assert_eq!(alert.squawk_code, EmergencyCode::GeneralEmergency);
    assert_eq!(alert.description, "General Emergency");
    assert_eq!(alert.flight.callsign, "DL100");
    assert_eq!(alert.flight.origin_country, "United States");
}

#[test]
fn test_missing_identity_becomes_unknown() {
    let ledger = AlertLedger::new();
    let alert = ledger.record(&FlightUpdate::default(), EmergencyCode::RadioFailure);
    assert!(alert.alert_id.starts_with("unknown-"));
    assert_eq!(alert.flight.callsign, "unknown");
    assert_eq!(alert.flight.origin_country, "unknown");
    assert_eq!(alert.flight.baro_altitude, None);
}

#[test]
fn test_repeated_emergencies_are_not_deduplicated() {
    let ledger = AlertLedger::new();
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let f = flight("abc123", "DL100");
    ledger.record_at(&f, EmergencyCode::GeneralEmergency, at);
    ledger.record_at(&f, EmergencyCode::GeneralEmergency, at + Duration::seconds(1));
    assert_eq!(ledger.active_count(), 2);
    assert_eq!(ledger.history_len(), 2);
}

#[test]
fn test_colliding_ids_keep_latest_active_and_both_in_history() {
    let ledger = AlertLedger::new();
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let f = flight("abc123", "DL100");
    ledger.record_at(&f, EmergencyCode::GeneralEmergency, at);
    let second = ledger.record_at(&f, EmergencyCode::Hijacking, at);

    let active = ledger.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[&second.alert_id].squawk_code, EmergencyCode::Hijacking);
    assert_eq!(ledger.history_len(), 2);
}

#[test]
fn test_history_is_bounded_and_most_recent_first() {
    let ledger = AlertLedger::new();
    assert_eq!(ledger.capacity(), 100);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..150 {
        ledger.record_at(
            &flight(&format!("a{i:05}"), "DL1"),
            EmergencyCode::GeneralEmergency,
            start + Duration::seconds(i),
        );
    }
    assert_eq!(ledger.history_len(), 100);
    assert_eq!(ledger.active_count(), 150);

    let history = ledger.history(1_000);
    assert_eq!(history.len(), 100);
    assert_eq!(history[0].flight.icao24, "a00149");
    assert_eq!(history[99].flight.icao24, "a00050");

    let recent = ledger.history(3);
    let ids: Vec<&str> = recent.iter().map(|a| a.flight.icao24.as_str()).collect();
    assert_eq!(ids, ["a00149", "a00148", "a00147"]);
}

#[test]
fn test_custom_capacity() {
    let ledger = AlertLedger::with_capacity(2);
    for icao in ["a", "b", "c"] {
        ledger.record(&flight(icao, "UA1"), EmergencyCode::RadioFailure);
    }
    assert_eq!(ledger.history_len(), 2);
    assert_eq!(AlertLedger::with_capacity(0).capacity(), 1);
}

#[test]
fn test_clear_removes_only_from_active() {
    let ledger = AlertLedger::new();
    let alert = ledger.record(&flight("abc123", "DL100"), EmergencyCode::GeneralEmergency);
    assert!(ledger.clear(&alert.alert_id));
    assert_eq!(ledger.active_count(), 0);
    assert_eq!(ledger.history_len(), 1);
    assert!(!ledger.clear(&alert.alert_id));
}

#[test]
fn test_clear_unknown_id_leaves_active_unchanged() {
    let ledger = AlertLedger::new();
    ledger.record(&flight("abc123", "DL100"), EmergencyCode::GeneralEmergency);
    let before = ledger.active();
    assert!(!ledger.clear("no-such-alert"));
    assert_eq!(ledger.active(), before);
}

#[test]
fn test_clear_all_returns_count() {
    let ledger = AlertLedger::new();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..3 {
        ledger.record_at(
            &flight("abc123", "DL100"),
            EmergencyCode::GeneralEmergency,
            start + Duration::seconds(i),
        );
    }
    assert_eq!(ledger.clear_all(), 3);
    assert_eq!(ledger.active_count(), 0);
    assert_eq!(ledger.history_len(), 3);
    assert_eq!(ledger.clear_all(), 0);
}
