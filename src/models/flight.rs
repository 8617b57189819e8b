// Canonical flight-update record decoded from an inbound event.

use serde::Serialize;
use serde_json::{Map, Value};

/// One telemetry observation for one aircraft. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightUpdate {
    pub icao24: String,
    pub callsign: String,
    pub squawk: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub geo_altitude: Option<f64>,
    pub velocity: Option<f64>,
    pub origin_country: Option<String>,
    pub on_ground: bool,
}

impl FlightUpdate {
    /// Builds a record from a decoded JSON object.
    /// Fields holding an unexpected JSON type, and non-finite numbers, are treated as absent.
    pub fn from_json_object(obj: &Map<String, Value>) -> Self {
        Self {
            icao24: string_field(obj, "icao24").unwrap_or_default(),
            callsign: string_field(obj, "callsign").unwrap_or_default(),
            squawk: squawk_field(obj),
            latitude: number_field(obj, "latitude"),
            longitude: number_field(obj, "longitude"),
            baro_altitude: number_field(obj, "baro_altitude"),
            geo_altitude: number_field(obj, "geo_altitude"),
            velocity: number_field(obj, "velocity"),
            origin_country: string_field(obj, "origin_country"),
            on_ground: obj
                .get("on_ground")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Both coordinates, when the event carries a position.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

// Transponders report squawk as a 4-digit string; some feeds send it as a number.
fn squawk_field(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("squawk")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
