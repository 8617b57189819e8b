// Flight classification: airline, origin, destination, aircraft type, emergency verdict.
//
// The origin/destination/aircraft-type rules are synthetic demonstration heuristics.
// They are deterministic and total (every input gets a bucket), not aviation-accurate.

mod tables;

use crate::models::{Dimension, EmergencyCode, FlightUpdate};
use tables::*;

pub const UNKNOWN: &str = "Unknown";
pub const OTHER_AIRLINE: &str = "Other";

/// Buckets assigned to one event, one per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub aircraft_type: String,
}

impl Classification {
    pub fn bucket(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Airline => &self.airline,
            Dimension::Origin => &self.origin,
            Dimension::Destination => &self.destination,
            Dimension::AircraftType => &self.aircraft_type,
        }
    }
}

/// Pluggable classification. Implementations must be deterministic and always return a bucket.
pub trait Classifier: Send + Sync {
    fn airline_of(&self, callsign: &str) -> String;
    fn origin_of(&self, flight: &FlightUpdate) -> String;
    fn destination_of(&self, flight: &FlightUpdate) -> String;
    fn aircraft_type_of(&self, flight: &FlightUpdate) -> String;

    fn emergency_code_of(&self, flight: &FlightUpdate) -> Option<EmergencyCode> {
        emergency_code_of(flight)
    }

    fn classify(&self, flight: &FlightUpdate) -> Classification {
        Classification {
            airline: self.airline_of(&flight.callsign),
            origin: self.origin_of(flight),
            destination: self.destination_of(flight),
            aircraft_type: self.aircraft_type_of(flight),
        }
    }
}

/// The built-in table-driven classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoClassifier;

impl Classifier for DemoClassifier {
    fn airline_of(&self, callsign: &str) -> String {
        airline_of(callsign).to_string()
    }

    fn origin_of(&self, flight: &FlightUpdate) -> String {
        origin_of(flight).to_string()
    }

    fn destination_of(&self, flight: &FlightUpdate) -> String {
        destination_of(flight).to_string()
    }

    fn aircraft_type_of(&self, flight: &FlightUpdate) -> String {
        aircraft_type_of(flight).to_string()
    }
}

/// Stable string hash: first 8 bytes of the BLAKE3 digest as a little-endian u64.
pub fn stable_hash(s: &str) -> u64 {
    let digest = blake3::hash(s.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

pub fn airline_of(callsign: &str) -> &'static str {
    let callsign = callsign.trim();
    let mut chars = callsign.chars();
    let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
        return UNKNOWN;
    };
    let code: String = [a, b].iter().collect();
    AIRLINE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(OTHER_AIRLINE)
}

pub fn aircraft_type_of(flight: &FlightUpdate) -> &'static str {
    let callsign = flight.callsign.trim();
    if !callsign.is_empty() {
        let band = stable_hash(callsign) % 100;
        return AIRCRAFT_TYPE_BANDS
            .iter()
            .find(|(upper, _)| band < *upper)
            .map(|(_, name)| *name)
            .unwrap_or("Cargo");
    }

    let altitude = flight.baro_altitude.unwrap_or(0.0);
    let velocity = flight.velocity.unwrap_or(0.0);
    if altitude > 10_000.0 && velocity > 200.0 {
        "Wide Body"
    } else if altitude > 5_000.0 {
        "Narrow Body"
    } else {
        "Regional"
    }
}

pub fn destination_of(flight: &FlightUpdate) -> &'static str {
    if let Some((lat, lon)) = flight.position() {
        let mut nearest: Option<(&'static str, f64)> = None;
        for &(code, a_lat, a_lon) in AIRPORTS {
            let distance = ((lat - a_lat).powi(2) + (lon - a_lon).powi(2)).sqrt();
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((code, distance));
            }
        }
        if let Some((code, distance)) = nearest
            && distance < NEAREST_AIRPORT_MAX_DEGREES
        {
            return code;
        }
    }

    let callsign = flight.callsign.trim();
    if callsign.is_empty() {
        return UNKNOWN;
    }
    let idx = callsign_number_mod(callsign, AIRPORTS.len() as u64) as usize;
    AIRPORTS[idx].0
}

pub fn origin_of(flight: &FlightUpdate) -> &'static str {
    let country = flight.origin_country.as_deref().unwrap_or_default();
    if let Some((_, airports)) = COUNTRY_AIRPORTS.iter().find(|(c, _)| *c == country) {
        if flight.icao24.is_empty() {
            return airports[0];
        }
        let idx = (stable_hash(&flight.icao24) % airports.len() as u64) as usize;
        return airports[idx];
    }

    let callsign = flight.callsign.trim();
    if callsign.is_empty() {
        return UNKNOWN;
    }
    let n = DEFAULT_ORIGINS.len() as u64;
    let idx = ((callsign_number_mod(callsign, n) + 1) % n) as usize;
    DEFAULT_ORIGINS[idx]
}

pub fn emergency_code_of(flight: &FlightUpdate) -> Option<EmergencyCode> {
    flight.squawk.as_deref().and_then(EmergencyCode::from_squawk)
}

/// The callsign's digits read as one decimal number (no digits = 0), reduced modulo `modulus`.
fn callsign_number_mod(callsign: &str, modulus: u64) -> u64 {
    callsign
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| (acc * 10 + u64::from(d)) % modulus)
}
