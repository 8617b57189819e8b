// Airport geofencing: flights within an airport's radius, labelled arriving/departing/nearby.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use crate::models::FlightUpdate;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportConfig {
    pub icao: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub arrival_threshold_m: f64,
    pub departure_threshold_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStatus {
    Arriving,
    Departing,
    Nearby,
}

impl TrackStatus {
    /// Low and above ground: arriving; below the departure ceiling: departing.
    pub fn classify(altitude_m: f64, airport: &AirportConfig) -> Self {
        if altitude_m > 0.0 && altitude_m < airport.arrival_threshold_m {
            TrackStatus::Arriving
        } else if altitude_m > 0.0 && altitude_m < airport.departure_threshold_m {
            TrackStatus::Departing
        } else {
            TrackStatus::Nearby
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedFlight {
    #[serde(flatten)]
    pub flight: FlightUpdate,
    pub airport_code: String,
    pub status: TrackStatus,
    pub last_seen: String,
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Latest position-derived status per aircraft (keyed by icao24).
#[derive(Debug, Default)]
pub struct AirportTracker {
    airports: Vec<AirportConfig>,
    flights: RwLock<HashMap<String, TrackedFlight>>,
}

impl AirportTracker {
    pub fn new(airports: Vec<AirportConfig>) -> Self {
        Self {
            airports,
            flights: RwLock::new(HashMap::new()),
        }
    }

    pub fn airports(&self) -> &[AirportConfig] {
        &self.airports
    }

    /// Tracks the flight against every configured airport whose radius contains it.
    /// When radii overlap, the last matching airport in configuration order wins.
    /// Returns the resulting entry, if any airport matched.
    pub fn observe(&self, flight: &FlightUpdate) -> Option<TrackedFlight> {
        if flight.icao24.is_empty() {
            return None;
        }
        let (lat, lon) = flight.position()?;
        let altitude = flight.baro_altitude.or(flight.geo_altitude).unwrap_or(0.0);

        let mut tracked = None;
        for airport in &self.airports {
            let distance = haversine_km(lat, lon, airport.latitude, airport.longitude);
            if distance > airport.radius_km {
                continue;
            }
            let status = TrackStatus::classify(altitude, airport);
            debug!(
                icao24 = %flight.icao24,
                callsign = %flight.callsign,
                airport = %airport.icao,
                ?status,
                distance_km = distance,
                altitude_m = altitude,
                "flight near airport"
            );
            tracked = Some(TrackedFlight {
                flight: flight.clone(),
                airport_code: airport.icao.clone(),
                status,
                last_seen: chrono::Utc::now()
                    .format("%Y-%m-%dT%H:%M:%S%.6fZ")
                    .to_string(),
            });
        }

        let entry = tracked?;
        self.flights
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(flight.icao24.clone(), entry.clone());
        Some(entry)
    }

    /// Flights tracked at `airport_code`, optionally filtered by status, sorted by icao24.
    pub fn flights_at(&self, airport_code: &str, status: Option<TrackStatus>) -> Vec<TrackedFlight> {
        let mut out: Vec<TrackedFlight> = self
            .flights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|f| f.airport_code == airport_code)
            .filter(|f| status.is_none_or(|s| f.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.flight.icao24.cmp(&b.flight.icao24));
        out
    }

    pub fn all_flights(&self) -> Vec<TrackedFlight> {
        let mut out: Vec<TrackedFlight> = self
            .flights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        out.sort_by(|a, b| a.flight.icao24.cmp(&b.flight.icao24));
        out
    }
}
