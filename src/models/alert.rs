// Emergency squawk codes and alert records.

use serde::{Deserialize, Serialize};

use super::FlightUpdate;

/// Transponder codes that raise an alert. Serializes as the 4-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyCode {
    #[serde(rename = "7700")]
    GeneralEmergency,
    #[serde(rename = "7500")]
    Hijacking,
    #[serde(rename = "7600")]
    RadioFailure,
}

impl EmergencyCode {
    pub const ALL: [EmergencyCode; 3] = [
        EmergencyCode::GeneralEmergency,
        EmergencyCode::Hijacking,
        EmergencyCode::RadioFailure,
    ];

    /// Exact match on the trimmed squawk; anything else is not an emergency.
    pub fn from_squawk(squawk: &str) -> Option<Self> {
        match squawk.trim() {
            "7700" => Some(EmergencyCode::GeneralEmergency),
            "7500" => Some(EmergencyCode::Hijacking),
            "7600" => Some(EmergencyCode::RadioFailure),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EmergencyCode::GeneralEmergency => "7700",
            EmergencyCode::Hijacking => "7500",
            EmergencyCode::RadioFailure => "7600",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EmergencyCode::GeneralEmergency => "General Emergency",
            EmergencyCode::Hijacking => "Aircraft Hijacking",
            EmergencyCode::RadioFailure => "Radio Communication Failure",
        }
    }
}

/// Identity, position and kinematics of the aircraft at alert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFlight {
    pub icao24: String,
    pub callsign: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub velocity: Option<f64>,
    pub origin_country: String,
}

impl From<&FlightUpdate> for AlertFlight {
    fn from(flight: &FlightUpdate) -> Self {
        Self {
            icao24: or_unknown(&flight.icao24),
            callsign: or_unknown(&flight.callsign),
            latitude: flight.latitude,
            longitude: flight.longitude,
            baro_altitude: flight.baro_altitude,
            velocity: flight.velocity,
            origin_country: or_unknown(flight.origin_country.as_deref().unwrap_or_default()),
        }
    }
}

fn or_unknown(s: &str) -> String {
    if s.is_empty() {
        "unknown".to_string()
    } else {
        s.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub alert_id: String,
    pub timestamp: String,
    pub squawk_code: EmergencyCode,
    pub description: String,
    pub flight: AlertFlight,
}
