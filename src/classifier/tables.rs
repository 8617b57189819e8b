// Fixed lookup tables for the demonstration classifier.

pub(super) const AIRLINE_CODES: &[(&str, &str)] = &[
    ("DL", "Delta"),
    ("UA", "United"),
    ("WN", "Southwest"),
    ("QF", "Qantas"),
    ("EK", "Emirates"),
];

/// (ICAO code, latitude, longitude). Order matters: callsign fallbacks index into it.
pub(super) const AIRPORTS: &[(&str, f64, f64)] = &[
    ("KJFK", 40.6413, -73.7781),
    ("KLAX", 33.9425, -118.4081),
    ("EGLL", 51.47, -0.4543),
    ("YSSY", -33.9399, 151.1753),
    ("OMDB", 25.2532, 55.3657),
    ("KORD", 41.9786, -87.9048),
    ("KDFW", 32.8998, -97.0403),
    ("KATL", 33.6407, -84.4277),
];

/// Planar distance in degrees under which the nearest airport is accepted as destination.
pub(super) const NEAREST_AIRPORT_MAX_DEGREES: f64 = 50.0;

pub(super) const COUNTRY_AIRPORTS: &[(&str, &[&str])] = &[
    (
        "United States",
        &["KJFK", "KLAX", "KORD", "KDFW", "KATL"],
    ),
    ("United Kingdom", &["EGLL"]),
    ("Australia", &["YSSY"]),
    ("United Arab Emirates", &["OMDB"]),
];

pub(super) const DEFAULT_ORIGINS: &[&str] = &["KJFK", "KLAX", "EGLL", "YSSY", "OMDB"];

/// Upper bounds (exclusive) over a 0..100 hash range: 50/30/15/5.
pub(super) const AIRCRAFT_TYPE_BANDS: &[(u64, &str)] = &[
    (50, "Narrow Body"),
    (80, "Wide Body"),
    (95, "Regional"),
    (100, "Cargo"),
];
