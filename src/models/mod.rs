// Domain models: flight updates, aggregate records, alerts, persisted snapshot

mod aggregate;
mod alert;
mod flight;
mod snapshot;

pub use aggregate::{AggregateRecord, BucketStats, Dimension, round2};
pub use alert::{AlertFlight, AlertRecord, EmergencyCode};
pub use flight::FlightUpdate;
pub use snapshot::{BucketEntry, PersistedSnapshot};
