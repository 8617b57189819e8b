// Error types for event decoding and state persistence.

use std::time::Duration;
use thiserror::Error;

/// An inbound event with no extractable flight payload. The event is dropped.
#[derive(Debug, Error)]
pub enum MalformedEvent {
    #[error("empty request body")]
    EmptyBody,

    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("no flight data found")]
    NoFlightData,

    #[error("failed to decode data_base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("data_base64 payload is not valid JSON: {0}")]
    Base64Json(#[source] serde_json::Error),
}

/// The external state store could not be read or written.
/// Always logged and swallowed; in-memory state stays authoritative.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("state store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("state store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("snapshot encoding failed: {0}")]
    Encode(String),

    #[error("snapshot decoding failed: {0}")]
    Decode(String),

    #[error("state store unavailable: {0}")]
    Unavailable(String),
}
