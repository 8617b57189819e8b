// Inbound envelope decoding: direct flight JSON, `data` (string or object), or `data_base64`.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde_json::Value;
use tracing::debug;

use crate::error::MalformedEvent;
use crate::models::FlightUpdate;

/// A decoded event: the canonical record plus the payload it came from (kept for archival).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub flight: FlightUpdate,
    pub payload: Value,
}

/// Decodes one inbound request body.
///
/// A `data` string that is not JSON is passed through as a degenerate record:
/// every flight field is defaulted and `payload` holds the raw string.
pub fn normalize(body: &[u8]) -> Result<NormalizedEvent, MalformedEvent> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(MalformedEvent::EmptyBody);
    }
    let envelope: Value = serde_json::from_slice(body).map_err(MalformedEvent::InvalidJson)?;
    let payload = extract_payload(envelope)?;
    let flight = match &payload {
        Value::Object(obj) => FlightUpdate::from_json_object(obj),
        _ => FlightUpdate::default(),
    };
    Ok(NormalizedEvent { flight, payload })
}

fn extract_payload(envelope: Value) -> Result<Value, MalformedEvent> {
    let Value::Object(mut fields) = envelope else {
        return Err(MalformedEvent::NoFlightData);
    };

    if let Some(data) = fields.remove("data") {
        return match data {
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(parsed) => non_empty(parsed),
                Err(e) => {
                    debug!(error = %e, "data field is not JSON; passing raw string through");
                    non_empty(Value::String(raw))
                }
            },
            other => non_empty(other),
        };
    }

    if let Some(encoded) = fields.get("data_base64").and_then(Value::as_str) {
        let decoded = BASE64_STANDARD.decode(encoded.trim())?;
        let parsed = serde_json::from_slice(&decoded).map_err(MalformedEvent::Base64Json)?;
        return non_empty(parsed);
    }

    non_empty(Value::Object(fields))
}

fn non_empty(payload: Value) -> Result<Value, MalformedEvent> {
    let empty = match &payload {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(m) => m.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    };
    if empty {
        Err(MalformedEvent::NoFlightData)
    } else {
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_string_takes_precedence_over_body_fields() {
        let body = json!({
            "data": "{\"icao24\":\"abc123\",\"callsign\":\"DL100\"}",
            "icao24": "ignored",
        });
        let event = normalize(body.to_string().as_bytes()).unwrap();
        assert_eq!(event.flight.icao24, "abc123");
        assert_eq!(event.flight.callsign, "DL100");
    }

    #[test]
    fn null_data_is_malformed() {
        let err = normalize(br#"{"data": null}"#).unwrap_err();
        assert!(matches!(err, MalformedEvent::NoFlightData));
    }

    #[test]
    fn whitespace_body_is_empty() {
        let err = normalize(b"  \n").unwrap_err();
        assert!(matches!(err, MalformedEvent::EmptyBody));
    }
}
