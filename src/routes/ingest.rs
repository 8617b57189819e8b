// POST /flight-update

use axum::{Json, body::Bytes, extract::State};
use serde_json::{Value, json};

use super::AppState;
use crate::engine::IngestOutcome;

/// Always acknowledges with 200 so the deliverer does not redeliver;
/// the body's `status` says whether the event was accepted.
pub(super) async fn flight_update(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    match state.engine.ingest(&body) {
        Ok(IngestOutcome::Recorded) => Json(json!({ "status": "success" })),
        Ok(IngestOutcome::AlertRaised(alert)) => Json(json!({
            "status": "success",
            "alert_id": alert.alert_id,
            "squawk_code": alert.squawk_code,
        })),
        Err(e) => Json(json!({ "status": "error", "message": e.to_string() })),
    }
}
