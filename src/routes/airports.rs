// Airport tracker views

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use super::AppState;
use crate::tracker::{AirportConfig, TrackStatus};

pub(super) async fn list(State(state): State<AppState>) -> Json<Vec<AirportConfig>> {
    Json(state.engine.tracker().airports().to_vec())
}

pub(super) async fn arrivals(state: State<AppState>, code: Path<String>) -> Json<Value> {
    flights_with_status(state, code, Some(TrackStatus::Arriving), "arrivals")
}

pub(super) async fn departures(state: State<AppState>, code: Path<String>) -> Json<Value> {
    flights_with_status(state, code, Some(TrackStatus::Departing), "departures")
}

/// Every flight tracked at the airport, whatever its status.
pub(super) async fn nearby(state: State<AppState>, code: Path<String>) -> Json<Value> {
    flights_with_status(state, code, None, "flights")
}

fn flights_with_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
    status: Option<TrackStatus>,
    field: &str,
) -> Json<Value> {
    let code = code.to_uppercase();
    let flights = state.engine.tracker().flights_at(&code, status);
    let mut body = json!({
        "airport_code": code,
        "count": flights.len(),
    });
    body[field] = json!(flights);
    Json(body)
}

pub(super) async fn all_flights(State(state): State<AppState>) -> Json<Value> {
    let flights = state.engine.tracker().all_flights();
    Json(json!({ "count": flights.len(), "flights": flights }))
}
