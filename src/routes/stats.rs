// Fleet statistics views

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::AppState;
use crate::models::Dimension;
use crate::query::{Breakdown, FleetSummary, MinFlightsView, SUMMARY_MIN_FLIGHTS};

#[derive(Debug, Deserialize)]
pub(super) struct MinFlightsParams {
    min_flights: Option<i64>,
}

pub(super) async fn summary(State(state): State<AppState>) -> Json<FleetSummary> {
    Json(state.queries.summary())
}

pub(super) async fn by_airline(State(state): State<AppState>) -> Json<Breakdown> {
    Json(state.queries.breakdown(Dimension::Airline))
}

pub(super) async fn by_origin(State(state): State<AppState>) -> Json<Breakdown> {
    Json(state.queries.breakdown(Dimension::Origin))
}

pub(super) async fn by_destination(State(state): State<AppState>) -> Json<Breakdown> {
    Json(state.queries.breakdown(Dimension::Destination))
}

pub(super) async fn by_aircraft_type(State(state): State<AppState>) -> Json<Breakdown> {
    Json(state.queries.breakdown(Dimension::AircraftType))
}

pub(super) async fn airlines_with_min_flights(
    State(state): State<AppState>,
    Query(params): Query<MinFlightsParams>,
) -> Json<MinFlightsView> {
    let min_flights = params.min_flights.unwrap_or(SUMMARY_MIN_FLIGHTS);
    Json(state.queries.airlines_with_min_flights(min_flights))
}
