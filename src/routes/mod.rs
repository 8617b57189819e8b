// HTTP routes: ingestion, alert and fleet-stats queries, airport tracker, health

mod airports;
mod alerts;
mod http;
mod ingest;
mod stats;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::FlightEngine;
use crate::query::QueryService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: Arc<FlightEngine>,
    pub(crate) queries: Arc<QueryService>,
}

pub fn app(engine: Arc<FlightEngine>, queries: Arc<QueryService>) -> Router {
    let state = AppState { engine, queries };
    Router::new()
        .route("/", get(http::dashboard_handler)) // GET /
        .route("/health", get(http::health_handler)) // GET /health
        .route("/version", get(http::version_handler)) // GET /version
        .route("/flight-update", post(ingest::flight_update)) // POST /flight-update
        .route("/api/v1/alerts/active", get(alerts::active)) // GET active alerts
        .route("/api/v1/alerts/history", get(alerts::history)) // GET ?limit=50
        .route("/api/v1/alerts/clear-all", delete(alerts::clear_all)) // DELETE all
        .route("/api/v1/alerts/{alert_id}", delete(alerts::clear)) // DELETE one
        .route("/api/v1/fleet/stats/summary", get(stats::summary))
        .route("/api/v1/fleet/stats/by-airline", get(stats::by_airline))
        .route("/api/v1/fleet/stats/by-origin", get(stats::by_origin))
        .route("/api/v1/fleet/stats/by-destination", get(stats::by_destination))
        .route("/api/v1/fleet/stats/by-aircraft-type", get(stats::by_aircraft_type))
        .route(
            "/api/v1/fleet/stats/airlines-with-min-flights",
            get(stats::airlines_with_min_flights),
        ) // GET ?min_flights=10
        .route("/api/v1/airports", get(airports::list))
        .route("/api/v1/airports/{code}/arrivals", get(airports::arrivals))
        .route("/api/v1/airports/{code}/departures", get(airports::departures))
        .route("/api/v1/airports/{code}/nearby", get(airports::nearby))
        .route("/api/v1/flights/all", get(airports::all_flights))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
