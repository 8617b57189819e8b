// Alert ledger queries and clearing

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use crate::query::{ActiveAlertsView, AlertHistoryView};

const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub(super) struct HistoryParams {
    limit: Option<usize>,
}

pub(super) async fn active(State(state): State<AppState>) -> Json<ActiveAlertsView> {
    Json(state.queries.active_alerts())
}

/// GET /api/v1/alerts/history?limit=50: most recent first.
pub(super) async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<AlertHistoryView> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Json(state.queries.alert_history(limit))
}

pub(super) async fn clear(
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> Json<Value> {
    if state.engine.alerts().clear(&alert_id) {
        tracing::info!(alert_id = %alert_id, "Alert cleared");
        Json(json!({ "status": "success", "message": format!("Alert {alert_id} cleared") }))
    } else {
        Json(json!({ "status": "error", "message": "Alert not found" }))
    }
}

pub(super) async fn clear_all(State(state): State<AppState>) -> Json<Value> {
    let count = state.engine.alerts().clear_all();
    tracing::info!(count, "Cleared all active alerts");
    Json(json!({ "status": "success", "message": format!("Cleared {count} alerts") }))
}
