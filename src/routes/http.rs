// GET handlers: dashboard, health, version

use axum::response::{Html, IntoResponse};

use crate::version::{NAME, VERSION};

/// GET /: alerts and fleet-stats page; polls the JSON endpoints.
pub(super) async fn dashboard_handler() -> impl IntoResponse {
    Html(include_str!("dashboard.html"))
}

/// GET /health
pub(super) async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": NAME,
    }))
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
