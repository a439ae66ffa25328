use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::db::AppState;
use crate::services::metrics_service;

/// GET /api/metrics/dashboard - Aggregate figures over the current client set
#[utoipa::path(
    get,
    path = "/api/metrics/dashboard",
    responses(
        (status = 200, description = "Dashboard metrics recomputed from the client table")
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    match metrics_service::dashboard_metrics(&state.conn).await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
