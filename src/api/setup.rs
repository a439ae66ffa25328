use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::db::{self, AppState};

/// POST /api/setup-database - Idempotently (re)provision tables and indexes.
/// Migrations also run at startup; this endpoint exists as an explicit
/// re-provision hook and is not part of normal runtime traffic.
#[utoipa::path(
    post,
    path = "/api/setup-database",
    responses(
        (status = 200, description = "Schema provisioned"),
        (status = 500, description = "Provisioning failed")
    )
)]
pub async fn setup_database(State(state): State<AppState>) -> impl IntoResponse {
    match db::run_migrations(&state.conn).await {
        Ok(()) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": e.to_string()
            })),
        )
            .into_response(),
    }
}
