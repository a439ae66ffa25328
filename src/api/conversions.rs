use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::AppState;
use crate::services::conversion_service::{self, ConversionDto};
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
pub struct ListConversionsQuery {
    pub client_id: Option<String>,
}

/// POST /api/conversions - Record a forwarded ad event for auditing
pub async fn record_conversion(
    State(state): State<AppState>,
    Json(payload): Json<ConversionDto>,
) -> impl IntoResponse {
    match conversion_service::record_conversion(&state.conn, payload).await {
        Ok(conversion) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "conversion": conversion
            })),
        )
            .into_response(),
        Err(ServiceError::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": msg
            })),
        )
            .into_response(),
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

/// GET /api/conversions - List recorded conversions, optionally per client
pub async fn list_conversions(
    State(state): State<AppState>,
    Query(params): Query<ListConversionsQuery>,
) -> impl IntoResponse {
    match conversion_service::list_conversions(&state.conn, params.client_id).await {
        Ok(conversions) => (
            StatusCode::OK,
            Json(json!({
                "conversions": conversions,
                "total": conversions.len()
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
