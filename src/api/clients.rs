use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::AppState;
use crate::models::client::{FunnelStatus, LeadSource};
use crate::services::client_service::{self, ClientDto, ClientFilter};
use crate::services::ServiceError;

/// Query parameters for listing clients
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    pub status: Option<FunnelStatus>,
    pub source: Option<LeadSource>,
}

/// POST /api/clients - Register a new client
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<ClientDto>,
) -> impl IntoResponse {
    match client_service::create_client(&state.conn, state.pixel.clone(), payload).await {
        Ok(client) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "client": client
            })),
        )
            .into_response(),
        Err(ServiceError::DuplicateEmail) => (
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "error": "This email is already registered",
                "code": "EMAIL_EXISTS"
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

/// GET /api/clients - List clients with optional funnel/source filters
pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ListClientsQuery>,
) -> impl IntoResponse {
    let filter = ClientFilter {
        status: params.status,
        source: params.source,
    };

    match client_service::list_clients(&state.conn, filter).await {
        Ok(clients) => (
            StatusCode::OK,
            Json(json!({
                "clients": clients,
                "total": clients.len()
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

/// GET /api/clients/:id - Get a single client
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match client_service::get_client(&state.conn, &id).await {
        Ok(client) => (StatusCode::OK, Json(json!({"client": client}))).into_response(),
        Err(ServiceError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Client not found"})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// PUT /api/clients/:id - Update a client (may fire a Purchase event on the
/// transition into converted)
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ClientDto>,
) -> impl IntoResponse {
    match client_service::update_client(&state.conn, state.pixel.clone(), &id, payload).await {
        Ok(client) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "client": client
            })),
        )
            .into_response(),
        Err(ServiceError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": "Client not found"
            })),
        )
            .into_response(),
        Err(ServiceError::DuplicateEmail) => (
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "error": "This email is already registered",
                "code": "EMAIL_EXISTS"
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

/// DELETE /api/clients/:id - Delete a client and its conversion records
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match client_service::delete_client(&state.conn, &id).await {
        Ok(()) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Err(ServiceError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": "Client not found"
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
