use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::AppState;
use crate::meta_ads::MetaAdsError;

#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    pub account_id: Option<String>,
}

/// Pull the externally-obtained graph token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn ads_error_response(e: MetaAdsError) -> axum::response::Response {
    match e {
        MetaAdsError::Upstream(msg) => {
            (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
        }
        MetaAdsError::Request(msg) => {
            tracing::error!("graph API request failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to reach the Meta graph API"})),
            )
                .into_response()
        }
    }
}

/// GET /api/facebook/accounts - Ad accounts visible to the supplied token
pub async fn list_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Missing Meta access token"})),
        )
            .into_response();
    };

    match state.ads.list_ad_accounts(&token).await {
        Ok(accounts) => (
            StatusCode::OK,
            Json(json!({
                "accounts": accounts,
                "total": accounts.len()
            })),
        )
            .into_response(),
        Err(e) => ads_error_response(e),
    }
}

/// GET /api/facebook/campaigns?account_id=... - Campaigns with merged insights
pub async fn list_campaigns(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListCampaignsQuery>,
) -> impl IntoResponse {
    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Missing Meta access token"})),
        )
            .into_response();
    };

    let Some(account_id) = params.account_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "account_id is required"})),
        )
            .into_response();
    };

    match state.ads.list_campaigns(&token, &account_id).await {
        Ok(campaigns) => (
            StatusCode::OK,
            Json(json!({
                "campaigns": campaigns,
                "total": campaigns.len()
            })),
        )
            .into_response(),
        Err(e) => ads_error_response(e),
    }
}
