pub mod campaigns;
pub mod clients;
pub mod conversions;
pub mod health;
pub mod metrics;
pub mod setup;

use axum::{
    routing::{get, post},
    Router,
};

use crate::db::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Clients
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/:id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        // Dashboard metrics
        .route("/metrics/dashboard", get(metrics::dashboard))
        // Conversions audit trail
        .route(
            "/conversions",
            get(conversions::list_conversions).post(conversions::record_conversion),
        )
        // Meta Ads proxy
        .route("/facebook/accounts", get(campaigns::list_accounts))
        .route("/facebook/campaigns", get(campaigns::list_campaigns))
        // Provisioning
        .route("/setup-database", post(setup::setup_database))
        .with_state(state)
}
