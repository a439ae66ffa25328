use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::metrics::dashboard,
        api::setup::setup_database,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "leadpulse", description = "LeadPulse API")
    )
)]
pub struct ApiDoc;
