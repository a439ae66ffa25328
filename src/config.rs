use std::env;

use crate::meta_ads;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// ISO 4217 currency code attached to every tracked event.
    pub currency: String,
    /// Default Meta pixel id stamped on recorded conversions.
    pub pixel_id: Option<String>,
    /// Collection endpoint the pixel client POSTs events to.
    /// When unset, events are silently skipped (tracking unavailable).
    pub pixel_endpoint: Option<String>,
    /// Base URL of the Meta graph API (overridable for tests).
    pub graph_api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://leadpulse.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "BRL".to_string()),
            pixel_id: env::var("FACEBOOK_PIXEL_ID").ok(),
            pixel_endpoint: env::var("PIXEL_ENDPOINT").ok(),
            graph_api_url: env::var("GRAPH_API_URL")
                .unwrap_or_else(|_| meta_ads::DEFAULT_GRAPH_URL.to_string()),
        }
    }
}
