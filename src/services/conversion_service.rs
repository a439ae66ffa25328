//! Conversion Recorder - persists a copy of every dispatched ad event.
//!
//! Rows capture intent to send, not confirmed delivery, so reconciliation
//! against the ad platform stays possible even when the pixel call failed.

use sea_orm::*;
use serde::Deserialize;

use crate::models::conversion::{self, Entity as Conversion};
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
pub struct ConversionDto {
    pub client_id: Option<String>,
    pub event_name: String,
    #[serde(default)]
    pub event_value: f64,
    pub facebook_event_id: Option<String>,
    pub pixel_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Insert one conversion row with a server-side timestamp and generated id.
pub async fn record_conversion(
    db: &DatabaseConnection,
    dto: ConversionDto,
) -> Result<conversion::Model, ServiceError> {
    if dto.event_name.trim().is_empty() {
        return Err(ServiceError::Validation(
            "event_name is required".to_string(),
        ));
    }

    let now = chrono::Utc::now().to_rfc3339();

    let row = conversion::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        client_id: Set(dto.client_id),
        event_name: Set(dto.event_name),
        event_value: Set(dto.event_value),
        facebook_event_id: Set(dto.facebook_event_id),
        pixel_id: Set(dto.pixel_id),
        metadata: Set(dto.metadata.map(|m| m.to_string())),
        created_at: Set(now),
    };

    let saved = row.insert(db).await?;
    Ok(saved)
}

/// List recorded conversions, optionally scoped to one client, newest first.
pub async fn list_conversions(
    db: &DatabaseConnection,
    client_id: Option<String>,
) -> Result<Vec<conversion::Model>, ServiceError> {
    let mut query = Conversion::find().order_by_desc(conversion::Column::CreatedAt);

    if let Some(client_id) = client_id {
        query = query.filter(conversion::Column::ClientId.eq(client_id));
    }

    let rows = query.all(db).await?;
    Ok(rows)
}
