//! Client Lifecycle Manager - create/update/delete of client records and the
//! funnel-event decisions they trigger.
//!
//! Event dispatch is deliberately decoupled from the primary write: the pixel
//! call and the conversion insert run on a spawned task whose outcome is
//! logged and discarded, so saving a client never waits on the ad platform.

use std::sync::Arc;

use sea_orm::*;
use serde::Deserialize;

use crate::models::client::{self, Entity as Client, FunnelStatus, LeadSource};
use crate::models::conversion::{self, Entity as Conversion};
use crate::pixel::PixelClient;
use crate::services::conversion_service::{self, ConversionDto};
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
pub struct ClientDto {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub status: Option<FunnelStatus>,
    #[serde(default)]
    pub conversion_value: Option<f64>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Filter parameters for listing clients
#[derive(Debug, Default, Clone)]
pub struct ClientFilter {
    pub status: Option<FunnelStatus>,
    pub source: Option<LeadSource>,
}

/// Commerce event decided by a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FunnelEvent {
    Purchase { value: f64 },
    Lead { value: f64 },
}

impl FunnelEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            FunnelEvent::Purchase { .. } => "Purchase",
            FunnelEvent::Lead { .. } => "Lead",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            FunnelEvent::Purchase { value } | FunnelEvent::Lead { value } => *value,
        }
    }
}

/// Which lifecycle action produced the event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventContext {
    Registration,
    StatusUpdate,
}

impl EventContext {
    fn label(&self) -> &'static str {
        match self {
            EventContext::Registration => "Registration",
            EventContext::StatusUpdate => "Status Update",
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            EventContext::Registration => "client_registration",
            EventContext::StatusUpdate => "status_update",
        }
    }
}

/// Event fired on every successful creation: Purchase when the record is born
/// converted with a positive value, Lead otherwise.
pub fn event_for_creation(client: &client::Model) -> FunnelEvent {
    if client.status == FunnelStatus::Converted && client.conversion_value > 0.0 {
        FunnelEvent::Purchase {
            value: client.conversion_value,
        }
    } else {
        FunnelEvent::Lead {
            value: client.conversion_value,
        }
    }
}

/// Event fired by an edit, if any. Only the "not converted" -> "converted"
/// transition with a positive value qualifies; edits of an already-converted
/// client never re-fire.
pub fn event_for_transition(
    previous: FunnelStatus,
    client: &client::Model,
) -> Option<FunnelEvent> {
    if previous != FunnelStatus::Converted
        && client.status == FunnelStatus::Converted
        && client.conversion_value > 0.0
    {
        Some(FunnelEvent::Purchase {
            value: client.conversion_value,
        })
    } else {
        None
    }
}

fn validate(dto: &ClientDto) -> Result<(), ServiceError> {
    if dto.name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    if dto.email.trim().is_empty() {
        return Err(ServiceError::Validation("email is required".to_string()));
    }
    if dto.conversion_value.unwrap_or(0.0) < 0.0 {
        return Err(ServiceError::Validation(
            "conversion_value must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn map_insert_err(e: DbErr) -> ServiceError {
    // The pre-insert lookup already surfaces most duplicates; this catches the
    // race where two requests pass the check with the same email.
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed: clients.email") {
        ServiceError::DuplicateEmail
    } else {
        ServiceError::Database(msg)
    }
}

/// Create a new client and fire exactly one registration event.
pub async fn create_client(
    db: &DatabaseConnection,
    pixel: Arc<PixelClient>,
    dto: ClientDto,
) -> Result<client::Model, ServiceError> {
    validate(&dto)?;

    // Explicit lookup so "email already exists" is reported as its own error
    // instead of an opaque constraint violation.
    let existing = Client::find()
        .filter(client::Column::Email.eq(dto.email.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ServiceError::DuplicateEmail);
    }

    let now = chrono::Utc::now().to_rfc3339();

    let new_client = client::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(dto.name),
        email: Set(dto.email),
        phone: Set(dto.phone),
        whatsapp: Set(dto.whatsapp),
        source: Set(dto.source.unwrap_or(LeadSource::Whatsapp)),
        status: Set(dto.status.unwrap_or(FunnelStatus::Lead)),
        conversion_value: Set(dto.conversion_value.unwrap_or(0.0)),
        utm_source: Set(dto.utm_source),
        utm_medium: Set(dto.utm_medium),
        utm_campaign: Set(dto.utm_campaign),
        notes: Set(dto.notes),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    let saved = new_client.insert(db).await.map_err(map_insert_err)?;

    let event = event_for_creation(&saved);
    dispatch_funnel_event(
        db.clone(),
        pixel,
        saved.clone(),
        event,
        EventContext::Registration,
    );

    Ok(saved)
}

/// Update a client; fires a Purchase event iff the edit moves the record into
/// the converted status with a positive value.
pub async fn update_client(
    db: &DatabaseConnection,
    pixel: Arc<PixelClient>,
    id: &str,
    dto: ClientDto,
) -> Result<client::Model, ServiceError> {
    validate(&dto)?;

    let existing = Client::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let previous_status = existing.status;
    let now = chrono::Utc::now().to_rfc3339();

    let mut active: client::ActiveModel = existing.into();
    active.name = Set(dto.name);
    active.email = Set(dto.email);
    active.phone = Set(dto.phone);
    active.whatsapp = Set(dto.whatsapp);
    if let Some(source) = dto.source {
        active.source = Set(source);
    }
    if let Some(status) = dto.status {
        active.status = Set(status);
    }
    if let Some(value) = dto.conversion_value {
        active.conversion_value = Set(value);
    }
    active.utm_source = Set(dto.utm_source);
    active.utm_medium = Set(dto.utm_medium);
    active.utm_campaign = Set(dto.utm_campaign);
    active.notes = Set(dto.notes);
    active.updated_at = Set(now);

    let updated = active.update(db).await.map_err(map_insert_err)?;

    if let Some(event) = event_for_transition(previous_status, &updated) {
        dispatch_funnel_event(
            db.clone(),
            pixel,
            updated.clone(),
            event,
            EventContext::StatusUpdate,
        );
    }

    Ok(updated)
}

/// Delete a client and its conversion records.
pub async fn delete_client(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let existing = Client::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    // Cascade is declared on the schema; the explicit delete keeps the
    // behavior independent of the connection's foreign-key pragma. Both
    // deletes commit together so a failure cannot orphan the audit trail.
    let txn = db.begin().await?;

    Conversion::delete_many()
        .filter(conversion::Column::ClientId.eq(existing.id.clone()))
        .exec(&txn)
        .await?;

    Client::delete_by_id(existing.id).exec(&txn).await?;

    txn.commit().await?;

    Ok(())
}

pub async fn get_client(
    db: &DatabaseConnection,
    id: &str,
) -> Result<client::Model, ServiceError> {
    Client::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// List clients, newest first, with optional funnel/source filters.
pub async fn list_clients(
    db: &DatabaseConnection,
    filter: ClientFilter,
) -> Result<Vec<client::Model>, ServiceError> {
    let mut condition = Condition::all();

    if let Some(status) = filter.status {
        condition = condition.add(client::Column::Status.eq(status));
    }

    if let Some(source) = filter.source {
        condition = condition.add(client::Column::Source.eq(source));
    }

    let clients = Client::find()
        .filter(condition)
        .order_by_desc(client::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(clients)
}

/// Spawn the fire-and-forget side effects for one decided event: the pixel
/// call and the audit insert. Failures are logged, never propagated.
pub fn dispatch_funnel_event(
    db: DatabaseConnection,
    pixel: Arc<PixelClient>,
    client: client::Model,
    event: FunnelEvent,
    context: EventContext,
) {
    tokio::spawn(async move {
        track_and_record(&db, &pixel, &client, event, context).await;
    });
}

/// Emit the event to the pixel and mirror it into the conversions table.
/// Factored out of the spawned task so tests can await it directly.
pub async fn track_and_record(
    db: &DatabaseConnection,
    pixel: &PixelClient,
    client: &client::Model,
    event: FunnelEvent,
    context: EventContext,
) {
    let sent = match event {
        FunnelEvent::Purchase { value } => {
            pixel
                .track_purchase(value, &[format!("client_{}", client.id)])
                .await
        }
        FunnelEvent::Lead { value } => pixel.track_lead(value).await,
    };

    if !sent {
        tracing::debug!(
            "pixel unavailable for {} event on client {}",
            event.kind(),
            client.id
        );
    }

    // Unique per logical occurrence so the ad platform can deduplicate.
    let external_event_id = format!(
        "{}_{}_{}_{}",
        context.tag(),
        event.kind().to_lowercase(),
        client.id,
        chrono::Utc::now().timestamp_millis()
    );

    let dto = ConversionDto {
        client_id: Some(client.id.clone()),
        event_name: format!("{} - {}", event.kind(), context.label()),
        event_value: event.value(),
        facebook_event_id: Some(external_event_id),
        pixel_id: pixel.pixel_id().map(str::to_owned),
        metadata: Some(serde_json::json!({
            "currency": pixel.currency(),
            "source": client.source,
            "utm_source": client.utm_source,
            "utm_medium": client.utm_medium,
            "utm_campaign": client.utm_campaign,
            "client_email": client.email,
            "content_type": context.tag(),
        })),
    };

    if let Err(e) = conversion_service::record_conversion(db, dto).await {
        tracing::warn!("failed to record conversion for client {}: {}", client.id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client(status: FunnelStatus, conversion_value: f64) -> client::Model {
        client::Model {
            id: "c1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            whatsapp: None,
            source: LeadSource::Whatsapp,
            status,
            conversion_value,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            notes: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn creation_with_converted_status_and_value_is_a_purchase() {
        let client = sample_client(FunnelStatus::Converted, 500.0);
        assert_eq!(
            event_for_creation(&client),
            FunnelEvent::Purchase { value: 500.0 }
        );
    }

    #[test]
    fn creation_as_lead_emits_lead_with_current_value() {
        let client = sample_client(FunnelStatus::Lead, 0.0);
        assert_eq!(event_for_creation(&client), FunnelEvent::Lead { value: 0.0 });

        let client = sample_client(FunnelStatus::Lead, 150.0);
        assert_eq!(
            event_for_creation(&client),
            FunnelEvent::Lead { value: 150.0 }
        );
    }

    #[test]
    fn creation_converted_without_value_falls_back_to_lead() {
        let client = sample_client(FunnelStatus::Converted, 0.0);
        assert_eq!(event_for_creation(&client), FunnelEvent::Lead { value: 0.0 });
    }

    #[test]
    fn transition_into_converted_fires_once() {
        let client = sample_client(FunnelStatus::Converted, 1000.0);
        assert_eq!(
            event_for_transition(FunnelStatus::Qualified, &client),
            Some(FunnelEvent::Purchase { value: 1000.0 })
        );
        assert_eq!(
            event_for_transition(FunnelStatus::Lead, &client),
            Some(FunnelEvent::Purchase { value: 1000.0 })
        );
    }

    #[test]
    fn already_converted_never_refires() {
        let client = sample_client(FunnelStatus::Converted, 1000.0);
        assert_eq!(event_for_transition(FunnelStatus::Converted, &client), None);
    }

    #[test]
    fn non_converting_transitions_are_silent() {
        let client = sample_client(FunnelStatus::Qualified, 1000.0);
        assert_eq!(event_for_transition(FunnelStatus::Lead, &client), None);

        let client = sample_client(FunnelStatus::Lost, 1000.0);
        assert_eq!(event_for_transition(FunnelStatus::Qualified, &client), None);
    }

    #[test]
    fn conversion_without_value_is_silent() {
        let client = sample_client(FunnelStatus::Converted, 0.0);
        assert_eq!(event_for_transition(FunnelStatus::Lead, &client), None);
    }
}
