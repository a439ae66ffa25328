use std::sync::Arc;

use leadpulse::db;
use leadpulse::models::client::{self, FunnelStatus, LeadSource};
use leadpulse::models::conversion;
use leadpulse::pixel::PixelClient;
use leadpulse::services::client_service::{
    self, event_for_creation, ClientDto, EventContext,
};
use leadpulse::services::{conversion_service, ServiceError};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn test_pixel() -> Arc<PixelClient> {
    Arc::new(PixelClient::new(
        None,
        Some("test_pixel".to_string()),
        "BRL".to_string(),
    ))
}

// Insert a client row directly, bypassing the lifecycle manager so no
// registration side effect runs in the background.
async fn insert_client(
    db: &DatabaseConnection,
    email: &str,
    status: FunnelStatus,
    value: f64,
) -> client::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let row = client::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set("Fixture".to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        whatsapp: Set(None),
        source: Set(LeadSource::Whatsapp),
        status: Set(status),
        conversion_value: Set(value),
        utm_source: Set(None),
        utm_medium: Set(None),
        utm_campaign: Set(None),
        notes: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };
    row.insert(db).await.expect("Failed to insert client")
}

fn dto(name: &str, email: &str, status: FunnelStatus, value: f64) -> ClientDto {
    ClientDto {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        whatsapp: None,
        source: Some(LeadSource::Whatsapp),
        status: Some(status),
        conversion_value: Some(value),
        utm_source: None,
        utm_medium: None,
        utm_campaign: None,
        notes: None,
    }
}

#[tokio::test]
async fn create_then_duplicate_email_is_rejected() {
    let db = setup_test_db().await;
    let pixel = test_pixel();

    let first = client_service::create_client(
        &db,
        pixel.clone(),
        dto("Ana", "ana@x.com", FunnelStatus::Lead, 0.0),
    )
    .await
    .expect("first create should succeed");
    assert_eq!(first.email, "ana@x.com");

    let second = client_service::create_client(
        &db,
        pixel,
        dto("Other Ana", "ana@x.com", FunnelStatus::Lead, 0.0),
    )
    .await;
    assert!(matches!(second, Err(ServiceError::DuplicateEmail)));
}

#[tokio::test]
async fn update_missing_client_is_not_found() {
    let db = setup_test_db().await;

    let result = client_service::update_client(
        &db,
        test_pixel(),
        "missing-id",
        dto("X", "x@x.com", FunnelStatus::Lead, 0.0),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::NotFound)));

    let result = client_service::delete_client(&db, "missing-id").await;
    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[tokio::test]
async fn track_and_record_persists_audit_row_even_without_pixel() {
    let db = setup_test_db().await;
    let pixel = test_pixel();

    let client = insert_client(&db, "beto@x.com", FunnelStatus::Converted, 500.0).await;

    // Await the side effect directly; the pixel is unconfigured, the audit
    // row must be written regardless.
    let event = event_for_creation(&client);
    client_service::track_and_record(&db, &pixel, &client, event, EventContext::Registration)
        .await;

    let rows = conversion::Entity::find()
        .filter(conversion::Column::ClientId.eq(client.id.clone()))
        .filter(conversion::Column::EventName.eq("Purchase - Registration"))
        .all(&db)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_value, 500.0);
    let external_id = rows[0].facebook_event_id.as_deref().unwrap();
    assert!(external_id.contains(&client.id));
}

#[tokio::test]
async fn recorded_conversions_are_listable_per_client() {
    let db = setup_test_db().await;

    let client = insert_client(&db, "caio@x.com", FunnelStatus::Lead, 0.0).await;

    for name in ["Lead - Registration", "Purchase - Status Update"] {
        conversion_service::record_conversion(
            &db,
            conversion_service::ConversionDto {
                client_id: Some(client.id.clone()),
                event_name: name.to_string(),
                event_value: 10.0,
                facebook_event_id: None,
                pixel_id: None,
                metadata: None,
            },
        )
        .await
        .unwrap();
    }

    let rows = conversion_service::list_conversions(&db, Some(client.id.clone()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.client_id.as_deref() == Some(client.id.as_str())));
}

#[tokio::test]
async fn delete_removes_client_and_conversions() {
    let db = setup_test_db().await;

    let client = insert_client(&db, "dora@x.com", FunnelStatus::Converted, 900.0).await;
    let other = insert_client(&db, "eva@x.com", FunnelStatus::Lead, 0.0).await;

    for target in [&client, &client, &other] {
        conversion_service::record_conversion(
            &db,
            conversion_service::ConversionDto {
                client_id: Some(target.id.clone()),
                event_name: "Purchase - Registration".to_string(),
                event_value: target.conversion_value,
                facebook_event_id: None,
                pixel_id: None,
                metadata: None,
            },
        )
        .await
        .unwrap();
    }

    client_service::delete_client(&db, &client.id).await.unwrap();

    let result = client_service::get_client(&db, &client.id).await;
    assert!(matches!(result, Err(ServiceError::NotFound)));

    let rows = conversion_service::list_conversions(&db, Some(client.id.clone()))
        .await
        .unwrap();
    assert!(rows.is_empty());

    // The other client's audit trail is untouched.
    let rows = conversion_service::list_conversions(&db, Some(other.id.clone()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}
