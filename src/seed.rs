use sea_orm::*;

use crate::models::client::{self, FunnelStatus, LeadSource};

/// Insert a handful of demo clients so the dashboard has something to show.
/// Idempotent: re-running skips rows whose email already exists.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let demo: Vec<(&str, &str, LeadSource, FunnelStatus, f64)> = vec![
        (
            "Ana Souza",
            "ana.souza@example.com",
            LeadSource::Whatsapp,
            FunnelStatus::Converted,
            450.0,
        ),
        (
            "Bruno Lima",
            "bruno.lima@example.com",
            LeadSource::FacebookAds,
            FunnelStatus::Qualified,
            0.0,
        ),
        (
            "Carla Mendes",
            "carla.mendes@example.com",
            LeadSource::Organic,
            FunnelStatus::Lead,
            0.0,
        ),
        (
            "Diego Ferreira",
            "diego.ferreira@example.com",
            LeadSource::Referral,
            FunnelStatus::Converted,
            1200.0,
        ),
        (
            "Elisa Castro",
            "elisa.castro@example.com",
            LeadSource::FacebookAds,
            FunnelStatus::Lost,
            0.0,
        ),
    ];

    for (name, email, source, status, value) in demo {
        let now = chrono::Utc::now().to_rfc3339();
        let row = client::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            phone: Set(None),
            whatsapp: Set(None),
            source: Set(source),
            status: Set(status),
            conversion_value: Set(value),
            utm_source: Set(None),
            utm_medium: Set(None),
            utm_campaign: Set(None),
            notes: Set(Some("Demo data".to_owned())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let insert = client::Entity::insert(row)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(client::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
