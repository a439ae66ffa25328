use std::sync::Arc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

use crate::meta_ads::MetaAdsClient;
use crate::pixel::PixelClient;

/// Shared handler state: database connection plus the two outbound clients.
#[derive(Clone)]
pub struct AppState {
    pub conn: DatabaseConnection,
    pub pixel: Arc<PixelClient>,
    pub ads: Arc<MetaAdsClient>,
}

impl AppState {
    pub fn new(conn: DatabaseConnection, pixel: PixelClient, ads: MetaAdsClient) -> Self {
        Self {
            conn,
            pixel: Arc::new(pixel),
            ads: Arc::new(ads),
        }
    }
}

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());

    // Every pooled connection to an in-memory SQLite database sees its own
    // empty database, so those must stay on a single connection.
    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        options.max_connections(1);
    }

    let db = Database::connect(options).await?;

    run_migrations(&db).await?;

    Ok(db)
}

/// Idempotent schema provisioning. Also exposed through POST /api/setup-database.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create clients table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS clients (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT,
            whatsapp TEXT,
            source TEXT NOT NULL CHECK (source IN ('whatsapp', 'facebook_ads', 'organic', 'referral')) DEFAULT 'whatsapp',
            status TEXT NOT NULL CHECK (status IN ('lead', 'contacted', 'qualified', 'converted', 'lost')) DEFAULT 'lead',
            conversion_value REAL NOT NULL DEFAULT 0,
            utm_source TEXT,
            utm_medium TEXT,
            utm_campaign TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create conversions table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS conversions (
            id TEXT PRIMARY KEY,
            client_id TEXT REFERENCES clients(id) ON DELETE CASCADE,
            event_name TEXT NOT NULL,
            event_value REAL NOT NULL DEFAULT 0,
            facebook_event_id TEXT,
            pixel_id TEXT,
            metadata TEXT,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Indexes
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE INDEX IF NOT EXISTS idx_clients_email ON clients(email);
        CREATE INDEX IF NOT EXISTS idx_clients_source ON clients(source);
        CREATE INDEX IF NOT EXISTS idx_clients_status ON clients(status);
        CREATE INDEX IF NOT EXISTS idx_clients_created_at ON clients(created_at);
        CREATE INDEX IF NOT EXISTS idx_conversions_client_id ON conversions(client_id);
        CREATE INDEX IF NOT EXISTS idx_conversions_event_name ON conversions(event_name);
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}
