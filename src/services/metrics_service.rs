//! Metrics Aggregator - pure fold from the current client set to the
//! dashboard figures. No hidden state; recomputed on every read.

use std::collections::BTreeMap;

use sea_orm::{ActiveEnum, DatabaseConnection, EntityTrait};
use serde::Serialize;

use crate::models::client::{self, Entity as Client, FunnelStatus};
use crate::services::ServiceError;

#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_clients: u64,
    pub total_conversions: u64,
    pub total_revenue: f64,
    /// Converted share of all clients, as a percentage. 0 when there are no clients.
    pub conversion_rate: f64,
    /// Revenue per conversion. 0 when there are no conversions.
    pub average_ticket: f64,
    pub leads_by_source: BTreeMap<String, u64>,
    pub clients_by_status: BTreeMap<String, u64>,
}

pub fn compute_metrics(clients: &[client::Model]) -> DashboardMetrics {
    let total_clients = clients.len() as u64;

    let converted: Vec<&client::Model> = clients
        .iter()
        .filter(|c| c.status == FunnelStatus::Converted)
        .collect();

    let total_conversions = converted.len() as u64;
    let total_revenue: f64 = converted.iter().map(|c| c.conversion_value).sum();

    let conversion_rate = if total_clients > 0 {
        (total_conversions as f64 / total_clients as f64) * 100.0
    } else {
        0.0
    };

    let average_ticket = if total_conversions > 0 {
        total_revenue / total_conversions as f64
    } else {
        0.0
    };

    let mut leads_by_source: BTreeMap<String, u64> = BTreeMap::new();
    let mut clients_by_status: BTreeMap<String, u64> = BTreeMap::new();

    for client in clients {
        *leads_by_source.entry(client.source.to_value()).or_insert(0) += 1;
        *clients_by_status
            .entry(client.status.to_value())
            .or_insert(0) += 1;
    }

    DashboardMetrics {
        total_clients,
        total_conversions,
        total_revenue,
        conversion_rate,
        average_ticket,
        leads_by_source,
        clients_by_status,
    }
}

/// Load the current client set and fold it into dashboard metrics.
pub async fn dashboard_metrics(db: &DatabaseConnection) -> Result<DashboardMetrics, ServiceError> {
    let clients = Client::find().all(db).await?;
    Ok(compute_metrics(&clients))
}
