use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Acquisition channel a lead came in through. Closed set, enforced by the
/// CHECK constraint on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    #[sea_orm(string_value = "whatsapp")]
    Whatsapp,
    #[sea_orm(string_value = "facebook_ads")]
    FacebookAds,
    #[sea_orm(string_value = "organic")]
    Organic,
    #[sea_orm(string_value = "referral")]
    Referral,
}

impl LeadSource {
    pub fn label(&self) -> &'static str {
        match self {
            LeadSource::Whatsapp => "WhatsApp",
            LeadSource::FacebookAds => "Facebook Ads",
            LeadSource::Organic => "Organic",
            LeadSource::Referral => "Referral",
        }
    }
}

/// Position in the sales funnel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum FunnelStatus {
    #[sea_orm(string_value = "lead")]
    Lead,
    #[sea_orm(string_value = "contacted")]
    Contacted,
    #[sea_orm(string_value = "qualified")]
    Qualified,
    #[sea_orm(string_value = "converted")]
    Converted,
    #[sea_orm(string_value = "lost")]
    Lost,
}

impl FunnelStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FunnelStatus::Lead => "Lead",
            FunnelStatus::Contacted => "Contacted",
            FunnelStatus::Qualified => "Qualified",
            FunnelStatus::Converted => "Converted",
            FunnelStatus::Lost => "Lost",
        }
    }

    /// Badge color used by the dashboard table.
    pub fn color(&self) -> &'static str {
        match self {
            FunnelStatus::Lead => "gray",
            FunnelStatus::Contacted => "blue",
            FunnelStatus::Qualified => "amber",
            FunnelStatus::Converted => "green",
            FunnelStatus::Lost => "red",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub source: LeadSource,
    pub status: FunnelStatus,
    pub conversion_value: f64,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::conversion::Entity")]
    Conversion,
}

impl Related<super::conversion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
