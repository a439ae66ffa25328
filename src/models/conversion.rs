use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit record of an event forwarded to the ad platform. Captures intent to
/// send, not confirmed delivery. Rows are never updated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: Option<String>,
    pub event_name: String,
    pub event_value: f64,
    /// Correlation id for deduplication on the ad-platform side.
    pub facebook_event_id: Option<String>,
    pub pixel_id: Option<String>,
    /// Arbitrary JSON context (channel, utm tags, originating action).
    pub metadata: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
