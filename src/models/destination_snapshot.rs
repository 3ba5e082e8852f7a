//! DestinationSnapshot entity model
//!
//! One row per site holding the last payload the destination accepted. Each
//! successful delivery overwrites the prior snapshot.

use super::site::Entity as Site;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// DestinationSnapshot entity representing a destination's last accepted state
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "destination_snapshots")]
pub struct Model {
    /// Unique identifier for the snapshot (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Site this snapshot belongs to (unique per site)
    pub site_id: Uuid,

    /// Payload as the destination accepted it
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: JsonValue,

    /// Timestamp when the delivery was accepted
    pub received_at: DateTimeWithTimeZone,

    /// Number of resolved items that produced this payload
    pub item_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Site",
        from = "Column::SiteId",
        to = "super::site::Column::Id"
    )]
    Site,
}

impl Related<Site> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
