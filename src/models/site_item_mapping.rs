//! SiteItemMapping entity model
//!
//! This module contains the SeaORM entity model for the site_item_mappings
//! table, which pins one content item onto one site with a mapping mode and
//! optional override document. The (site_id, content_item_id) pair is unique.

use super::content_item::Entity as ContentItem;
use super::site::Entity as Site;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// SiteItemMapping entity representing a per-(site, item) syndication rule
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "site_item_mappings")]
pub struct Model {
    /// Unique identifier for the mapping (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Site this mapping applies to
    pub site_id: Uuid,

    /// Content item this mapping applies to
    pub content_item_id: Uuid,

    /// Mapping mode (one of: full, override, block)
    pub mode: String,

    /// Field overrides applied on top of the item data when mode is override
    #[sea_orm(column_type = "JsonBinary")]
    pub overrides: JsonValue,

    /// Timestamp when the mapping was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the mapping was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Site",
        from = "Column::SiteId",
        to = "super::site::Column::Id"
    )]
    Site,
    #[sea_orm(
        belongs_to = "ContentItem",
        from = "Column::ContentItemId",
        to = "super::content_item::Column::Id"
    )]
    ContentItem,
}

impl Related<Site> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl Related<ContentItem> for Entity {
    fn to() -> RelationDef {
        Relation::ContentItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
