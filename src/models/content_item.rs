//! ContentItem entity model
//!
//! This module contains the SeaORM entity model for the content_items table.
//! Items carry the structured `data` document plus the editorial status that
//! gates syndication; only published items are eligible.

use super::content_type::Entity as ContentType;
use super::organization::Entity as Organization;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// ContentItem entity representing one authored content document
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content_items")]
pub struct Model {
    /// Unique identifier for the content item (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Organization identifier for multi-tenancy
    pub organization_id: Uuid,

    /// Content type this item was authored against
    pub content_type_id: Uuid,

    /// Editorial title of the item
    pub title: String,

    /// Structured field values keyed by the content type's field names
    #[sea_orm(column_type = "JsonBinary")]
    pub data: JsonValue,

    /// Editorial status (one of: draft, published, archived)
    pub status: String,

    /// Timestamp when the content item was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the content item was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Organization",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "ContentType",
        from = "Column::ContentTypeId",
        to = "super::content_type::Column::Id"
    )]
    ContentType,
}

impl Related<Organization> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<ContentType> for Entity {
    fn to() -> RelationDef {
        Relation::ContentType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
