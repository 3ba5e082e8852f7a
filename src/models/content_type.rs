//! ContentType entity model
//!
//! This module contains the SeaORM entity model for the content_types table,
//! which holds the ordered field schema content items are authored against.

use super::organization::Entity as Organization;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// ContentType entity describing the shape of content item data
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content_types")]
pub struct Model {
    /// Unique identifier for the content type (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Organization identifier for multi-tenancy
    pub organization_id: Uuid,

    /// Display name of the content type
    pub name: String,

    /// URL-safe identifier derived from the name
    pub slug: String,

    /// Ordered list of field definitions (name, type, required, options)
    #[sea_orm(column_type = "JsonBinary")]
    pub schema: JsonValue,

    /// Timestamp when the content type was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the content type was last updated
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
}

impl Related<Organization> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
