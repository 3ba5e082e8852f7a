//! Site entity model
//!
//! This module contains the SeaORM entity model for the sites table. A site is
//! one syndication destination; it owns the shared signing secret and the
//! last-attempt sync status columns the orchestrator maintains.

use super::organization::Entity as Organization;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Site entity representing a syndication destination
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sites")]
pub struct Model {
    /// Unique identifier for the site (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Organization identifier for multi-tenancy
    pub organization_id: Uuid,

    /// Display name of the site
    pub name: String,

    /// URL-safe identifier, also used as the destination tag on the wire
    pub slug: String,

    /// Destination endpoint the payload is delivered to
    pub destination_url: String,

    /// Shared key for signing and verifying payloads delivered to this site
    pub destination_secret: String,

    /// Outcome of the most recent sync attempt (one of: success, failed; null before first attempt)
    pub last_sync_status: Option<String>,

    /// Timestamp of the most recent sync attempt
    pub last_sync_at: Option<DateTimeWithTimeZone>,

    /// Timestamp when the site was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the site was last updated
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
