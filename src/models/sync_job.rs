//! SyncJob entity model
//!
//! This module contains the SeaORM entity model for the sync_jobs table,
//! which represents one organization-wide syndication run with a monotonic
//! queued/running/terminal lifecycle.

use super::organization::Entity as Organization;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// SyncJob entity representing one syndication run
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_jobs")]
pub struct Model {
    /// Unique identifier for the sync job (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Organization identifier for multi-tenancy
    pub organization_id: Uuid,

    /// Current status of the job (one of: queued, running, success, partial, failed)
    pub status: String,

    /// What started the job (one of: manual, cron)
    pub trigger: String,

    /// User who created the job, when known
    pub created_by: Option<Uuid>,

    /// Timestamp when the job started execution
    pub started_at: Option<DateTimeWithTimeZone>,

    /// Timestamp when the job reached a terminal status
    pub completed_at: Option<DateTimeWithTimeZone>,

    /// Timestamp when the sync job was created
    pub created_at: DateTimeWithTimeZone,
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
