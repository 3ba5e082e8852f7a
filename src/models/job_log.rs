//! JobLog entity model
//!
//! This module contains the SeaORM entity model for the job_logs table, the
//! append-only audit trail the orchestrator writes while a sync job runs.

use super::sync_job::Entity as SyncJob;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// JobLog entity representing one audit trail entry scoped to a job
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "job_logs")]
pub struct Model {
    /// Unique identifier for the log entry (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Job this entry belongs to
    pub job_id: Uuid,

    /// Severity of the entry (one of: info, warn, error)
    pub level: String,

    /// Human-readable log message
    pub message: String,

    /// Site this entry is scoped to, when site-specific
    pub site_id: Option<Uuid>,

    /// Content item this entry is scoped to, when item-specific
    pub content_item_id: Option<Uuid>,

    /// Structured context attached to the entry
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Option<JsonValue>,

    /// Timestamp when the entry was appended
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "SyncJob",
        from = "Column::JobId",
        to = "super::sync_job::Column::Id"
    )]
    SyncJob,
}

impl Related<SyncJob> for Entity {
    fn to() -> RelationDef {
        Relation::SyncJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
