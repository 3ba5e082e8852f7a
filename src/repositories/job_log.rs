//! # JobLog Repository
//!
//! This module provides append and read operations for the job_logs table.
//! The table is append-only: there is deliberately no update or delete path.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::job_log::{ActiveModel, Column, Entity, Model};

/// Repository for job log database operations
pub struct JobLogRepository {
    db: DatabaseConnection,
}

impl JobLogRepository {
    /// Create a new JobLogRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one entry to a job's audit trail
    pub async fn append(
        &self,
        job_id: Uuid,
        level: &str,
        message: &str,
        site_id: Option<Uuid>,
        content_item_id: Option<Uuid>,
        payload: Option<JsonValue>,
    ) -> Result<Model, DbErr> {
        let entry = ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(job_id),
            level: Set(level.to_string()),
            message: Set(message.to_string()),
            site_id: Set(site_id),
            content_item_id: Set(content_item_id),
            payload: Set(payload),
            created_at: Set(Utc::now().fixed_offset()),
        };

        entry.insert(&self.db).await
    }

    /// Read a job's audit trail in emission order
    pub async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::JobId.eq(job_id))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
