//! # SyncJob Repository
//!
//! This module provides repository operations for the sync_jobs table,
//! encapsulating SeaORM operations with organization-aware access patterns.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::cursor::CursorData;
use crate::models::sync_job::{ActiveModel, Column, Entity, Model};

/// Repository for sync job database operations
pub struct SyncJobRepository {
    db: DatabaseConnection,
}

impl SyncJobRepository {
    /// Create a new SyncJobRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enqueue a new sync job for the organization
    pub async fn create(
        &self,
        organization_id: Uuid,
        trigger: &str,
        created_by: Option<Uuid>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now().fixed_offset();

        let job = ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            status: Set("queued".to_string()),
            trigger: Set(trigger.to_string()),
            created_by: Set(created_by),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
        };

        let result = job.insert(&self.db).await?;

        tracing::info!(
            organization_id = %organization_id,
            job_id = %result.id,
            trigger = %result.trigger,
            "Sync job enqueued"
        );

        Ok(result)
    }

    /// Find a sync job by ID, ensuring it belongs to the specified organization
    pub async fn find_by_org(
        &self,
        organization_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(job_id)
            .filter(Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
    }

    /// List the organization's sync jobs newest first, with keyset pagination
    pub async fn list_by_org(
        &self,
        organization_id: Uuid,
        limit: u64,
        cursor: Option<CursorData>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find()
            .filter(Column::OrganizationId.eq(organization_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit);

        if let Some(cursor) = cursor {
            let created_at = cursor.created_at.fixed_offset();
            query = query.filter(
                Condition::any()
                    .add(Column::CreatedAt.lt(created_at))
                    .add(
                        Condition::all()
                            .add(Column::CreatedAt.eq(created_at))
                            .add(Column::Id.lt(cursor.id)),
                    ),
            );
        }

        query.all(&self.db).await
    }

    /// Update the status of a sync job, setting the timestamps that were provided.
    ///
    /// started_at is written on the queued -> running transition and
    /// completed_at when the job reaches a terminal status.
    pub async fn update_status(
        &self,
        job_id: Uuid,
        status: &str,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), DbErr> {
        let mut update = Entity::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .filter(Column::Id.eq(job_id));

        if let Some(started_at) = started_at {
            update = update.col_expr(Column::StartedAt, Expr::value(started_at.fixed_offset()));
        }

        if let Some(completed_at) = completed_at {
            update = update.col_expr(
                Column::CompletedAt,
                Expr::value(completed_at.fixed_offset()),
            );
        }

        let result = update.exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("sync job {}", job_id)));
        }

        Ok(())
    }
}
