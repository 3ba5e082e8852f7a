//! # Sync Store
//!
//! The collaborator interface the sync engine consumes, passed into the
//! orchestrator at construction time so tests can substitute an in-memory
//! fake for the database-backed implementation.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::resolver::MappedItem;
use super::{JobStatus, LogLevel, SiteSyncStatus};
use crate::models::site;
use crate::repositories::{
    JobLogRepository, MappingRepository, SiteRepository, SnapshotRepository, SyncJobRepository,
};

/// One entry to append to a job's audit trail.
#[derive(Debug, Clone)]
pub struct NewJobLog {
    pub job_id: Uuid,
    pub level: LogLevel,
    pub message: String,
    pub site_id: Option<Uuid>,
    pub content_item_id: Option<Uuid>,
    pub payload: Option<JsonValue>,
}

impl NewJobLog {
    fn new(job_id: Uuid, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            job_id,
            level,
            message: message.into(),
            site_id: None,
            content_item_id: None,
            payload: None,
        }
    }

    pub fn info(job_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(job_id, LogLevel::Info, message)
    }

    pub fn warn(job_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(job_id, LogLevel::Warn, message)
    }

    pub fn error(job_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(job_id, LogLevel::Error, message)
    }

    /// Scope the entry to a site.
    pub fn for_site(mut self, site_id: Uuid) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Attach structured context to the entry.
    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Storage operations the sync engine depends on.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// All sites belonging to the organization.
    async fn list_sites_for_org(&self, organization_id: Uuid) -> Result<Vec<site::Model>>;

    /// One site's mappings joined with their content items, in stable order.
    async fn list_mappings_for_site(&self, site_id: Uuid) -> Result<Vec<MappedItem>>;

    /// Resolve a destination tag (site slug) to its site row.
    async fn find_site_by_slug(&self, slug: &str) -> Result<Option<site::Model>>;

    /// Overwrite the site's destination snapshot.
    async fn upsert_snapshot(
        &self,
        site_id: Uuid,
        payload: JsonValue,
        item_count: i32,
    ) -> Result<()>;

    /// Record the outcome of the most recent sync attempt for the site.
    async fn update_site_sync_status(
        &self,
        site_id: Uuid,
        status: SiteSyncStatus,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Move the job through its lifecycle, setting whichever timestamps apply.
    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()>;

    /// Append one entry to the job's audit trail.
    async fn append_log(&self, entry: NewJobLog) -> Result<()>;
}

/// Database-backed [`SyncStore`] over the repository layer.
pub struct DbSyncStore {
    sites: SiteRepository,
    mappings: MappingRepository,
    snapshots: SnapshotRepository,
    jobs: SyncJobRepository,
    logs: JobLogRepository,
}

impl DbSyncStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            sites: SiteRepository::new(db.clone()),
            mappings: MappingRepository::new(db.clone()),
            snapshots: SnapshotRepository::new(db.clone()),
            jobs: SyncJobRepository::new(db.clone()),
            logs: JobLogRepository::new(db),
        }
    }
}

#[async_trait]
impl SyncStore for DbSyncStore {
    async fn list_sites_for_org(&self, organization_id: Uuid) -> Result<Vec<site::Model>> {
        Ok(self.sites.list_by_org(organization_id).await?)
    }

    async fn list_mappings_for_site(&self, site_id: Uuid) -> Result<Vec<MappedItem>> {
        let rows = self.mappings.list_for_site_with_items(site_id).await?;
        Ok(rows.into_iter().map(MappedItem::from).collect())
    }

    async fn find_site_by_slug(&self, slug: &str) -> Result<Option<site::Model>> {
        Ok(self.sites.find_by_slug(slug).await?)
    }

    async fn upsert_snapshot(
        &self,
        site_id: Uuid,
        payload: JsonValue,
        item_count: i32,
    ) -> Result<()> {
        Ok(self.snapshots.upsert(site_id, payload, item_count).await?)
    }

    async fn update_site_sync_status(
        &self,
        site_id: Uuid,
        status: SiteSyncStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        Ok(self
            .sites
            .update_sync_status(site_id, status.as_str(), at)
            .await?)
    }

    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        Ok(self
            .jobs
            .update_status(job_id, status.as_str(), started_at, completed_at)
            .await?)
    }

    async fn append_log(&self, entry: NewJobLog) -> Result<()> {
        self.logs
            .append(
                entry.job_id,
                entry.level.as_str(),
                &entry.message,
                entry.site_id,
                entry.content_item_id,
                entry.payload,
            )
            .await?;
        Ok(())
    }
}
