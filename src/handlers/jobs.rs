//! # Jobs API Handlers
//!
//! This module contains handlers for triggering sync jobs and reading job
//! history and logs. Triggering runs the job to completion in-process and
//! returns the terminal status; there is no background queue.

use crate::auth::{OperatorAuth, OrganizationExtension};
use crate::cursor::{CursorData, decode_cursor, encode_cursor};
use crate::error::{ApiError, not_found, validation_error};
use crate::models::{job_log, sync_job};
use crate::repositories::{JobLogRepository, SyncJobRepository};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for triggering a sync job
#[derive(Debug, Deserialize, ToSchema)]
pub struct TriggerJobRequest {
    /// What started the job (one of: manual, cron; default: manual)
    #[schema(example = "manual")]
    pub trigger: Option<String>,
    /// User who created the job, when known
    pub created_by: Option<Uuid>,
}

/// Query parameters for listing jobs
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    /// Maximum number of jobs to return (default: 20, max: 100)
    pub limit: Option<u32>,
    /// Opaque cursor for pagination
    pub cursor: Option<String>,
}

/// Job information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    /// Unique identifier for the sync job
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    /// Current status of the job
    #[schema(example = "partial")]
    pub status: String,
    /// What started the job
    #[schema(example = "manual")]
    pub trigger: String,
    /// User who created the job, when known
    pub created_by: Option<String>,
    /// Timestamp when the job started execution
    #[schema(example = "2026-01-15T10:30:01Z")]
    pub started_at: Option<String>,
    /// Timestamp when the job reached a terminal status
    #[schema(example = "2026-01-15T10:30:04Z")]
    pub completed_at: Option<String>,
    /// Timestamp when the job was created
    #[schema(example = "2026-01-15T10:30:00Z")]
    pub created_at: String,
}

impl From<sync_job::Model> for JobResponse {
    fn from(model: sync_job::Model) -> Self {
        Self {
            id: model.id.to_string(),
            status: model.status,
            trigger: model.trigger,
            created_by: model.created_by.map(|id| id.to_string()),
            started_at: model.started_at.map(|dt| dt.to_rfc3339()),
            completed_at: model.completed_at.map(|dt| dt.to_rfc3339()),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for the jobs listing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobsResponse {
    /// Jobs matching the query, newest first
    pub jobs: Vec<JobResponse>,
    /// Opaque cursor for fetching the next page (null if no more pages)
    pub next_cursor: Option<String>,
}

/// One job log entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobLogResponse {
    /// Unique identifier for the log entry
    pub id: String,
    /// Severity of the entry
    #[schema(example = "info")]
    pub level: String,
    /// Human-readable log message
    #[schema(example = "Sync job started")]
    pub message: String,
    /// Site this entry is scoped to, when site-specific
    pub site_id: Option<String>,
    /// Content item this entry is scoped to, when item-specific
    pub content_item_id: Option<String>,
    /// Structured context attached to the entry
    pub payload: Option<serde_json::Value>,
    /// Timestamp when the entry was appended
    pub created_at: String,
}

impl From<job_log::Model> for JobLogResponse {
    fn from(model: job_log::Model) -> Self {
        Self {
            id: model.id.to_string(),
            level: model.level,
            message: model.message,
            site_id: model.site_id.map(|id| id.to_string()),
            content_item_id: model.content_item_id.map(|id| id.to_string()),
            payload: model.payload,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for the job logs endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobLogsResponse {
    /// The job's audit trail in emission order
    pub logs: Vec<JobLogResponse>,
}

/// Trigger a sync job and run it to completion
#[utoipa::path(
    post,
    path = "/jobs",
    security(("bearer_auth" = [])),
    request_body = TriggerJobRequest,
    responses(
        (status = 201, description = "Job ran to completion; body carries the terminal status", body = JobResponse),
        (status = 400, description = "Invalid trigger value", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "jobs"
)]
pub async fn trigger_job(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Json(request): Json<TriggerJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let trigger = request.trigger.unwrap_or_else(|| "manual".to_string());
    if !matches!(trigger.as_str(), "manual" | "cron") {
        return Err(validation_error(
            "Invalid trigger",
            serde_json::json!({ "trigger": "Must be one of: manual, cron" }),
        ));
    }

    let repo = SyncJobRepository::new(state.db.clone());
    let job = repo
        .create(organization.0, &trigger, request.created_by)
        .await?;

    // The runner executes synchronously within this invocation; the outcome
    // is reflected in the job row before we answer.
    let outcome = state.orchestrator.execute_job(job.id, organization.0).await;
    tracing::info!(job_id = %job.id, status = %outcome.status, "Triggered sync job finished");

    let job = repo
        .find_by_org(organization.0, job.id)
        .await?
        .ok_or_else(|| not_found("Sync job not found after execution"))?;

    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

/// List jobs for the organization, newest first
#[utoipa::path(
    get,
    path = "/jobs",
    security(("bearer_auth" = [])),
    params(
        ("cursor" = Option<String>, Query, description = "Pagination cursor from a previous page"),
        ("limit" = Option<u32>, Query, description = "Maximum number of jobs to return (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "Jobs for the organization", body = JobsResponse),
        (status = 400, description = "Invalid query parameters", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "jobs"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<JobsResponse>, ApiError> {
    let limit = match params.limit {
        Some(0) => {
            return Err(validation_error(
                "Invalid limit",
                serde_json::json!({ "limit": "Minimum allowed limit is 1" }),
            ));
        }
        Some(value) if value > 100 => {
            return Err(validation_error(
                "Invalid limit",
                serde_json::json!({ "limit": "Maximum allowed limit is 100" }),
            ));
        }
        Some(value) => value,
        None => 20,
    };

    let cursor: Option<CursorData> = match &params.cursor {
        Some(cursor_str) => Some(decode_cursor(cursor_str)?),
        None => None,
    };

    let repo = SyncJobRepository::new(state.db.clone());
    let jobs = repo
        .list_by_org(organization.0, limit as u64, cursor)
        .await?;

    let next_cursor = if jobs.len() as u32 == limit {
        jobs.last()
            .map(|job| encode_cursor(&job.created_at.with_timezone(&Utc), &job.id))
    } else {
        None
    };

    Ok(Json(JobsResponse {
        jobs: jobs.into_iter().map(JobResponse::from).collect(),
        next_cursor,
    }))
}

/// Fetch one job
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Sync job ID (UUID)")),
    responses(
        (status = 200, description = "The job", body = JobResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Job not found", body = ApiError)
    ),
    tag = "jobs"
)]
pub async fn get_job(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResponse>, ApiError> {
    let repo = SyncJobRepository::new(state.db.clone());
    let job = repo
        .find_by_org(organization.0, job_id)
        .await?
        .ok_or_else(|| not_found("Sync job not found"))?;

    Ok(Json(JobResponse::from(job)))
}

/// Read one job's audit trail in emission order
#[utoipa::path(
    get,
    path = "/jobs/{id}/logs",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Sync job ID (UUID)")),
    responses(
        (status = 200, description = "The job's audit trail", body = JobLogsResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Job not found", body = ApiError)
    ),
    tag = "jobs"
)]
pub async fn get_job_logs(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobLogsResponse>, ApiError> {
    let jobs = SyncJobRepository::new(state.db.clone());
    jobs.find_by_org(organization.0, job_id)
        .await?
        .ok_or_else(|| not_found("Sync job not found"))?;

    let logs = JobLogRepository::new(state.db.clone())
        .list_for_job(job_id)
        .await?;

    Ok(Json(JobLogsResponse {
        logs: logs.into_iter().map(JobLogResponse::from).collect(),
    }))
}
