//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Syndicate API.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db;
use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::server::AppState;

pub mod content_items;
pub mod content_types;
pub mod jobs;
pub mod mappings;
pub mod receiver;
pub mod sites;
pub mod snapshots;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service health
    #[schema(example = "ok")]
    pub status: String,
}

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Health check handler that verifies the database connection
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    db::health_check(&state.db).await.map_err(|e| {
        tracing::error!(error = %e, "Health check failed");
        ApiError::new(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Database unavailable",
        )
    })?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
