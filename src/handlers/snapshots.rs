//! # Snapshot API Handler
//!
//! Read interface for a site's destination snapshot: the last payload the
//! destination is recorded as having accepted.

use crate::auth::{OperatorAuth, OrganizationExtension};
use crate::error::{ApiError, not_found};
use crate::models::destination_snapshot;
use crate::repositories::{SiteRepository, SnapshotRepository};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Destination snapshot response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SnapshotResponse {
    /// Site the snapshot belongs to
    pub site_id: String,
    /// Payload as the destination accepted it
    pub payload: serde_json::Value,
    /// Timestamp when the delivery was accepted
    pub received_at: String,
    /// Number of resolved items that produced this payload
    pub item_count: i32,
}

impl From<destination_snapshot::Model> for SnapshotResponse {
    fn from(model: destination_snapshot::Model) -> Self {
        Self {
            site_id: model.site_id.to_string(),
            payload: model.payload,
            received_at: model.received_at.to_rfc3339(),
            item_count: model.item_count,
        }
    }
}

/// Read the last snapshot stored for a site
#[utoipa::path(
    get,
    path = "/sites/{id}/snapshot",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Site ID (UUID)")),
    responses(
        (status = 200, description = "The site's last accepted snapshot", body = SnapshotResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Site unknown or no delivery accepted yet", body = ApiError)
    ),
    tag = "sites"
)]
pub async fn get_site_snapshot(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Path(site_id): Path<Uuid>,
) -> Result<Json<SnapshotResponse>, ApiError> {
    SiteRepository::new(state.db.clone())
        .find_by_org(organization.0, site_id)
        .await?
        .ok_or_else(|| not_found("Site not found"))?;

    let snapshot = SnapshotRepository::new(state.db.clone())
        .find_by_site(site_id)
        .await?
        .ok_or_else(|| not_found("No snapshot recorded for this site yet"))?;

    Ok(Json(SnapshotResponse::from(snapshot)))
}
