//! # Mappings API Handlers
//!
//! This module contains handlers for upserting, listing, and deleting
//! site-item mappings. Upsert converges on one row per (site, content item)
//! pair.

use crate::auth::{OperatorAuth, OrganizationExtension};
use crate::error::{ApiError, not_found, validation_error};
use crate::models::site_item_mapping;
use crate::repositories::{ContentItemRepository, MappingRepository, SiteRepository};
use crate::server::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for upserting a mapping
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertMappingRequest {
    /// Site the mapping applies to
    pub site_id: Uuid,
    /// Content item the mapping applies to
    pub content_item_id: Uuid,
    /// Mapping mode (one of: full, override, block)
    #[schema(example = "override")]
    pub mode: String,
    /// Field overrides applied when mode is override; defaults to an empty object
    pub overrides: Option<serde_json::Value>,
}

/// Query parameters identifying one mapping pair
#[derive(Debug, Deserialize)]
pub struct MappingPairQuery {
    pub site_id: Uuid,
    pub content_item_id: Uuid,
}

/// Mapping information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MappingResponse {
    /// Unique identifier for the mapping
    pub id: String,
    /// Site the mapping applies to
    pub site_id: String,
    /// Content item the mapping applies to
    pub content_item_id: String,
    /// Mapping mode
    #[schema(example = "override")]
    pub mode: String,
    /// Field overrides applied when mode is override
    pub overrides: serde_json::Value,
    /// Timestamp when the mapping was created
    pub created_at: String,
    /// Timestamp when the mapping was last updated
    pub updated_at: String,
}

impl From<site_item_mapping::Model> for MappingResponse {
    fn from(model: site_item_mapping::Model) -> Self {
        Self {
            id: model.id.to_string(),
            site_id: model.site_id.to_string(),
            content_item_id: model.content_item_id.to_string(),
            mode: model.mode,
            overrides: model.overrides,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for the mappings listing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MappingsResponse {
    /// Mappings across the organization's sites, newest first
    pub mappings: Vec<MappingResponse>,
}

/// Insert or update the mapping for a (site, content item) pair
#[utoipa::path(
    put,
    path = "/mappings",
    security(("bearer_auth" = [])),
    request_body = UpsertMappingRequest,
    responses(
        (status = 200, description = "Mapping upserted", body = MappingResponse),
        (status = 400, description = "Invalid mode or overrides", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Site or content item not found in this organization", body = ApiError)
    ),
    tag = "mappings"
)]
pub async fn upsert_mapping(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Json(request): Json<UpsertMappingRequest>,
) -> Result<Json<MappingResponse>, ApiError> {
    if !matches!(request.mode.as_str(), "full" | "override" | "block") {
        return Err(validation_error(
            "Invalid mapping",
            serde_json::json!({ "mode": "Must be one of: full, override, block" }),
        ));
    }

    let overrides = request
        .overrides
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    if !overrides.is_object() {
        return Err(validation_error(
            "Invalid mapping",
            serde_json::json!({ "overrides": "Must be a JSON object" }),
        ));
    }

    // Both sides of the pair must belong to the caller's organization
    SiteRepository::new(state.db.clone())
        .find_by_org(organization.0, request.site_id)
        .await?
        .ok_or_else(|| not_found("Site not found"))?;

    ContentItemRepository::new(state.db.clone())
        .find_by_org(organization.0, request.content_item_id)
        .await?
        .ok_or_else(|| not_found("Content item not found"))?;

    let mapping = MappingRepository::new(state.db.clone())
        .upsert(
            request.site_id,
            request.content_item_id,
            &request.mode,
            overrides,
        )
        .await?;

    Ok(Json(MappingResponse::from(mapping)))
}

/// List every mapping across the organization's sites
#[utoipa::path(
    get,
    path = "/mappings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Mappings for the organization", body = MappingsResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "mappings"
)]
pub async fn list_mappings(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
) -> Result<Json<MappingsResponse>, ApiError> {
    let mappings = MappingRepository::new(state.db.clone())
        .list_by_org(organization.0)
        .await?;

    Ok(Json(MappingsResponse {
        mappings: mappings.into_iter().map(MappingResponse::from).collect(),
    }))
}

/// Delete the mapping for a (site, content item) pair
#[utoipa::path(
    delete,
    path = "/mappings",
    security(("bearer_auth" = [])),
    params(
        ("site_id" = String, Query, description = "Site ID (UUID)"),
        ("content_item_id" = String, Query, description = "Content item ID (UUID)")
    ),
    responses(
        (status = 204, description = "Mapping deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "No mapping exists for the pair", body = ApiError)
    ),
    tag = "mappings"
)]
pub async fn delete_mapping(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Query(pair): Query<MappingPairQuery>,
) -> Result<StatusCode, ApiError> {
    SiteRepository::new(state.db.clone())
        .find_by_org(organization.0, pair.site_id)
        .await?
        .ok_or_else(|| not_found("Site not found"))?;

    let deleted = MappingRepository::new(state.db.clone())
        .delete_by_pair(pair.site_id, pair.content_item_id)
        .await?;

    if !deleted {
        return Err(not_found("No mapping exists for this site and content item"));
    }

    Ok(StatusCode::NO_CONTENT)
}
