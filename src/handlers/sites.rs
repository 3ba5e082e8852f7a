//! # Sites API Handlers
//!
//! This module contains handlers for creating and listing syndication
//! destination sites.

use crate::auth::{OperatorAuth, OrganizationExtension};
use crate::error::{ApiError, validation_error};
use crate::models::site;
use crate::repositories::SiteRepository;
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a site
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSiteRequest {
    /// Display name; the slug (destination tag) is derived from it
    #[schema(example = "Facebook Campaign")]
    pub name: String,
    /// Destination endpoint the payload is delivered to
    #[schema(example = "https://landing.example.com/facebook/")]
    pub destination_url: String,
    /// Shared signing secret; generated when omitted
    pub destination_secret: Option<String>,
}

/// Site information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SiteResponse {
    /// Unique identifier for the site
    pub id: String,
    /// Display name of the site
    pub name: String,
    /// URL-safe identifier, also the destination tag on the wire
    #[schema(example = "facebook-campaign")]
    pub slug: String,
    /// Destination endpoint the payload is delivered to
    pub destination_url: String,
    /// Shared key for signing payloads delivered to this site
    pub destination_secret: String,
    /// Outcome of the most recent sync attempt
    #[schema(example = "success")]
    pub last_sync_status: Option<String>,
    /// Timestamp of the most recent sync attempt
    pub last_sync_at: Option<String>,
    /// Timestamp when the site was created
    pub created_at: String,
}

impl From<site::Model> for SiteResponse {
    fn from(model: site::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
            slug: model.slug,
            destination_url: model.destination_url,
            destination_secret: model.destination_secret,
            last_sync_status: model.last_sync_status,
            last_sync_at: model.last_sync_at.map(|dt| dt.to_rfc3339()),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for the sites listing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SitesResponse {
    /// Sites belonging to the organization, newest first
    pub sites: Vec<SiteResponse>,
}

/// Create a site
#[utoipa::path(
    post,
    path = "/sites",
    security(("bearer_auth" = [])),
    request_body = CreateSiteRequest,
    responses(
        (status = 201, description = "Site created", body = SiteResponse),
        (status = 400, description = "Invalid name or destination URL", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 409, description = "A site with the same slug already exists", body = ApiError)
    ),
    tag = "sites"
)]
pub async fn create_site(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Json(request): Json<CreateSiteRequest>,
) -> Result<(StatusCode, Json<SiteResponse>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(validation_error(
            "Invalid site",
            serde_json::json!({ "name": "Name is required" }),
        ));
    }

    if url::Url::parse(&request.destination_url).is_err() {
        return Err(validation_error(
            "Invalid site",
            serde_json::json!({ "destination_url": "Must be a valid URL" }),
        ));
    }

    let site = SiteRepository::new(state.db.clone())
        .create(
            organization.0,
            request.name.trim(),
            &request.destination_url,
            request.destination_secret,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(SiteResponse::from(site))))
}

/// List the organization's sites
#[utoipa::path(
    get,
    path = "/sites",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sites for the organization", body = SitesResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "sites"
)]
pub async fn list_sites(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
) -> Result<Json<SitesResponse>, ApiError> {
    let sites = SiteRepository::new(state.db.clone())
        .list_by_org(organization.0)
        .await?;

    Ok(Json(SitesResponse {
        sites: sites.into_iter().map(SiteResponse::from).collect(),
    }))
}
