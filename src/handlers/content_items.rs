//! # Content Items API Handlers
//!
//! This module contains handlers for creating, listing, and updating content
//! items. Status transitions only happen through the explicit update path;
//! the sync engine never touches an item.

use crate::auth::{OperatorAuth, OrganizationExtension};
use crate::error::{ApiError, not_found, validation_error};
use crate::models::content_item;
use crate::repositories::content_item::ContentItemUpdate;
use crate::repositories::{ContentItemRepository, ContentTypeRepository};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Item statuses the editorial workflow recognizes
const ITEM_STATUSES: &[&str] = &["draft", "published", "archived"];

/// Request body for creating a content item
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContentItemRequest {
    /// Content type the item is authored against
    pub content_type_id: Uuid,
    /// Editorial title
    #[schema(example = "Summer Promotion")]
    pub title: String,
    /// Structured field values keyed by the content type's field names
    pub data: serde_json::Value,
    /// Editorial status (default: draft)
    #[schema(example = "draft")]
    pub status: Option<String>,
}

/// Request body for updating a content item
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContentItemRequest {
    pub title: Option<String>,
    pub data: Option<serde_json::Value>,
    /// Editorial status (one of: draft, published, archived)
    pub status: Option<String>,
}

/// Query parameters for listing content items
#[derive(Debug, Deserialize)]
pub struct ListContentItemsQuery {
    /// Filter by content type (UUID)
    pub content_type_id: Option<Uuid>,
    /// Filter by status (one of: draft, published, archived)
    pub status: Option<String>,
}

/// Content item information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentItemResponse {
    /// Unique identifier for the content item
    pub id: String,
    /// Content type the item is authored against
    pub content_type_id: String,
    /// Editorial title
    pub title: String,
    /// Structured field values
    pub data: serde_json::Value,
    /// Editorial status
    #[schema(example = "published")]
    pub status: String,
    /// Timestamp when the item was created
    pub created_at: String,
    /// Timestamp when the item was last updated
    pub updated_at: String,
}

impl From<content_item::Model> for ContentItemResponse {
    fn from(model: content_item::Model) -> Self {
        Self {
            id: model.id.to_string(),
            content_type_id: model.content_type_id.to_string(),
            title: model.title,
            data: model.data,
            status: model.status,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for the content items listing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentItemsResponse {
    /// Content items matching the query, most recently updated first
    pub content_items: Vec<ContentItemResponse>,
}

fn validate_status(status: &str) -> Result<(), ApiError> {
    if ITEM_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(validation_error(
            "Invalid content item",
            serde_json::json!({ "status": "Must be one of: draft, published, archived" }),
        ))
    }
}

/// Create a content item
#[utoipa::path(
    post,
    path = "/content-items",
    security(("bearer_auth" = [])),
    request_body = CreateContentItemRequest,
    responses(
        (status = 201, description = "Content item created", body = ContentItemResponse),
        (status = 400, description = "Invalid title, data, or status", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Content type not found in this organization", body = ApiError)
    ),
    tag = "content"
)]
pub async fn create_content_item(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Json(request): Json<CreateContentItemRequest>,
) -> Result<(StatusCode, Json<ContentItemResponse>), ApiError> {
    if request.title.trim().is_empty() {
        return Err(validation_error(
            "Invalid content item",
            serde_json::json!({ "title": "Title is required" }),
        ));
    }

    if !request.data.is_object() {
        return Err(validation_error(
            "Invalid content item",
            serde_json::json!({ "data": "Must be a JSON object" }),
        ));
    }

    let status = request.status.unwrap_or_else(|| "draft".to_string());
    validate_status(&status)?;

    ContentTypeRepository::new(state.db.clone())
        .find_by_org(organization.0, request.content_type_id)
        .await?
        .ok_or_else(|| not_found("Content type not found"))?;

    let item = ContentItemRepository::new(state.db.clone())
        .create(
            organization.0,
            request.content_type_id,
            request.title.trim(),
            request.data,
            &status,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ContentItemResponse::from(item))))
}

/// List the organization's content items
#[utoipa::path(
    get,
    path = "/content-items",
    security(("bearer_auth" = [])),
    params(
        ("content_type_id" = Option<String>, Query, description = "Filter by content type (UUID)"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Content items for the organization", body = ContentItemsResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "content"
)]
pub async fn list_content_items(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Query(params): Query<ListContentItemsQuery>,
) -> Result<Json<ContentItemsResponse>, ApiError> {
    if let Some(status) = &params.status {
        validate_status(status)?;
    }

    let items = ContentItemRepository::new(state.db.clone())
        .list_by_org(organization.0, params.content_type_id, params.status)
        .await?;

    Ok(Json(ContentItemsResponse {
        content_items: items.into_iter().map(ContentItemResponse::from).collect(),
    }))
}

/// Fetch one content item
#[utoipa::path(
    get,
    path = "/content-items/{id}",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Content item ID (UUID)")),
    responses(
        (status = 200, description = "The content item", body = ContentItemResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Content item not found", body = ApiError)
    ),
    tag = "content"
)]
pub async fn get_content_item(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ContentItemResponse>, ApiError> {
    let item = ContentItemRepository::new(state.db.clone())
        .find_by_org(organization.0, item_id)
        .await?
        .ok_or_else(|| not_found("Content item not found"))?;

    Ok(Json(ContentItemResponse::from(item)))
}

/// Apply an explicit update to a content item
#[utoipa::path(
    patch,
    path = "/content-items/{id}",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Content item ID (UUID)")),
    request_body = UpdateContentItemRequest,
    responses(
        (status = 200, description = "Updated content item", body = ContentItemResponse),
        (status = 400, description = "Invalid data or status", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Content item not found", body = ApiError)
    ),
    tag = "content"
)]
pub async fn update_content_item(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateContentItemRequest>,
) -> Result<Json<ContentItemResponse>, ApiError> {
    if let Some(status) = &request.status {
        validate_status(status)?;
    }

    if let Some(data) = &request.data {
        if !data.is_object() {
            return Err(validation_error(
                "Invalid content item",
                serde_json::json!({ "data": "Must be a JSON object" }),
            ));
        }
    }

    let item = ContentItemRepository::new(state.db.clone())
        .update(
            organization.0,
            item_id,
            ContentItemUpdate {
                title: request.title,
                data: request.data,
                status: request.status,
            },
        )
        .await?;

    Ok(Json(ContentItemResponse::from(item)))
}
