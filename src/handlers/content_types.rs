//! # Content Types API Handlers
//!
//! This module contains handlers for creating and listing content types.
//! Content types are immutable once created; there is no update path.

use crate::auth::{OperatorAuth, OrganizationExtension};
use crate::error::{ApiError, validation_error};
use crate::models::content_type;
use crate::repositories::ContentTypeRepository;
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Field types a content type schema may use
const FIELD_TYPES: &[&str] = &[
    "text",
    "textarea",
    "markdown",
    "date",
    "number",
    "select",
    "multi-select",
    "phone",
    "email",
    "url",
    "image",
];

/// Request body for creating a content type
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContentTypeRequest {
    /// Display name; the slug is derived from it
    #[schema(example = "Business Landing Page")]
    pub name: String,
    /// Ordered list of field definitions (name, type, required, options)
    pub schema: serde_json::Value,
}

/// Content type information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentTypeResponse {
    /// Unique identifier for the content type
    pub id: String,
    /// Display name of the content type
    pub name: String,
    /// URL-safe identifier derived from the name
    #[schema(example = "business_landing_page")]
    pub slug: String,
    /// Ordered list of field definitions
    pub schema: serde_json::Value,
    /// Timestamp when the content type was created
    pub created_at: String,
}

impl From<content_type::Model> for ContentTypeResponse {
    fn from(model: content_type::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
            slug: model.slug,
            schema: model.schema,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for the content types listing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentTypesResponse {
    /// Content types belonging to the organization, newest first
    pub content_types: Vec<ContentTypeResponse>,
}

/// Validate a schema document: an array of field descriptors, each with a
/// name and a known field type.
fn validate_schema(schema: &serde_json::Value) -> Result<(), ApiError> {
    let fields = schema.as_array().ok_or_else(|| {
        validation_error(
            "Invalid content type",
            serde_json::json!({ "schema": "Must be an array of field definitions" }),
        )
    })?;

    for (index, field) in fields.iter().enumerate() {
        let name = field.get("name").and_then(|v| v.as_str()).unwrap_or("");
        if name.is_empty() {
            return Err(validation_error(
                "Invalid content type",
                serde_json::json!({
                    "schema": format!("Field at index {} is missing a name", index)
                }),
            ));
        }

        let field_type = field.get("type").and_then(|v| v.as_str()).unwrap_or("");
        if !FIELD_TYPES.contains(&field_type) {
            return Err(validation_error(
                "Invalid content type",
                serde_json::json!({
                    "schema": format!(
                        "Field '{}' has unknown type '{}'; must be one of: {}",
                        name,
                        field_type,
                        FIELD_TYPES.join(", ")
                    )
                }),
            ));
        }
    }

    Ok(())
}

/// Create a content type
#[utoipa::path(
    post,
    path = "/content-types",
    security(("bearer_auth" = [])),
    request_body = CreateContentTypeRequest,
    responses(
        (status = 201, description = "Content type created", body = ContentTypeResponse),
        (status = 400, description = "Invalid name or schema", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "content"
)]
pub async fn create_content_type(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
    Json(request): Json<CreateContentTypeRequest>,
) -> Result<(StatusCode, Json<ContentTypeResponse>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(validation_error(
            "Invalid content type",
            serde_json::json!({ "name": "Name is required" }),
        ));
    }

    validate_schema(&request.schema)?;

    let content_type = ContentTypeRepository::new(state.db.clone())
        .create(organization.0, request.name.trim(), request.schema)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ContentTypeResponse::from(content_type)),
    ))
}

/// List the organization's content types
#[utoipa::path(
    get,
    path = "/content-types",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Content types for the organization", body = ContentTypesResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "content"
)]
pub async fn list_content_types(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OrganizationExtension(organization): OrganizationExtension,
) -> Result<Json<ContentTypesResponse>, ApiError> {
    let content_types = ContentTypeRepository::new(state.db.clone())
        .list_by_org(organization.0)
        .await?;

    Ok(Json(ContentTypesResponse {
        content_types: content_types
            .into_iter()
            .map(ContentTypeResponse::from)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_must_be_an_array() {
        assert!(validate_schema(&json!({"name": "x"})).is_err());
        assert!(validate_schema(&json!([])).is_ok());
    }

    #[test]
    fn schema_fields_need_name_and_known_type() {
        assert!(validate_schema(&json!([{"name": "headline", "type": "text"}])).is_ok());
        assert!(validate_schema(&json!([{"type": "text"}])).is_err());
        assert!(validate_schema(&json!([{"name": "headline", "type": "blob"}])).is_err());
    }

    #[test]
    fn all_documented_field_types_are_accepted() {
        for field_type in FIELD_TYPES {
            let schema = json!([{"name": "field", "type": field_type, "required": true}]);
            assert!(validate_schema(&schema).is_ok(), "type {}", field_type);
        }
    }
}
