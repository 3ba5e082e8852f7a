//! # ContentType Repository
//!
//! This module provides repository operations for the content_types table,
//! encapsulating SeaORM operations with organization-aware access patterns.

use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::content_type::{ActiveModel, Column, Entity, Model};

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[^a-z0-9]+").expect("static slug pattern"))
}

/// Derive a URL-safe slug from a display name, e.g. "Promo Offer" -> "promo_offer"
pub fn slugify(name: &str) -> String {
    slug_pattern()
        .replace_all(&name.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

/// Repository for content type database operations
pub struct ContentTypeRepository {
    db: DatabaseConnection,
}

impl ContentTypeRepository {
    /// Create a new ContentTypeRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a content type for the organization; the slug is derived from the name
    pub async fn create(
        &self,
        organization_id: Uuid,
        name: &str,
        schema: JsonValue,
    ) -> Result<Model, DbErr> {
        let now = Utc::now().fixed_offset();

        let content_type = ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(name.to_string()),
            slug: Set(slugify(name)),
            schema: Set(schema),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = content_type.insert(&self.db).await?;

        tracing::info!(
            organization_id = %organization_id,
            content_type_id = %result.id,
            slug = %result.slug,
            "Content type created"
        );

        Ok(result)
    }

    /// List the organization's content types, newest first
    pub async fn list_by_org(&self, organization_id: Uuid) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::OrganizationId.eq(organization_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Find a content type by ID, ensuring it belongs to the specified organization
    pub async fn find_by_org(
        &self,
        organization_id: Uuid,
        content_type_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(content_type_id)
            .filter(Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_replaces_non_alphanumeric_runs() {
        assert_eq!(slugify("Business Landing Page"), "business_landing_page");
        assert_eq!(slugify("Promo -- Offer!"), "promo_offer");
        assert_eq!(slugify("  Already_Snake  "), "already_snake");
    }
}
