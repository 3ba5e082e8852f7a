//! # ContentItem Repository
//!
//! This module provides repository operations for the content_items table.
//! Status transitions only ever happen through the explicit update path here;
//! the sync engine never mutates items.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::content_item::{ActiveModel, Column, Entity, Model};

/// Fields that can change on an existing content item
#[derive(Debug, Default, Clone)]
pub struct ContentItemUpdate {
    pub title: Option<String>,
    pub data: Option<JsonValue>,
    pub status: Option<String>,
}

/// Repository for content item database operations
pub struct ContentItemRepository {
    db: DatabaseConnection,
}

impl ContentItemRepository {
    /// Create a new ContentItemRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a content item for the organization
    pub async fn create(
        &self,
        organization_id: Uuid,
        content_type_id: Uuid,
        title: &str,
        data: JsonValue,
        status: &str,
    ) -> Result<Model, DbErr> {
        let now = Utc::now().fixed_offset();

        let item = ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            content_type_id: Set(content_type_id),
            title: Set(title.to_string()),
            data: Set(data),
            status: Set(status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = item.insert(&self.db).await?;

        tracing::info!(
            organization_id = %organization_id,
            content_item_id = %result.id,
            status = %result.status,
            "Content item created"
        );

        Ok(result)
    }

    /// List the organization's content items with optional filtering, most recently updated first
    pub async fn list_by_org(
        &self,
        organization_id: Uuid,
        content_type_id: Option<Uuid>,
        status: Option<String>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find()
            .filter(Column::OrganizationId.eq(organization_id))
            .order_by_desc(Column::UpdatedAt);

        if let Some(type_id) = content_type_id {
            query = query.filter(Column::ContentTypeId.eq(type_id));
        }

        if let Some(status_filter) = status {
            query = query.filter(Column::Status.eq(status_filter));
        }

        query.all(&self.db).await
    }

    /// Find a content item by ID, ensuring it belongs to the specified organization
    pub async fn find_by_org(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(item_id)
            .filter(Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
    }

    /// Apply an explicit update to a content item
    pub async fn update(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
        update: ContentItemUpdate,
    ) -> Result<Model, DbErr> {
        let item = self
            .find_by_org(organization_id, item_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("content item {}", item_id)))?;

        let mut active_item: ActiveModel = item.into();

        if let Some(title) = update.title {
            active_item.title = Set(title);
        }
        if let Some(data) = update.data {
            active_item.data = Set(data);
        }
        if let Some(status) = update.status {
            active_item.status = Set(status);
        }
        active_item.updated_at = Set(Utc::now().fixed_offset());

        active_item.update(&self.db).await
    }
}
