//! # SiteItemMapping Repository
//!
//! This module provides repository operations for the site_item_mappings
//! table. The (site_id, content_item_id) pair is unique; `upsert` relies on
//! the database conflict target so concurrent writers converge on one row.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::content_item;
use crate::models::site;
use crate::models::site_item_mapping::{ActiveModel, Column, Entity, Model};

/// Repository for site item mapping database operations
pub struct MappingRepository {
    db: DatabaseConnection,
}

impl MappingRepository {
    /// Create a new MappingRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert or update the mapping for a (site, content item) pair
    pub async fn upsert(
        &self,
        site_id: Uuid,
        content_item_id: Uuid,
        mode: &str,
        overrides: JsonValue,
    ) -> Result<Model, DbErr> {
        let now = Utc::now().fixed_offset();

        let mapping = ActiveModel {
            id: Set(Uuid::new_v4()),
            site_id: Set(site_id),
            content_item_id: Set(content_item_id),
            mode: Set(mode.to_string()),
            overrides: Set(overrides),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Entity::insert(mapping)
            .on_conflict(
                OnConflict::columns([Column::SiteId, Column::ContentItemId])
                    .update_columns([Column::Mode, Column::Overrides, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        // Re-read the row: on conflict the stored id is the original one, not
        // the id generated above.
        self.find_by_pair(site_id, content_item_id)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("mapping ({}, {})", site_id, content_item_id))
            })
    }

    /// Find the mapping for a (site, content item) pair
    pub async fn find_by_pair(
        &self,
        site_id: Uuid,
        content_item_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::SiteId.eq(site_id))
            .filter(Column::ContentItemId.eq(content_item_id))
            .one(&self.db)
            .await
    }

    /// List one site's mappings joined with their content items, in creation order
    pub async fn list_for_site_with_items(
        &self,
        site_id: Uuid,
    ) -> Result<Vec<(Model, Option<content_item::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::SiteId.eq(site_id))
            .order_by_asc(Column::CreatedAt)
            .find_also_related(content_item::Entity)
            .all(&self.db)
            .await
    }

    /// List every mapping belonging to the organization's sites, newest first
    pub async fn list_by_org(&self, organization_id: Uuid) -> Result<Vec<Model>, DbErr> {
        let site_ids: Vec<Uuid> = site::Entity::find()
            .select_only()
            .column(site::Column::Id)
            .filter(site::Column::OrganizationId.eq(organization_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        if site_ids.is_empty() {
            return Ok(Vec::new());
        }

        Entity::find()
            .filter(Column::SiteId.is_in(site_ids))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Delete the mapping for a (site, content item) pair, returning whether a row existed
    pub async fn delete_by_pair(
        &self,
        site_id: Uuid,
        content_item_id: Uuid,
    ) -> Result<bool, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::SiteId.eq(site_id))
            .filter(Column::ContentItemId.eq(content_item_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
