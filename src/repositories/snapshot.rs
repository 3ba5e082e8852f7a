//! # DestinationSnapshot Repository
//!
//! This module provides repository operations for the destination_snapshots
//! table. Each site has at most one snapshot row; deliveries overwrite it
//! through the unique site_id conflict target.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::destination_snapshot::{ActiveModel, Column, Entity, Model};

/// Repository for destination snapshot database operations
pub struct SnapshotRepository {
    db: DatabaseConnection,
}

impl SnapshotRepository {
    /// Create a new SnapshotRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert or overwrite the snapshot for a site
    pub async fn upsert(
        &self,
        site_id: Uuid,
        payload: JsonValue,
        item_count: i32,
    ) -> Result<(), DbErr> {
        let snapshot = ActiveModel {
            id: Set(Uuid::new_v4()),
            site_id: Set(site_id),
            payload: Set(payload),
            received_at: Set(Utc::now().fixed_offset()),
            item_count: Set(item_count),
        };

        Entity::insert(snapshot)
            .on_conflict(
                OnConflict::column(Column::SiteId)
                    .update_columns([Column::Payload, Column::ReceivedAt, Column::ItemCount])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Read the last snapshot stored for a site, if any delivery has landed yet
    pub async fn find_by_site(&self, site_id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::SiteId.eq(site_id))
            .one(&self.db)
            .await
    }
}
