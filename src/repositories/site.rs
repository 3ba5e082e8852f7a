//! # Site Repository
//!
//! This module provides repository operations for the sites table. The
//! last_sync_status/last_sync_at columns are only ever written through
//! `update_sync_status`, which the orchestrator calls after each attempt.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rand::RngCore;
use regex::Regex;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::models::site::{ActiveModel, Column, Entity, Model};

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[^a-z0-9]+").expect("static slug pattern"))
}

/// Derive a URL-safe slug from a display name, e.g. "Facebook Campaign" -> "facebook-campaign"
pub fn slugify(name: &str) -> String {
    slug_pattern()
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Generate a random 32-byte hex secret for signing payloads to a site
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Repository for site database operations
pub struct SiteRepository {
    db: DatabaseConnection,
}

impl SiteRepository {
    /// Create a new SiteRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a site for the organization; generates a slug from the name and
    /// a random secret when the caller does not supply one
    pub async fn create(
        &self,
        organization_id: Uuid,
        name: &str,
        destination_url: &str,
        destination_secret: Option<String>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now().fixed_offset();
        let secret = destination_secret
            .filter(|s| !s.is_empty())
            .unwrap_or_else(generate_secret);

        let site = ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(name.to_string()),
            slug: Set(slugify(name)),
            destination_url: Set(destination_url.to_string()),
            destination_secret: Set(secret),
            last_sync_status: Set(None),
            last_sync_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = site.insert(&self.db).await?;

        tracing::info!(
            organization_id = %organization_id,
            site_id = %result.id,
            slug = %result.slug,
            "Site created"
        );

        Ok(result)
    }

    /// List the organization's sites, newest first
    pub async fn list_by_org(&self, organization_id: Uuid) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::OrganizationId.eq(organization_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Find a site by ID, ensuring it belongs to the specified organization
    pub async fn find_by_org(
        &self,
        organization_id: Uuid,
        site_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(site_id)
            .filter(Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
    }

    /// Find a site by its slug (the destination tag on the wire)
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    /// Record the outcome of the most recent sync attempt for the site
    pub async fn update_sync_status(
        &self,
        site_id: Uuid,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        Entity::update_many()
            .col_expr(Column::LastSyncStatus, Expr::value(status.to_string()))
            .col_expr(Column::LastSyncAt, Expr::value(at.fixed_offset()))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(Column::Id.eq(site_id))
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
