//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, plus fixture helpers for the syndication tables.

use anyhow::Result;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set, Statement};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use syndicate::migration::{Migrator, MigratorTrait};
use syndicate::models::{content_item, content_type, organization, site, site_item_mapping};
use syndicate::repositories::{MappingRepository, SiteRepository};

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    // SQLite does not enforce our Postgres foreign key semantics; disable FK
    // checks so fixtures can be inserted without satisfying every relation.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = OFF".to_string(),
    ))
    .await?;

    Ok(db)
}

/// Creates a test organization and returns its ID.
pub async fn create_test_org(db: &DatabaseConnection) -> Result<Uuid> {
    let id = Uuid::new_v4();

    organization::ActiveModel {
        id: Set(id),
        name: Set("Test Organization".to_string()),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;

    Ok(id)
}

/// Creates a site through the repository; the slug is derived from the name.
#[allow(dead_code)]
pub async fn create_site(
    db: &DatabaseConnection,
    organization_id: Uuid,
    name: &str,
    secret: &str,
) -> Result<site::Model> {
    let site = SiteRepository::new(db.clone())
        .create(
            organization_id,
            name,
            "https://destination.example.com/receive",
            Some(secret.to_string()),
        )
        .await?;

    Ok(site)
}

/// Inserts a content type row directly.
#[allow(dead_code)]
pub async fn create_content_type(
    db: &DatabaseConnection,
    organization_id: Uuid,
) -> Result<content_type::Model> {
    let now = chrono::Utc::now().fixed_offset();

    let model = content_type::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        name: Set("Landing Page".to_string()),
        slug: Set("landing_page".to_string()),
        schema: Set(serde_json::json!([
            {"name": "headline", "type": "text", "required": true},
            {"name": "cta_url", "type": "url", "required": false},
        ])),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok(model)
}

/// Inserts a content item row directly with the given status.
#[allow(dead_code)]
pub async fn create_content_item(
    db: &DatabaseConnection,
    organization_id: Uuid,
    content_type_id: Uuid,
    title: &str,
    data: JsonValue,
    status: &str,
) -> Result<content_item::Model> {
    let now = chrono::Utc::now().fixed_offset();

    let model = content_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        content_type_id: Set(content_type_id),
        title: Set(title.to_string()),
        data: Set(data),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok(model)
}

/// Upserts a mapping through the repository.
#[allow(dead_code)]
pub async fn create_mapping(
    db: &DatabaseConnection,
    site_id: Uuid,
    content_item_id: Uuid,
    mode: &str,
    overrides: JsonValue,
) -> Result<site_item_mapping::Model> {
    let mapping = MappingRepository::new(db.clone())
        .upsert(site_id, content_item_id, mode, overrides)
        .await?;

    Ok(mapping)
}
