//! Database migrations for the Syndicate API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2026_05_10_000100_create_organizations;
mod m2026_05_10_000200_create_content_types;
mod m2026_05_10_000300_create_content_items;
mod m2026_05_10_000400_create_sites;
mod m2026_05_10_000500_create_site_item_mappings;
mod m2026_05_10_000600_create_sync_jobs;
mod m2026_05_10_000700_create_job_logs;
mod m2026_05_10_000800_create_destination_snapshots;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_05_10_000100_create_organizations::Migration),
            Box::new(m2026_05_10_000200_create_content_types::Migration),
            Box::new(m2026_05_10_000300_create_content_items::Migration),
            Box::new(m2026_05_10_000400_create_sites::Migration),
            Box::new(m2026_05_10_000500_create_site_item_mappings::Migration),
            Box::new(m2026_05_10_000600_create_sync_jobs::Migration),
            Box::new(m2026_05_10_000700_create_job_logs::Migration),
            Box::new(m2026_05_10_000800_create_destination_snapshots::Migration),
        ]
    }
}
