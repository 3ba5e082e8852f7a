//! Migration to create the sync_jobs table.
//!
//! A sync job is one organization-wide syndication run with a monotonic
//! lifecycle: queued, running, then exactly one of success/partial/failed.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncJobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SyncJobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SyncJobs::OrganizationId).uuid().not_null())
                    .col(
                        ColumnDef::new(SyncJobs::Status)
                            .text()
                            .not_null()
                            .default("queued"),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::Trigger)
                            .text()
                            .not_null()
                            .default("manual"),
                    )
                    .col(ColumnDef::new(SyncJobs::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(SyncJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sync_jobs_organization_id")
                            .from(SyncJobs::Table, SyncJobs::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Job history views page newest-first within one organization
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_sync_jobs_org_created ON sync_jobs (organization_id, created_at DESC)".to_string(),
            ))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_jobs_status")
                    .table(SyncJobs::Table)
                    .col(SyncJobs::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sync_jobs_org_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sync_jobs_status").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SyncJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SyncJobs {
    Table,
    Id,
    OrganizationId,
    Status,
    Trigger,
    CreatedBy,
    StartedAt,
    CompletedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}
