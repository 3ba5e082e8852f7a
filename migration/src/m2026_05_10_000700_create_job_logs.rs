//! Migration to create the job_logs table.
//!
//! Job logs are the append-only audit trail written by the orchestrator while
//! a sync job runs; rows are never updated or deleted individually.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JobLogs::JobId).uuid().not_null())
                    .col(
                        ColumnDef::new(JobLogs::Level)
                            .text()
                            .not_null()
                            .default("info"),
                    )
                    .col(ColumnDef::new(JobLogs::Message).text().not_null())
                    .col(ColumnDef::new(JobLogs::SiteId).uuid().null())
                    .col(ColumnDef::new(JobLogs::ContentItemId).uuid().null())
                    .col(ColumnDef::new(JobLogs::Payload).json_binary().null())
                    .col(
                        ColumnDef::new(JobLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_logs_job_id")
                            .from(JobLogs::Table, JobLogs::JobId)
                            .to(SyncJobs::Table, SyncJobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_logs_job_created")
                    .table(JobLogs::Table)
                    .col(JobLogs::JobId)
                    .col(JobLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_job_logs_job_created").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JobLogs {
    Table,
    Id,
    JobId,
    Level,
    Message,
    SiteId,
    ContentItemId,
    Payload,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SyncJobs {
    Table,
    Id,
}
