//! Migration to create the sites table.
//!
//! A site is a syndication destination: it owns the shared signing secret and
//! the last-attempt sync status columns that the orchestrator maintains.

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
                    .table(Sites::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sites::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sites::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Sites::Name).text().not_null())
                    .col(ColumnDef::new(Sites::Slug).text().not_null())
                    .col(ColumnDef::new(Sites::DestinationUrl).text().not_null())
                    .col(ColumnDef::new(Sites::DestinationSecret).text().not_null())
                    .col(ColumnDef::new(Sites::LastSyncStatus).text().null())
                    .col(
                        ColumnDef::new(Sites::LastSyncAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Sites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Sites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sites_organization_id")
                            .from(Sites::Table, Sites::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The receiver resolves a destination tag to a site by slug alone,
        // so slugs are unique across organizations.
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_sites_slug ON sites (slug)".to_string(),
            ))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sites_organization")
                    .table(Sites::Table)
                    .col(Sites::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sites_slug").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sites_organization").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sites {
    Table,
    Id,
    OrganizationId,
    Name,
    Slug,
    DestinationUrl,
    DestinationSecret,
    LastSyncStatus,
    LastSyncAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}
