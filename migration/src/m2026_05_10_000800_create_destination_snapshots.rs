//! Migration to create the destination_snapshots table.
//!
//! One row per site holding the last payload the destination accepted; each
//! delivery overwrites the previous snapshot rather than appending history.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DestinationSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DestinationSnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DestinationSnapshots::SiteId).uuid().not_null())
                    .col(
                        ColumnDef::new(DestinationSnapshots::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DestinationSnapshots::ReceivedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DestinationSnapshots::ItemCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_destination_snapshots_site_id")
                            .from(DestinationSnapshots::Table, DestinationSnapshots::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_destination_snapshots_site")
                    .table(DestinationSnapshots::Table)
                    .col(DestinationSnapshots::SiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_destination_snapshots_site")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(DestinationSnapshots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DestinationSnapshots {
    Table,
    Id,
    SiteId,
    Payload,
    ReceivedAt,
    ItemCount,
}

#[derive(DeriveIden)]
enum Sites {
    Table,
    Id,
}
