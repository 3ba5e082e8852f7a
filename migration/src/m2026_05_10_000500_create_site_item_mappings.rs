//! Migration to create the site_item_mappings table.
//!
//! A mapping pins one content item onto one site with a mode (full, override,
//! block) and the override document applied when mode is override. The
//! (site_id, content_item_id) pair is unique and upserted on conflict.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteItemMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteItemMappings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SiteItemMappings::SiteId).uuid().not_null())
                    .col(
                        ColumnDef::new(SiteItemMappings::ContentItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SiteItemMappings::Mode)
                            .text()
                            .not_null()
                            .default("full"),
                    )
                    .col(
                        ColumnDef::new(SiteItemMappings::Overrides)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SiteItemMappings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SiteItemMappings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_site_item_mappings_site_id")
                            .from(SiteItemMappings::Table, SiteItemMappings::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_site_item_mappings_content_item_id")
                            .from(SiteItemMappings::Table, SiteItemMappings::ContentItemId)
                            .to(ContentItems::Table, ContentItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_site_item_mappings_pair")
                    .table(SiteItemMappings::Table)
                    .col(SiteItemMappings::SiteId)
                    .col(SiteItemMappings::ContentItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_site_item_mappings_pair").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SiteItemMappings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SiteItemMappings {
    Table,
    Id,
    SiteId,
    ContentItemId,
    Mode,
    Overrides,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sites {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ContentItems {
    Table,
    Id,
}
