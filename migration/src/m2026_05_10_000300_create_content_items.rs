//! Migration to create the content_items table.
//!
//! Content items carry the structured `data` document authored against their
//! content type's schema, plus the editorial status that gates syndication.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentItems::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(ContentItems::ContentTypeId).uuid().not_null())
                    .col(ColumnDef::new(ContentItems::Title).text().not_null())
                    .col(ColumnDef::new(ContentItems::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(ContentItems::Status)
                            .text()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(ContentItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ContentItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_items_organization_id")
                            .from(ContentItems::Table, ContentItems::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_items_content_type_id")
                            .from(ContentItems::Table, ContentItems::ContentTypeId)
                            .to(ContentTypes::Table, ContentTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the item pickers which filter by type and status
        manager
            .create_index(
                Index::create()
                    .name("idx_content_items_org_status")
                    .table(ContentItems::Table)
                    .col(ContentItems::OrganizationId)
                    .col(ContentItems::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_items_content_type")
                    .table(ContentItems::Table)
                    .col(ContentItems::ContentTypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_content_items_org_status").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_content_items_content_type").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ContentItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContentItems {
    Table,
    Id,
    OrganizationId,
    ContentTypeId,
    Title,
    Data,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ContentTypes {
    Table,
    Id,
}
