//! Migration to create the content_types table.
//!
//! Content types hold the ordered field schema that content items of that
//! type are authored against.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentTypes::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(ContentTypes::Name).text().not_null())
                    .col(ColumnDef::new(ContentTypes::Slug).text().not_null())
                    .col(ColumnDef::new(ContentTypes::Schema).json_binary().not_null())
                    .col(
                        ColumnDef::new(ContentTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ContentTypes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_types_organization_id")
                            .from(ContentTypes::Table, ContentTypes::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_types_organization")
                    .table(ContentTypes::Table)
                    .col(ContentTypes::OrganizationId)
                    .col(ContentTypes::Slug)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_content_types_organization").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ContentTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContentTypes {
    Table,
    Id,
    OrganizationId,
    Name,
    Slug,
    Schema,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}
