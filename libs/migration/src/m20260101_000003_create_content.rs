use sea_orm_migration::{prelude::*, schema::*};

use crate::add_touch_trigger;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Per-user content tables all share `id`, `user_id` and timestamps.
fn owned_table<T: IntoIden + Copy + 'static>(
    table: T,
    id: T,
    user_id: T,
    created_at: T,
    updated_at: T,
    fk_name: &str,
) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(pk_uuid(id))
        .col(uuid(user_id))
        .col(timestamp_with_time_zone(created_at).default(Expr::current_timestamp()))
        .col(timestamp_with_time_zone(updated_at).default(Expr::current_timestamp()))
        .foreign_key(
            ForeignKey::create()
                .name(fk_name)
                .from(table, user_id)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                owned_table(
                    Images::Table,
                    Images::Id,
                    Images::UserId,
                    Images::CreatedAt,
                    Images::UpdatedAt,
                    "fk_images_user_id",
                )
                .col(text(Images::Path))
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                owned_table(
                    Texts::Table,
                    Texts::Id,
                    Texts::UserId,
                    Texts::CreatedAt,
                    Texts::UpdatedAt,
                    "fk_texts_user_id",
                )
                .col(text(Texts::Text))
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                owned_table(
                    Videos::Table,
                    Videos::Id,
                    Videos::UserId,
                    Videos::CreatedAt,
                    Videos::UpdatedAt,
                    "fk_videos_user_id",
                )
                .col(text(Videos::Link))
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                owned_table(
                    ContentTables::Table,
                    ContentTables::Id,
                    ContentTables::UserId,
                    ContentTables::CreatedAt,
                    ContentTables::UpdatedAt,
                    "fk_content_tables_user_id",
                )
                .col(json_binary(ContentTables::Headers))
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                owned_table(
                    DataTables::Table,
                    DataTables::Id,
                    DataTables::UserId,
                    DataTables::CreatedAt,
                    DataTables::UpdatedAt,
                    "fk_data_tables_user_id",
                )
                .col(uuid(DataTables::TableId))
                .col(json_binary(DataTables::Data))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_data_tables_table_id")
                        .from(DataTables::Table, DataTables::TableId)
                        .to(ContentTables::Table, ContentTables::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
            )
            .await?;

        for (name, table, column) in [
            ("idx_images_user_id", "images", "user_id"),
            ("idx_texts_user_id", "texts", "user_id"),
            ("idx_videos_user_id", "videos", "user_id"),
            ("idx_content_tables_user_id", "content_tables", "user_id"),
            ("idx_data_tables_table_id", "data_tables", "table_id"),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Alias::new(table))
                        .col(Alias::new(column))
                        .to_owned(),
                )
                .await?;
        }

        for table in ["images", "texts", "videos", "content_tables", "data_tables"] {
            add_touch_trigger(manager, table).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataTables::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ContentTables::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Videos::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Texts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
enum Images {
    Table,
    Id,
    UserId,
    Path,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Texts {
    Table,
    Id,
    UserId,
    Text,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Videos {
    Table,
    Id,
    UserId,
    Link,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum ContentTables {
    Table,
    Id,
    UserId,
    Headers,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum DataTables {
    Table,
    Id,
    UserId,
    TableId,
    Data,
    CreatedAt,
    UpdatedAt,
}
