use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::add_touch_trigger;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(DoorPurpose::Enum)
                    .values([DoorPurpose::Apartment, DoorPurpose::Home])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(AdditionalFeature::Enum)
                    .values([AdditionalFeature::Outdated, AdditionalFeature::Showcase])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Doors::Table)
                    .if_not_exists()
                    .col(pk_uuid(Doors::Id))
                    .col(string(Doors::Title))
                    .col(text(Doors::ImageEntry))
                    .col(text(Doors::ImageExit))
                    .col(
                        timestamp_with_time_zone(Doors::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Doors::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        add_touch_trigger(manager, "doors").await?;

        // The storefront always reads the whole catalog newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_doors_updated_at")
                    .table(Doors::Table)
                    .col(Doors::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Articles::Table)
                    .if_not_exists()
                    .col(pk_uuid(Articles::Id))
                    .col(uuid(Articles::DoorId))
                    .col(string(Articles::Title))
                    .col(integer(Articles::Width))
                    .col(integer(Articles::Height))
                    .col(
                        ColumnDef::new(Articles::Target)
                            .enumeration(
                                DoorPurpose::Enum,
                                [DoorPurpose::Apartment, DoorPurpose::Home],
                            )
                            .not_null(),
                    )
                    .col(boolean(Articles::OpeningDirection).default(false))
                    .col(boolean(Articles::Mirror).default(false))
                    .col(
                        ColumnDef::new(Articles::AdditionalFeatures)
                            .enumeration(
                                AdditionalFeature::Enum,
                                [AdditionalFeature::Outdated, AdditionalFeature::Showcase],
                            )
                            .null(),
                    )
                    .col(boolean(Articles::IsDefect).default(false))
                    .col(big_integer(Articles::Price))
                    .col(
                        timestamp_with_time_zone(Articles::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_articles_door_id")
                            .from(Articles::Table, Articles::DoorId)
                            .to(Doors::Table, Doors::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_articles_door_id")
                    .table(Articles::Table)
                    .col(Articles::DoorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ArticleImages::Table)
                    .if_not_exists()
                    .col(pk_uuid(ArticleImages::Id))
                    .col(uuid(ArticleImages::ArticleId))
                    .col(text(ArticleImages::Path))
                    .col(
                        timestamp_with_time_zone(ArticleImages::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_images_article_id")
                            .from(ArticleImages::Table, ArticleImages::ArticleId)
                            .to(Articles::Table, Articles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_article_images_article_id")
                    .table(ArticleImages::Table)
                    .col(ArticleImages::ArticleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilterInfo::Table)
                    .if_not_exists()
                    .col(integer(FilterInfo::Id).primary_key())
                    .col(text(FilterInfo::Image))
                    .col(
                        timestamp_with_time_zone(FilterInfo::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FilterInfo::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ArticleImages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Articles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Doors::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(AdditionalFeature::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(DoorPurpose::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Doors {
    Table,
    Id,
    Title,
    ImageEntry,
    ImageExit,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Articles {
    Table,
    Id,
    DoorId,
    Title,
    Width,
    Height,
    Target,
    OpeningDirection,
    Mirror,
    AdditionalFeatures,
    IsDefect,
    Price,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ArticleImages {
    Table,
    Id,
    ArticleId,
    Path,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FilterInfo {
    Table,
    Id,
    Image,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DoorPurpose {
    #[sea_orm(iden = "door_purpose")]
    Enum,
    #[sea_orm(iden = "apartment")]
    Apartment,
    #[sea_orm(iden = "home")]
    Home,
}

#[derive(DeriveIden)]
enum AdditionalFeature {
    #[sea_orm(iden = "additional_feature")]
    Enum,
    #[sea_orm(iden = "outdated")]
    Outdated,
    #[sea_orm(iden = "showcase")]
    Showcase,
}
