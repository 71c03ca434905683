use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::models::{AdditionalFeature, DoorPurpose};

// ===== Doors =====

pub mod doors {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "doors")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub title: String,
        #[sea_orm(column_type = "Text")]
        pub image_entry: String,
        #[sea_orm(column_type = "Text")]
        pub image_exit: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::articles::Entity")]
        Articles,
    }

    impl Related<super::articles::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Articles.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub fn into_item(self, variants: Vec<crate::models::Variant>) -> crate::models::CatalogItem {
            crate::models::CatalogItem {
                id: self.id,
                title: self.title,
                image_entry: self.image_entry,
                image_exit: self.image_exit,
                variants,
                created_at: self.created_at.into(),
                updated_at: self.updated_at.into(),
            }
        }
    }

    impl From<crate::models::CreateDoor> for ActiveModel {
        fn from(input: crate::models::CreateDoor) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                title: Set(input.title),
                image_entry: Set(input.image_entry),
                image_exit: Set(input.image_exit),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

// ===== Articles =====

pub mod articles {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "articles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub door_id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub title: String,
        pub width: i32,
        pub height: i32,
        pub target: DoorPurpose,
        pub opening_direction: bool,
        pub mirror: bool,
        pub additional_features: Option<AdditionalFeature>,
        pub is_defect: bool,
        pub price: i64,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::doors::Entity",
            from = "Column::DoorId",
            to = "super::doors::Column::Id",
            on_delete = "Cascade"
        )]
        Door,
        #[sea_orm(has_many = "super::article_images::Entity")]
        Images,
    }

    impl Related<super::doors::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Door.def()
        }
    }

    impl Related<super::article_images::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Images.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub fn into_variant(self, images: Vec<String>) -> crate::models::Variant {
            crate::models::Variant {
                id: self.id,
                item_id: self.door_id,
                title: self.title,
                width: self.width,
                height: self.height,
                target: self.target,
                opening_direction: self.opening_direction,
                mirror: self.mirror,
                additional_features: self.additional_features,
                is_defect: self.is_defect,
                price: self.price,
                images,
            }
        }
    }

    impl From<&crate::models::Variant> for ActiveModel {
        fn from(variant: &crate::models::Variant) -> Self {
            ActiveModel {
                id: Set(variant.id),
                door_id: Set(variant.item_id),
                title: Set(variant.title.clone()),
                width: Set(variant.width),
                height: Set(variant.height),
                target: Set(variant.target),
                opening_direction: Set(variant.opening_direction),
                mirror: Set(variant.mirror),
                additional_features: Set(variant.additional_features),
                is_defect: Set(variant.is_defect),
                price: Set(variant.price),
                created_at: Set(chrono::Utc::now().into()),
            }
        }
    }
}

// ===== Article images =====

pub mod article_images {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "article_images")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub article_id: Uuid,
        #[sea_orm(column_type = "Text")]
        pub path: String,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::articles::Entity",
            from = "Column::ArticleId",
            to = "super::articles::Column::Id",
            on_delete = "Cascade"
        )]
        Article,
    }

    impl Related<super::articles::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Article.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    pub fn new_image(article_id: Uuid, path: String) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            article_id: Set(article_id),
            path: Set(path),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}

// ===== Filter illustration =====

pub mod filter_info {
    use super::*;

    /// Single-row table; the row with `id = 1` holds the current image.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "filter_info")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i32,
        #[sea_orm(column_type = "Text")]
        pub image: String,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    pub const SINGLETON_ID: i32 = 1;
}
