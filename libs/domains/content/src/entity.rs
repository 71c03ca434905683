use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::models::{ContentTable, Image, TableRow, Text, Video};

// ===== Images =====

pub mod images {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "images")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        #[sea_orm(column_type = "Text")]
        pub path: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Image {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                path: model.path,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<&Image> for ActiveModel {
        fn from(record: &Image) -> Self {
            ActiveModel {
                id: Set(record.id),
                user_id: Set(record.user_id),
                path: Set(record.path.clone()),
                created_at: Set(record.created_at.into()),
                updated_at: Set(record.updated_at.into()),
            }
        }
    }
}

// ===== Texts =====

pub mod texts {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "texts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        #[sea_orm(column_type = "Text")]
        pub text: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Text {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                text: model.text,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<&Text> for ActiveModel {
        fn from(record: &Text) -> Self {
            ActiveModel {
                id: Set(record.id),
                user_id: Set(record.user_id),
                text: Set(record.text.clone()),
                created_at: Set(record.created_at.into()),
                updated_at: Set(record.updated_at.into()),
            }
        }
    }
}

// ===== Videos =====

pub mod videos {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "videos")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        #[sea_orm(column_type = "Text")]
        pub link: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Video {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                link: model.link,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<&Video> for ActiveModel {
        fn from(record: &Video) -> Self {
            ActiveModel {
                id: Set(record.id),
                user_id: Set(record.user_id),
                link: Set(record.link.clone()),
                created_at: Set(record.created_at.into()),
                updated_at: Set(record.updated_at.into()),
            }
        }
    }
}

// ===== Tables =====

pub mod content_tables {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "content_tables")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        #[sea_orm(column_type = "JsonBinary")]
        pub headers: Json,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for ContentTable {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                headers: model.headers,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<&ContentTable> for ActiveModel {
        fn from(record: &ContentTable) -> Self {
            ActiveModel {
                id: Set(record.id),
                user_id: Set(record.user_id),
                headers: Set(record.headers.clone()),
                created_at: Set(record.created_at.into()),
                updated_at: Set(record.updated_at.into()),
            }
        }
    }
}

// ===== Table rows =====

pub mod data_tables {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "data_tables")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub table_id: Uuid,
        #[sea_orm(column_type = "JsonBinary")]
        pub data: Json,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::content_tables::Entity",
            from = "Column::TableId",
            to = "super::content_tables::Column::Id",
            on_delete = "Cascade"
        )]
        Table,
    }

    impl Related<super::content_tables::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Table.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for TableRow {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                table_id: model.table_id,
                data: model.data,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<&TableRow> for ActiveModel {
        fn from(record: &TableRow) -> Self {
            ActiveModel {
                id: Set(record.id),
                user_id: Set(record.user_id),
                table_id: Set(record.table_id),
                data: Set(record.data.clone()),
                created_at: Set(record.created_at.into()),
                updated_at: Set(record.updated_at.into()),
            }
        }
    }
}
