use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

// ===== Users =====

pub mod users {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub email: String,
        pub password_hash: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::User {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                email: model.email,
                password_hash: model.password_hash,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<crate::models::User> for ActiveModel {
        fn from(user: crate::models::User) -> Self {
            ActiveModel {
                id: Set(user.id),
                email: Set(user.email),
                password_hash: Set(user.password_hash),
                created_at: Set(user.created_at.into()),
                updated_at: Set(user.updated_at.into()),
            }
        }
    }
}

// ===== Roles =====

pub mod roles {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "roles")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub title: String,
        pub priority: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Role {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                title: model.title,
                priority: model.priority,
            }
        }
    }
}

// ===== User roles =====

pub mod user_roles {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "user_roles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub role_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

// ===== Tokens =====

pub mod tokens {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "tokens")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        #[sea_orm(column_type = "Text")]
        pub access_token: String,
        #[sea_orm(column_type = "Text")]
        pub refresh_token: String,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Session {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                access_token: model.access_token,
                refresh_token: model.refresh_token,
                created_at: model.created_at.into(),
            }
        }
    }

    impl From<crate::models::Session> for ActiveModel {
        fn from(session: crate::models::Session) -> Self {
            ActiveModel {
                id: Set(session.id),
                user_id: Set(session.user_id),
                access_token: Set(session.access_token),
                refresh_token: Set(session.refresh_token),
                created_at: Set(session.created_at.into()),
            }
        }
    }
}
