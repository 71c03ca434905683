use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    entity::{roles, tokens, user_roles, users},
    error::{AuthError, AuthResult},
    models::{Role, Session, TokenPair, User},
    repository::UserRepository,
};

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let model = users::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_role(&self, title: &str) -> AuthResult<Option<Role>> {
        let model = roles::Entity::find()
            .filter(roles::Column::Title.eq(title))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn roles_of(&self, user_id: Uuid) -> AuthResult<Vec<Role>> {
        let role_ids: Vec<i32> = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.role_id)
            .collect();

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = roles::Entity::find()
            .filter(roles::Column::Id.is_in(role_ids))
            .order_by_desc(roles::Column::Priority)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_account(&self, user: User, role: Role, pair: TokenPair) -> AuthResult<User> {
        let txn = self.db.begin().await?;

        let exists = users::Entity::find()
            .filter(users::Column::Email.eq(user.email.as_str()))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            return Err(AuthError::DuplicateEmail(user.email));
        }

        let model = users::ActiveModel::from(user).insert(&txn).await?;

        user_roles::ActiveModel {
            user_id: Set(model.id),
            role_id: Set(role.id),
        }
        .insert(&txn)
        .await?;

        tokens::ActiveModel::from(Session::new(model.id, &pair))
            .insert(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn save_session(&self, user_id: Uuid, pair: TokenPair) -> AuthResult<()> {
        tokens::ActiveModel::from(Session::new(user_id, &pair))
            .insert(&self.db)
            .await?;
        Ok(())
    }

    async fn find_session_by_refresh(&self, refresh_token: &str) -> AuthResult<Option<Session>> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::RefreshToken.eq(refresh_token))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn session_exists(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AuthResult<bool> {
        let model = tokens::Entity::find()
            .filter(
                Condition::all()
                    .add(tokens::Column::UserId.eq(user_id))
                    .add(tokens::Column::AccessToken.eq(access_token))
                    .add(tokens::Column::RefreshToken.eq(refresh_token)),
            )
            .one(&self.db)
            .await?;
        Ok(model.is_some())
    }

    async fn access_token_active(&self, user_id: Uuid, access_token: &str) -> AuthResult<bool> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::UserId.eq(user_id))
            .filter(tokens::Column::AccessToken.eq(access_token))
            .one(&self.db)
            .await?;
        Ok(model.is_some())
    }

    async fn rotate_session(
        &self,
        user_id: Uuid,
        old_refresh: &str,
        pair: TokenPair,
    ) -> AuthResult<()> {
        let txn = self.db.begin().await?;

        tokens::Entity::delete_many()
            .filter(tokens::Column::RefreshToken.eq(old_refresh))
            .exec(&txn)
            .await?;

        tokens::ActiveModel::from(Session::new(user_id, &pair))
            .insert(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn remove_session(&self, user_id: Uuid, refresh_token: &str) -> AuthResult<bool> {
        let result = tokens::Entity::delete_many()
            .filter(tokens::Column::UserId.eq(user_id))
            .filter(tokens::Column::RefreshToken.eq(refresh_token))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %user_id, "Removed session");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
