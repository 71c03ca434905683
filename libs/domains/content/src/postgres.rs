use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::{
    entity::{content_tables, data_tables, images, texts, videos},
    error::ContentResult,
    models::{ContentTable, Image, TableRow, Text, Video},
    repository::ContentRepository,
};

pub struct PgContentRepository {
    db: DatabaseConnection,
}

impl PgContentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn list_images(&self, user_id: Uuid) -> ContentResult<Vec<Image>> {
        let models = images::Entity::find()
            .filter(images::Column::UserId.eq(user_id))
            .order_by_desc(images::Column::CreatedAt)
            .order_by_desc(images::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Image::from).collect())
    }

    async fn get_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Image>> {
        let model = images::Entity::find_by_id(id)
            .filter(images::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Image::from))
    }

    async fn insert_image(&self, image: Image) -> ContentResult<Image> {
        let model = images::ActiveModel::from(&image).insert(&self.db).await?;
        tracing::info!(image_id = %model.id, user_id = %model.user_id, "Created image");
        Ok(model.into())
    }

    async fn update_image(
        &self,
        user_id: Uuid,
        id: Uuid,
        path: String,
    ) -> ContentResult<Option<Image>> {
        let Some(existing) = images::Entity::find_by_id(id)
            .filter(images::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = existing.into_active_model();
        active_model.path = Set(path);
        active_model.updated_at = Set(Utc::now().into());
        let model = active_model.update(&self.db).await?;

        tracing::info!(image_id = %id, "Updated image");
        Ok(Some(model.into()))
    }

    async fn delete_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let result = images::Entity::delete_many()
            .filter(images::Column::Id.eq(id))
            .filter(images::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(image_id = %id, "Deleted image");
        }
        Ok(deleted)
    }

    async fn list_texts(&self, user_id: Uuid) -> ContentResult<Vec<Text>> {
        let models = texts::Entity::find()
            .filter(texts::Column::UserId.eq(user_id))
            .order_by_desc(texts::Column::CreatedAt)
            .order_by_desc(texts::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Text::from).collect())
    }

    async fn get_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Text>> {
        let model = texts::Entity::find_by_id(id)
            .filter(texts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Text::from))
    }

    async fn insert_text(&self, text: Text) -> ContentResult<Text> {
        let model = texts::ActiveModel::from(&text).insert(&self.db).await?;
        tracing::info!(text_id = %model.id, user_id = %model.user_id, "Created text");
        Ok(model.into())
    }

    async fn update_text(
        &self,
        user_id: Uuid,
        id: Uuid,
        text: String,
    ) -> ContentResult<Option<Text>> {
        let Some(existing) = texts::Entity::find_by_id(id)
            .filter(texts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = existing.into_active_model();
        active_model.text = Set(text);
        active_model.updated_at = Set(Utc::now().into());
        let model = active_model.update(&self.db).await?;

        tracing::info!(text_id = %id, "Updated text");
        Ok(Some(model.into()))
    }

    async fn delete_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let result = texts::Entity::delete_many()
            .filter(texts::Column::Id.eq(id))
            .filter(texts::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(text_id = %id, "Deleted text");
        }
        Ok(deleted)
    }

    async fn list_videos(&self, user_id: Uuid) -> ContentResult<Vec<Video>> {
        let models = videos::Entity::find()
            .filter(videos::Column::UserId.eq(user_id))
            .order_by_desc(videos::Column::CreatedAt)
            .order_by_desc(videos::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Video::from).collect())
    }

    async fn get_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Video>> {
        let model = videos::Entity::find_by_id(id)
            .filter(videos::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Video::from))
    }

    async fn insert_video(&self, video: Video) -> ContentResult<Video> {
        let model = videos::ActiveModel::from(&video).insert(&self.db).await?;
        tracing::info!(video_id = %model.id, user_id = %model.user_id, "Created video");
        Ok(model.into())
    }

    async fn update_video(
        &self,
        user_id: Uuid,
        id: Uuid,
        link: String,
    ) -> ContentResult<Option<Video>> {
        let Some(existing) = videos::Entity::find_by_id(id)
            .filter(videos::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = existing.into_active_model();
        active_model.link = Set(link);
        active_model.updated_at = Set(Utc::now().into());
        let model = active_model.update(&self.db).await?;

        tracing::info!(video_id = %id, "Updated video");
        Ok(Some(model.into()))
    }

    async fn delete_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let result = videos::Entity::delete_many()
            .filter(videos::Column::Id.eq(id))
            .filter(videos::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(video_id = %id, "Deleted video");
        }
        Ok(deleted)
    }

    async fn list_tables(&self, user_id: Uuid) -> ContentResult<Vec<ContentTable>> {
        let models = content_tables::Entity::find()
            .filter(content_tables::Column::UserId.eq(user_id))
            .order_by_desc(content_tables::Column::CreatedAt)
            .order_by_desc(content_tables::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ContentTable::from).collect())
    }

    async fn get_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<ContentTable>> {
        let model = content_tables::Entity::find_by_id(id)
            .filter(content_tables::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(ContentTable::from))
    }

    async fn insert_table(&self, table: ContentTable) -> ContentResult<ContentTable> {
        let model = content_tables::ActiveModel::from(&table).insert(&self.db).await?;
        tracing::info!(table_id = %model.id, user_id = %model.user_id, "Created table");
        Ok(model.into())
    }

    async fn update_table(
        &self,
        user_id: Uuid,
        id: Uuid,
        headers: serde_json::Value,
    ) -> ContentResult<Option<ContentTable>> {
        let Some(existing) = content_tables::Entity::find_by_id(id)
            .filter(content_tables::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = existing.into_active_model();
        active_model.headers = Set(headers);
        active_model.updated_at = Set(Utc::now().into());
        let model = active_model.update(&self.db).await?;

        tracing::info!(table_id = %id, "Updated table");
        Ok(Some(model.into()))
    }

    async fn delete_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        // Rows go with the table through the `data_tables.table_id` cascade
        let result = content_tables::Entity::delete_many()
            .filter(content_tables::Column::Id.eq(id))
            .filter(content_tables::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(table_id = %id, "Deleted table");
        }
        Ok(deleted)
    }

    async fn list_rows(&self, user_id: Uuid, table_id: Uuid) -> ContentResult<Vec<TableRow>> {
        let models = data_tables::Entity::find()
            .filter(data_tables::Column::UserId.eq(user_id))
            .filter(data_tables::Column::TableId.eq(table_id))
            .order_by_desc(data_tables::Column::CreatedAt)
            .order_by_desc(data_tables::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(TableRow::from).collect())
    }

    async fn get_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<Option<TableRow>> {
        let model = data_tables::Entity::find_by_id(id)
            .filter(data_tables::Column::UserId.eq(user_id))
            .filter(data_tables::Column::TableId.eq(table_id))
            .one(&self.db)
            .await?;
        Ok(model.map(TableRow::from))
    }

    async fn insert_row(&self, row: TableRow) -> ContentResult<TableRow> {
        let model = data_tables::ActiveModel::from(&row).insert(&self.db).await?;
        tracing::info!(row_id = %model.id, table_id = %model.table_id, "Created table row");
        Ok(model.into())
    }

    async fn update_row(
        &self,
        user_id: Uuid,
        table_id: Uuid,
        id: Uuid,
        data: serde_json::Value,
    ) -> ContentResult<Option<TableRow>> {
        let Some(existing) = data_tables::Entity::find_by_id(id)
            .filter(data_tables::Column::UserId.eq(user_id))
            .filter(data_tables::Column::TableId.eq(table_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = existing.into_active_model();
        active_model.data = Set(data);
        active_model.updated_at = Set(Utc::now().into());
        let model = active_model.update(&self.db).await?;

        tracing::info!(row_id = %id, "Updated table row");
        Ok(Some(model.into()))
    }

    async fn delete_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let result = data_tables::Entity::delete_many()
            .filter(data_tables::Column::Id.eq(id))
            .filter(data_tables::Column::UserId.eq(user_id))
            .filter(data_tables::Column::TableId.eq(table_id))
            .exec(&self.db)
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(row_id = %id, "Deleted table row");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RowInput, TableInput, TextInput};
    use serde_json::json;
    use test_utils::TestDatabase;

    async fn seed_user(db: &DatabaseConnection) -> Uuid {
        use sea_orm::{ConnectionTrait, Statement};

        let id = Uuid::now_v7();
        db.execute_raw(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, 'x')",
            [id.into(), format!("{id}@example.com").into()],
        ))
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_text_crud_is_owner_scoped() {
        let test_db = TestDatabase::new().await;
        let db = test_db.connection();
        let owner = seed_user(&db).await;
        let stranger = seed_user(&db).await;
        let repo = PgContentRepository::new(db);

        let text = repo
            .insert_text(Text::new(owner, TextInput { text: "hello".into() }))
            .await
            .unwrap();
        assert!(repo.get_text(stranger, text.id).await.unwrap().is_none());

        let updated = repo
            .update_text(owner, text.id, "bye".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "bye");

        assert!(!repo.delete_text(stranger, text.id).await.unwrap());
        assert!(repo.delete_text(owner, text.id).await.unwrap());
        assert!(repo.list_texts(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_table_delete_cascades_rows() {
        let test_db = TestDatabase::new().await;
        let db = test_db.connection();
        let owner = seed_user(&db).await;
        let repo = PgContentRepository::new(db);

        let table = repo
            .insert_table(ContentTable::new(owner, TableInput { headers: json!(["Model", "Price"]) }))
            .await
            .unwrap();
        let row = repo
            .insert_row(TableRow::new(owner, table.id, RowInput { data: json!(["A1", 100]) }))
            .await
            .unwrap();
        assert_eq!(repo.list_rows(owner, table.id).await.unwrap().len(), 1);

        assert!(repo.delete_table(owner, table.id).await.unwrap());
        assert!(repo.get_row(owner, table.id, row.id).await.unwrap().is_none());
    }
}
