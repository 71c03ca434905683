use std::sync::Arc;

use core_config::assets::AssetConfig;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ContentError, ContentResult};
use crate::models::{
    ContentTable, Image, ImageUpload, ImageView, RowInput, TableInput, TableRow, Text, TextInput,
    Video, VideoInput,
};
use crate::repository::ContentRepository;
use crate::storage::{image_extension, ImageStorage};

/// Per-user content operations. `user_id` always comes from the caller's
/// access token.
#[derive(Clone)]
pub struct ContentService<R: ContentRepository> {
    repository: Arc<R>,
    storage: Arc<dyn ImageStorage>,
    assets: AssetConfig,
}

impl<R: ContentRepository> ContentService<R> {
    pub fn new(repository: R, storage: Arc<dyn ImageStorage>, assets: AssetConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            storage,
            assets,
        }
    }

    fn view(&self, image: Image) -> ImageView {
        ImageView {
            id: image.id,
            url: self.assets.resolve(&image.path),
            created_at: image.created_at,
            updated_at: image.updated_at,
        }
    }

    async fn store_upload(&self, upload: &ImageUpload) -> ContentResult<String> {
        if upload.bytes.is_empty() {
            return Err(ContentError::Validation("Image file is empty".to_string()));
        }
        let extension = image_extension(upload.file_name.as_deref())?;
        self.storage.save(&extension, &upload.bytes).await
    }

    /// Removes a file no record points at any more. Failures leave an
    /// orphaned file behind and are only logged.
    async fn discard_file(&self, path: &str) {
        if let Err(error) = self.storage.remove(path).await {
            tracing::warn!(path, %error, "Failed to remove image file");
        }
    }

    // ===== Images =====

    #[instrument(skip(self, upload), fields(size = upload.bytes.len()))]
    pub async fn add_image(&self, user_id: Uuid, upload: ImageUpload) -> ContentResult<ImageView> {
        let path = self.store_upload(&upload).await?;
        let image = self.repository.insert_image(Image::new(user_id, path)).await?;
        Ok(self.view(image))
    }

    /// Swaps the stored file; the previous file is removed once the record
    /// points at the new one.
    #[instrument(skip(self, upload), fields(size = upload.bytes.len()))]
    pub async fn edit_image(
        &self,
        user_id: Uuid,
        id: Uuid,
        upload: ImageUpload,
    ) -> ContentResult<ImageView> {
        let existing = self
            .repository
            .get_image(user_id, id)
            .await?
            .ok_or_else(|| ContentError::image(id))?;

        let path = self.store_upload(&upload).await?;
        let Some(updated) = self.repository.update_image(user_id, id, path.clone()).await? else {
            self.discard_file(&path).await;
            return Err(ContentError::image(id));
        };

        self.discard_file(&existing.path).await;
        Ok(self.view(updated))
    }

    #[instrument(skip(self))]
    pub async fn delete_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<()> {
        let existing = self
            .repository
            .get_image(user_id, id)
            .await?
            .ok_or_else(|| ContentError::image(id))?;

        if !self.repository.delete_image(user_id, id).await? {
            return Err(ContentError::image(id));
        }
        self.discard_file(&existing.path).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<ImageView> {
        self.repository
            .get_image(user_id, id)
            .await?
            .map(|image| self.view(image))
            .ok_or_else(|| ContentError::image(id))
    }

    #[instrument(skip(self))]
    pub async fn list_images(&self, user_id: Uuid) -> ContentResult<Vec<ImageView>> {
        let images = self.repository.list_images(user_id).await?;
        Ok(images.into_iter().map(|image| self.view(image)).collect())
    }

    // ===== Texts =====

    #[instrument(skip(self, input))]
    pub async fn add_text(&self, user_id: Uuid, input: TextInput) -> ContentResult<Text> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.repository.insert_text(Text::new(user_id, input)).await
    }

    #[instrument(skip(self, input))]
    pub async fn edit_text(&self, user_id: Uuid, id: Uuid, input: TextInput) -> ContentResult<Text> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.repository
            .update_text(user_id, id, input.text)
            .await?
            .ok_or_else(|| ContentError::text(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<()> {
        if self.repository.delete_text(user_id, id).await? {
            Ok(())
        } else {
            Err(ContentError::text(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<Text> {
        self.repository
            .get_text(user_id, id)
            .await?
            .ok_or_else(|| ContentError::text(id))
    }

    #[instrument(skip(self))]
    pub async fn list_texts(&self, user_id: Uuid) -> ContentResult<Vec<Text>> {
        self.repository.list_texts(user_id).await
    }

    // ===== Videos =====

    #[instrument(skip(self, input))]
    pub async fn add_video(&self, user_id: Uuid, input: VideoInput) -> ContentResult<Video> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.repository.insert_video(Video::new(user_id, input)).await
    }

    #[instrument(skip(self, input))]
    pub async fn edit_video(&self, user_id: Uuid, id: Uuid, input: VideoInput) -> ContentResult<Video> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.repository
            .update_video(user_id, id, input.link)
            .await?
            .ok_or_else(|| ContentError::video(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<()> {
        if self.repository.delete_video(user_id, id).await? {
            Ok(())
        } else {
            Err(ContentError::video(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<Video> {
        self.repository
            .get_video(user_id, id)
            .await?
            .ok_or_else(|| ContentError::video(id))
    }

    #[instrument(skip(self))]
    pub async fn list_videos(&self, user_id: Uuid) -> ContentResult<Vec<Video>> {
        self.repository.list_videos(user_id).await
    }

    // ===== Tables =====

    #[instrument(skip(self, input))]
    pub async fn add_table(&self, user_id: Uuid, input: TableInput) -> ContentResult<ContentTable> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.repository
            .insert_table(ContentTable::new(user_id, input))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn edit_table(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: TableInput,
    ) -> ContentResult<ContentTable> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.repository
            .update_table(user_id, id, input.headers)
            .await?
            .ok_or_else(|| ContentError::table(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<()> {
        if self.repository.delete_table(user_id, id).await? {
            Ok(())
        } else {
            Err(ContentError::table(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<ContentTable> {
        self.repository
            .get_table(user_id, id)
            .await?
            .ok_or_else(|| ContentError::table(id))
    }

    #[instrument(skip(self))]
    pub async fn list_tables(&self, user_id: Uuid) -> ContentResult<Vec<ContentTable>> {
        self.repository.list_tables(user_id).await
    }

    // ===== Table rows =====

    /// Every row operation starts here: the table must belong to the caller.
    async fn ensure_table(&self, user_id: Uuid, table_id: Uuid) -> ContentResult<()> {
        match self.repository.get_table(user_id, table_id).await? {
            Some(_) => Ok(()),
            None => Err(ContentError::table(table_id)),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn add_row(&self, user_id: Uuid, table_id: Uuid, input: RowInput) -> ContentResult<TableRow> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.ensure_table(user_id, table_id).await?;
        self.repository
            .insert_row(TableRow::new(user_id, table_id, input))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn edit_row(
        &self,
        user_id: Uuid,
        table_id: Uuid,
        id: Uuid,
        input: RowInput,
    ) -> ContentResult<TableRow> {
        input
            .validate()
            .map_err(|e| ContentError::Validation(e.to_string()))?;
        self.ensure_table(user_id, table_id).await?;
        self.repository
            .update_row(user_id, table_id, id, input.data)
            .await?
            .ok_or_else(|| ContentError::row(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<()> {
        self.ensure_table(user_id, table_id).await?;
        if self.repository.delete_row(user_id, table_id, id).await? {
            Ok(())
        } else {
            Err(ContentError::row(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<TableRow> {
        self.ensure_table(user_id, table_id).await?;
        self.repository
            .get_row(user_id, table_id, id)
            .await?
            .ok_or_else(|| ContentError::row(id))
    }

    #[instrument(skip(self))]
    pub async fn list_rows(&self, user_id: Uuid, table_id: Uuid) -> ContentResult<Vec<TableRow>> {
        self.ensure_table(user_id, table_id).await?;
        self.repository.list_rows(user_id, table_id).await
    }
}
