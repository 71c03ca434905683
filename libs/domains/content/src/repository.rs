use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ContentResult;
use crate::models::{ContentTable, Image, TableRow, Text, Video};

/// Persistence for per-user content. Every lookup is scoped by `user_id`;
/// a record owned by someone else behaves as if it did not exist.
///
/// Lists are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn list_images(&self, user_id: Uuid) -> ContentResult<Vec<Image>>;
    async fn get_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Image>>;
    async fn insert_image(&self, image: Image) -> ContentResult<Image>;
    async fn update_image(&self, user_id: Uuid, id: Uuid, path: String) -> ContentResult<Option<Image>>;
    async fn delete_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool>;

    async fn list_texts(&self, user_id: Uuid) -> ContentResult<Vec<Text>>;
    async fn get_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Text>>;
    async fn insert_text(&self, text: Text) -> ContentResult<Text>;
    async fn update_text(&self, user_id: Uuid, id: Uuid, text: String) -> ContentResult<Option<Text>>;
    async fn delete_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool>;

    async fn list_videos(&self, user_id: Uuid) -> ContentResult<Vec<Video>>;
    async fn get_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Video>>;
    async fn insert_video(&self, video: Video) -> ContentResult<Video>;
    async fn update_video(&self, user_id: Uuid, id: Uuid, link: String) -> ContentResult<Option<Video>>;
    async fn delete_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool>;

    async fn list_tables(&self, user_id: Uuid) -> ContentResult<Vec<ContentTable>>;
    async fn get_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<ContentTable>>;
    async fn insert_table(&self, table: ContentTable) -> ContentResult<ContentTable>;
    async fn update_table(
        &self,
        user_id: Uuid,
        id: Uuid,
        headers: serde_json::Value,
    ) -> ContentResult<Option<ContentTable>>;
    /// Removes the table together with its rows.
    async fn delete_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool>;

    async fn list_rows(&self, user_id: Uuid, table_id: Uuid) -> ContentResult<Vec<TableRow>>;
    async fn get_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<Option<TableRow>>;
    async fn insert_row(&self, row: TableRow) -> ContentResult<TableRow>;
    async fn update_row(
        &self,
        user_id: Uuid,
        table_id: Uuid,
        id: Uuid,
        data: serde_json::Value,
    ) -> ContentResult<Option<TableRow>>;
    async fn delete_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<bool>;
}

trait Owned: Clone {
    fn id(&self) -> Uuid;
    fn owner(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn touch(&mut self, now: DateTime<Utc>);
}

macro_rules! impl_owned {
    ($($ty:ty),*) => {
        $(impl Owned for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
            fn owner(&self) -> Uuid {
                self.user_id
            }
            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
            fn touch(&mut self, now: DateTime<Utc>) {
                self.updated_at = now;
            }
        })*
    };
}

impl_owned!(Image, Text, Video, ContentTable, TableRow);

fn newest_first<'a, T: Owned + 'a>(records: impl Iterator<Item = &'a T>) -> Vec<T> {
    let mut list: Vec<T> = records.cloned().collect();
    list.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
    list
}

fn owned<T: Owned>(map: &HashMap<Uuid, T>, user_id: Uuid, id: Uuid) -> Option<T> {
    map.get(&id).filter(|r| r.owner() == user_id).cloned()
}

fn update_owned<T: Owned>(
    map: &mut HashMap<Uuid, T>,
    user_id: Uuid,
    id: Uuid,
    apply: impl FnOnce(&mut T),
) -> Option<T> {
    let record = map.get_mut(&id).filter(|r| r.owner() == user_id)?;
    apply(record);
    record.touch(Utc::now());
    Some(record.clone())
}

fn remove_owned<T: Owned>(map: &mut HashMap<Uuid, T>, user_id: Uuid, id: Uuid) -> bool {
    if map.get(&id).is_some_and(|r| r.owner() == user_id) {
        map.remove(&id);
        true
    } else {
        false
    }
}

#[derive(Default)]
struct Store {
    images: HashMap<Uuid, Image>,
    texts: HashMap<Uuid, Text>,
    videos: HashMap<Uuid, Video>,
    tables: HashMap<Uuid, ContentTable>,
    rows: HashMap<Uuid, TableRow>,
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryContentRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn list_images(&self, user_id: Uuid) -> ContentResult<Vec<Image>> {
        let store = self.store.read().await;
        Ok(newest_first(store.images.values().filter(|r| r.user_id == user_id)))
    }

    async fn get_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Image>> {
        Ok(owned(&self.store.read().await.images, user_id, id))
    }

    async fn insert_image(&self, image: Image) -> ContentResult<Image> {
        let mut store = self.store.write().await;
        store.images.insert(image.id, image.clone());
        tracing::info!(image_id = %image.id, user_id = %image.user_id, "Created image");
        Ok(image)
    }

    async fn update_image(&self, user_id: Uuid, id: Uuid, path: String) -> ContentResult<Option<Image>> {
        let mut store = self.store.write().await;
        let updated = update_owned(&mut store.images, user_id, id, |r| r.path = path);
        if updated.is_some() {
            tracing::info!(image_id = %id, "Updated image");
        }
        Ok(updated)
    }

    async fn delete_image(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let mut store = self.store.write().await;
        let deleted = remove_owned(&mut store.images, user_id, id);
        if deleted {
            tracing::info!(image_id = %id, "Deleted image");
        }
        Ok(deleted)
    }

    async fn list_texts(&self, user_id: Uuid) -> ContentResult<Vec<Text>> {
        let store = self.store.read().await;
        Ok(newest_first(store.texts.values().filter(|r| r.user_id == user_id)))
    }

    async fn get_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Text>> {
        Ok(owned(&self.store.read().await.texts, user_id, id))
    }

    async fn insert_text(&self, text: Text) -> ContentResult<Text> {
        let mut store = self.store.write().await;
        store.texts.insert(text.id, text.clone());
        tracing::info!(text_id = %text.id, user_id = %text.user_id, "Created text");
        Ok(text)
    }

    async fn update_text(&self, user_id: Uuid, id: Uuid, text: String) -> ContentResult<Option<Text>> {
        let mut store = self.store.write().await;
        let updated = update_owned(&mut store.texts, user_id, id, |r| r.text = text);
        if updated.is_some() {
            tracing::info!(text_id = %id, "Updated text");
        }
        Ok(updated)
    }

    async fn delete_text(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let mut store = self.store.write().await;
        let deleted = remove_owned(&mut store.texts, user_id, id);
        if deleted {
            tracing::info!(text_id = %id, "Deleted text");
        }
        Ok(deleted)
    }

    async fn list_videos(&self, user_id: Uuid) -> ContentResult<Vec<Video>> {
        let store = self.store.read().await;
        Ok(newest_first(store.videos.values().filter(|r| r.user_id == user_id)))
    }

    async fn get_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<Video>> {
        Ok(owned(&self.store.read().await.videos, user_id, id))
    }

    async fn insert_video(&self, video: Video) -> ContentResult<Video> {
        let mut store = self.store.write().await;
        store.videos.insert(video.id, video.clone());
        tracing::info!(video_id = %video.id, user_id = %video.user_id, "Created video");
        Ok(video)
    }

    async fn update_video(&self, user_id: Uuid, id: Uuid, link: String) -> ContentResult<Option<Video>> {
        let mut store = self.store.write().await;
        let updated = update_owned(&mut store.videos, user_id, id, |r| r.link = link);
        if updated.is_some() {
            tracing::info!(video_id = %id, "Updated video");
        }
        Ok(updated)
    }

    async fn delete_video(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let mut store = self.store.write().await;
        let deleted = remove_owned(&mut store.videos, user_id, id);
        if deleted {
            tracing::info!(video_id = %id, "Deleted video");
        }
        Ok(deleted)
    }

    async fn list_tables(&self, user_id: Uuid) -> ContentResult<Vec<ContentTable>> {
        let store = self.store.read().await;
        Ok(newest_first(store.tables.values().filter(|r| r.user_id == user_id)))
    }

    async fn get_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<Option<ContentTable>> {
        Ok(owned(&self.store.read().await.tables, user_id, id))
    }

    async fn insert_table(&self, table: ContentTable) -> ContentResult<ContentTable> {
        let mut store = self.store.write().await;
        store.tables.insert(table.id, table.clone());
        tracing::info!(table_id = %table.id, user_id = %table.user_id, "Created table");
        Ok(table)
    }

    async fn update_table(
        &self,
        user_id: Uuid,
        id: Uuid,
        headers: serde_json::Value,
    ) -> ContentResult<Option<ContentTable>> {
        let mut store = self.store.write().await;
        let updated = update_owned(&mut store.tables, user_id, id, |r| r.headers = headers);
        if updated.is_some() {
            tracing::info!(table_id = %id, "Updated table");
        }
        Ok(updated)
    }

    async fn delete_table(&self, user_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let mut store = self.store.write().await;
        if !remove_owned(&mut store.tables, user_id, id) {
            return Ok(false);
        }
        store.rows.retain(|_, row| row.table_id != id);
        tracing::info!(table_id = %id, "Deleted table");
        Ok(true)
    }

    async fn list_rows(&self, user_id: Uuid, table_id: Uuid) -> ContentResult<Vec<TableRow>> {
        let store = self.store.read().await;
        Ok(newest_first(
            store
                .rows
                .values()
                .filter(|r| r.user_id == user_id && r.table_id == table_id),
        ))
    }

    async fn get_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<Option<TableRow>> {
        let store = self.store.read().await;
        Ok(owned(&store.rows, user_id, id).filter(|r| r.table_id == table_id))
    }

    async fn insert_row(&self, row: TableRow) -> ContentResult<TableRow> {
        let mut store = self.store.write().await;
        store.rows.insert(row.id, row.clone());
        tracing::info!(row_id = %row.id, table_id = %row.table_id, "Created table row");
        Ok(row)
    }

    async fn update_row(
        &self,
        user_id: Uuid,
        table_id: Uuid,
        id: Uuid,
        data: serde_json::Value,
    ) -> ContentResult<Option<TableRow>> {
        let mut store = self.store.write().await;
        if store.rows.get(&id).is_some_and(|r| r.table_id != table_id) {
            return Ok(None);
        }
        let updated = update_owned(&mut store.rows, user_id, id, |r| r.data = data);
        if updated.is_some() {
            tracing::info!(row_id = %id, "Updated table row");
        }
        Ok(updated)
    }

    async fn delete_row(&self, user_id: Uuid, table_id: Uuid, id: Uuid) -> ContentResult<bool> {
        let mut store = self.store.write().await;
        if store.rows.get(&id).is_some_and(|r| r.table_id != table_id) {
            return Ok(false);
        }
        let deleted = remove_owned(&mut store.rows, user_id, id);
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

    #[tokio::test]
    async fn test_records_are_scoped_by_owner() {
        let repo = InMemoryContentRepository::new();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();

        let text = repo
            .insert_text(Text::new(owner, TextInput { text: "hello".into() }))
            .await
            .unwrap();

        assert!(repo.get_text(owner, text.id).await.unwrap().is_some());
        assert!(repo.get_text(stranger, text.id).await.unwrap().is_none());
        assert!(repo.list_texts(stranger).await.unwrap().is_empty());
        assert!(repo
            .update_text(stranger, text.id, "hijack".into())
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete_text(stranger, text.id).await.unwrap());
        assert_eq!(repo.get_text(owner, text.id).await.unwrap().unwrap().text, "hello");
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryContentRepository::new();
        let owner = Uuid::now_v7();

        let first = repo.insert_image(Image::new(owner, "a.png".into())).await.unwrap();
        let second = repo.insert_image(Image::new(owner, "b.png".into())).await.unwrap();

        let ids: Vec<Uuid> = repo
            .list_images(owner)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let repo = InMemoryContentRepository::new();
        let owner = Uuid::now_v7();
        let text = repo
            .insert_text(Text::new(owner, TextInput { text: "v1".into() }))
            .await
            .unwrap();

        let updated = repo
            .update_text(owner, text.id, "v2".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "v2");
        assert!(updated.updated_at >= text.updated_at);
        assert_eq!(updated.created_at, text.created_at);
    }

    #[tokio::test]
    async fn test_delete_table_removes_rows() {
        let repo = InMemoryContentRepository::new();
        let owner = Uuid::now_v7();
        let table = repo
            .insert_table(ContentTable::new(owner, TableInput { headers: json!(["a"]) }))
            .await
            .unwrap();
        let row = repo
            .insert_row(TableRow::new(owner, table.id, RowInput { data: json!(["1"]) }))
            .await
            .unwrap();

        assert!(repo.delete_table(owner, table.id).await.unwrap());
        assert!(repo.get_row(owner, table.id, row.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_row_must_match_table() {
        let repo = InMemoryContentRepository::new();
        let owner = Uuid::now_v7();
        let table = repo
            .insert_table(ContentTable::new(owner, TableInput { headers: json!(["a"]) }))
            .await
            .unwrap();
        let row = repo
            .insert_row(TableRow::new(owner, table.id, RowInput { data: json!(["1"]) }))
            .await
            .unwrap();
        let other_table = Uuid::now_v7();

        assert!(repo.get_row(owner, other_table, row.id).await.unwrap().is_none());
        assert!(repo
            .update_row(owner, other_table, row.id, json!(["2"]))
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete_row(owner, other_table, row.id).await.unwrap());
    }
}
