use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CatalogItem, CreateDoor, CreateVariant, UpdateDoor, Variant};

/// Persistence for doors, their articles and the filter illustration.
///
/// Image fields hold paths relative to the uploads directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Every door with its articles, most recently updated first. Articles
    /// and their images keep insertion order.
    async fn snapshot(&self) -> CatalogResult<Vec<CatalogItem>>;

    async fn get_item(&self, id: Uuid) -> CatalogResult<Option<CatalogItem>>;

    async fn create_item(&self, input: CreateDoor) -> CatalogResult<CatalogItem>;

    async fn update_item(&self, id: Uuid, input: UpdateDoor) -> CatalogResult<CatalogItem>;

    /// Removes the door together with its articles and their images.
    async fn delete_item(&self, id: Uuid) -> CatalogResult<bool>;

    async fn create_variant(&self, item_id: Uuid, input: CreateVariant) -> CatalogResult<Variant>;

    async fn delete_variant(&self, id: Uuid) -> CatalogResult<bool>;

    async fn add_variant_image(&self, variant_id: Uuid, path: String) -> CatalogResult<Variant>;

    async fn filter_image(&self) -> CatalogResult<Option<String>>;

    async fn set_filter_image(&self, path: String) -> CatalogResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    items: Arc<RwLock<HashMap<Uuid, CatalogItem>>>,
    filter_image: Arc<RwLock<Option<String>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_variant_mut(
    items: &mut HashMap<Uuid, CatalogItem>,
    id: Uuid,
) -> Option<(&mut CatalogItem, usize)> {
    items.values_mut().find_map(|item| {
        let index = item.variants.iter().position(|v| v.id == id)?;
        Some((item, index))
    })
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn snapshot(&self) -> CatalogResult<Vec<CatalogItem>> {
        let items = self.items.read().await;
        let mut snapshot: Vec<CatalogItem> = items.values().cloned().collect();
        snapshot.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(snapshot)
    }

    async fn get_item(&self, id: Uuid) -> CatalogResult<Option<CatalogItem>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn create_item(&self, input: CreateDoor) -> CatalogResult<CatalogItem> {
        let item = CatalogItem::new(input);
        self.items.write().await.insert(item.id, item.clone());

        tracing::info!(door_id = %item.id, "Created door");
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, input: UpdateDoor) -> CatalogResult<CatalogItem> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or_else(|| CatalogError::door(id))?;
        item.apply_update(input);

        tracing::info!(door_id = %id, "Updated door");
        Ok(item.clone())
    }

    async fn delete_item(&self, id: Uuid) -> CatalogResult<bool> {
        let removed = self.items.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(door_id = %id, "Deleted door");
        }
        Ok(removed)
    }

    async fn create_variant(&self, item_id: Uuid, input: CreateVariant) -> CatalogResult<Variant> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&item_id)
            .ok_or_else(|| CatalogError::door(item_id))?;

        let variant = Variant::new(item_id, input);
        item.variants.push(variant.clone());
        item.updated_at = Utc::now();

        tracing::info!(door_id = %item_id, article_id = %variant.id, "Created article");
        Ok(variant)
    }

    async fn delete_variant(&self, id: Uuid) -> CatalogResult<bool> {
        let mut items = self.items.write().await;
        let Some((item, index)) = find_variant_mut(&mut items, id) else {
            return Ok(false);
        };

        item.variants.remove(index);
        item.updated_at = Utc::now();

        tracing::info!(article_id = %id, "Deleted article");
        Ok(true)
    }

    async fn add_variant_image(&self, variant_id: Uuid, path: String) -> CatalogResult<Variant> {
        let mut items = self.items.write().await;
        let (item, index) =
            find_variant_mut(&mut items, variant_id).ok_or_else(|| CatalogError::variant(variant_id))?;

        item.variants[index].images.push(path);
        item.updated_at = Utc::now();
        Ok(item.variants[index].clone())
    }

    async fn filter_image(&self) -> CatalogResult<Option<String>> {
        Ok(self.filter_image.read().await.clone())
    }

    async fn set_filter_image(&self, path: String) -> CatalogResult<()> {
        *self.filter_image.write().await = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoorPurpose;

    fn door(title: &str) -> CreateDoor {
        CreateDoor {
            title: title.to_string(),
            image_entry: "doors/entry.png".to_string(),
            image_exit: "doors/exit.png".to_string(),
        }
    }

    fn article(price: i64) -> CreateVariant {
        CreateVariant {
            title: "Article".to_string(),
            width: 800,
            height: 2030,
            target: DoorPurpose::Home,
            opening_direction: true,
            mirror: false,
            additional_features: None,
            is_defect: false,
            price,
        }
    }

    #[tokio::test]
    async fn test_snapshot_orders_by_last_update() {
        let repo = InMemoryCatalogRepository::new();
        let older = repo.create_item(door("older")).await.unwrap();
        let newer = repo.create_item(door("newer")).await.unwrap();

        // Touching the older door moves it to the front.
        repo.create_variant(older.id, article(100)).await.unwrap();

        let snapshot = repo.snapshot().await.unwrap();
        assert_eq!(snapshot[0].id, older.id);
        assert_eq!(snapshot[1].id, newer.id);
    }

    #[tokio::test]
    async fn test_variant_lifecycle() {
        let repo = InMemoryCatalogRepository::new();
        let item = repo.create_item(door("oak")).await.unwrap();
        let variant = repo.create_variant(item.id, article(4200)).await.unwrap();

        let with_image = repo
            .add_variant_image(variant.id, "articles/1.png".to_string())
            .await
            .unwrap();
        assert_eq!(with_image.images, vec!["articles/1.png"]);

        assert!(repo.delete_variant(variant.id).await.unwrap());
        assert!(!repo.delete_variant(variant.id).await.unwrap());
        assert!(repo.get_item(item.id).await.unwrap().unwrap().variants.is_empty());
    }

    #[tokio::test]
    async fn test_create_variant_for_missing_door() {
        let repo = InMemoryCatalogRepository::new();
        let err = repo.create_variant(Uuid::now_v7(), article(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_item_cascades() {
        let repo = InMemoryCatalogRepository::new();
        let item = repo.create_item(door("pine")).await.unwrap();
        let variant = repo.create_variant(item.id, article(1)).await.unwrap();

        assert!(repo.delete_item(item.id).await.unwrap());
        assert!(repo.snapshot().await.unwrap().is_empty());
        assert!(repo.add_variant_image(variant.id, "x.png".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_filter_image_roundtrip() {
        let repo = InMemoryCatalogRepository::new();
        assert_eq!(repo.filter_image().await.unwrap(), None);
        repo.set_filter_image("filter/v2.png".to_string()).await.unwrap();
        assert_eq!(repo.filter_image().await.unwrap().as_deref(), Some("filter/v2.png"));
    }
}
