use std::sync::Arc;

use core_config::assets::AssetConfig;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CatalogItem, CatalogPage, CreateDoor, CreateVariant, FilterCriteria, FilterInfo, UpdateDoor,
    Variant,
};
use crate::query;
use crate::repository::CatalogRepository;

/// Catalog business logic: querying for the storefront and admin edits.
///
/// Every item or variant leaving the service has its image paths resolved
/// to public URLs.
#[derive(Clone)]
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
    assets: AssetConfig,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R, assets: AssetConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            assets,
        }
    }

    /// Filters, sorts and paginates the current catalog.
    #[instrument(skip(self))]
    pub async fn query_doors(&self, criteria: FilterCriteria) -> CatalogResult<CatalogPage> {
        let snapshot = self.repository.snapshot().await?;
        let page = query::query(&snapshot, &criteria)?;

        tracing::debug!(total = snapshot.len(), returned = page.count, "Catalog query");
        Ok(CatalogPage {
            items: page.items.iter().map(|item| self.resolve_item(item)).collect(),
            count: page.count,
        })
    }

    /// Cheapest doors first, over every size.
    #[instrument(skip(self))]
    pub async fn doors_by_min_price(&self, offset: i64, limit: i64) -> CatalogResult<CatalogPage> {
        let criteria = FilterCriteria {
            all_sizes: true,
            filter_by_min_price: true,
            offset,
            limit,
            ..FilterCriteria::default()
        };
        self.query_doors(criteria).await
    }

    #[instrument(skip(self))]
    pub async fn get_door(&self, id: Uuid) -> CatalogResult<CatalogItem> {
        let item = self
            .repository
            .get_item(id)
            .await?
            .ok_or_else(|| CatalogError::door(id))?;
        Ok(self.resolve_item(&item))
    }

    #[instrument(skip(self))]
    pub async fn create_door(&self, input: CreateDoor) -> CatalogResult<CatalogItem> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let item = self.repository.create_item(input).await?;
        Ok(self.resolve_item(&item))
    }

    #[instrument(skip(self))]
    pub async fn update_door(&self, id: Uuid, input: UpdateDoor) -> CatalogResult<CatalogItem> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let item = self.repository.update_item(id, input).await?;
        Ok(self.resolve_item(&item))
    }

    #[instrument(skip(self))]
    pub async fn delete_door(&self, id: Uuid) -> CatalogResult<()> {
        if self.repository.delete_item(id).await? {
            Ok(())
        } else {
            Err(CatalogError::door(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn add_variant(&self, item_id: Uuid, input: CreateVariant) -> CatalogResult<Variant> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let variant = self.repository.create_variant(item_id, input).await?;
        Ok(self.resolve_variant(&variant))
    }

    #[instrument(skip(self))]
    pub async fn delete_variant(&self, id: Uuid) -> CatalogResult<()> {
        if self.repository.delete_variant(id).await? {
            Ok(())
        } else {
            Err(CatalogError::variant(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn add_variant_image(&self, variant_id: Uuid, path: String) -> CatalogResult<Variant> {
        if path.trim().is_empty() {
            return Err(CatalogError::Validation("image path must not be empty".to_string()));
        }

        let variant = self.repository.add_variant_image(variant_id, path).await?;
        Ok(self.resolve_variant(&variant))
    }

    /// URL of the illustration shown next to the filter panel.
    #[instrument(skip(self))]
    pub async fn filter_info(&self) -> CatalogResult<FilterInfo> {
        let path = self
            .repository
            .filter_image()
            .await?
            .unwrap_or_else(|| self.assets.default_filter_image.clone());

        Ok(FilterInfo {
            url: self.assets.resolve(&path),
        })
    }

    #[instrument(skip(self))]
    pub async fn set_filter_image(&self, path: String) -> CatalogResult<FilterInfo> {
        if path.trim().is_empty() {
            return Err(CatalogError::Validation("image path must not be empty".to_string()));
        }

        let url = self.assets.resolve(&path);
        self.repository.set_filter_image(path).await?;
        Ok(FilterInfo { url })
    }

    fn resolve_item(&self, item: &CatalogItem) -> CatalogItem {
        CatalogItem {
            image_entry: self.assets.resolve(&item.image_entry),
            image_exit: self.assets.resolve(&item.image_exit),
            variants: item.variants.iter().map(|v| self.resolve_variant(v)).collect(),
            ..item.clone()
        }
    }

    fn resolve_variant(&self, variant: &Variant) -> Variant {
        Variant {
            images: variant
                .images
                .iter()
                .map(|path| self.assets.resolve(path))
                .collect(),
            ..variant.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoorPurpose;
    use crate::repository::MockCatalogRepository;
    use chrono::Utc;

    fn assets() -> AssetConfig {
        AssetConfig::new("http://api.test/static", "./public")
    }

    fn item_with_price(title: &str, price: i64) -> CatalogItem {
        let id = Uuid::now_v7();
        CatalogItem {
            id,
            title: title.to_string(),
            image_entry: "doors/entry.png".to_string(),
            image_exit: "doors/exit.png".to_string(),
            variants: vec![Variant {
                id: Uuid::now_v7(),
                item_id: id,
                title: format!("{title} article"),
                width: 800,
                height: 2030,
                target: DoorPurpose::Home,
                opening_direction: false,
                mirror: false,
                additional_features: None,
                is_defect: false,
                price,
                images: vec!["articles/1.png".to_string()],
            }],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_query_resolves_urls_without_touching_snapshot() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_snapshot()
            .returning(|| Ok(vec![item_with_price("oak", 100)]));

        let service = CatalogService::new(mock_repo, assets());
        let page = service.query_doors(FilterCriteria::default()).await.unwrap();

        assert_eq!(page.count, 1);
        let item = &page.items[0];
        assert_eq!(item.image_entry, "http://api.test/static/doors/entry.png");
        assert_eq!(
            item.variants[0].images,
            vec!["http://api.test/static/articles/1.png"]
        );
    }

    #[tokio::test]
    async fn test_doors_by_min_price_orders_cheapest_first() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_snapshot().returning(|| {
            Ok(vec![
                item_with_price("a", 500),
                item_with_price("b", 200),
                item_with_price("c", 800),
            ])
        });

        let service = CatalogService::new(mock_repo, assets());
        let page = service.doors_by_min_price(0, 2).await.unwrap();

        let titles: Vec<&str> = page.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_negative_offset_is_invalid_argument() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_snapshot().returning(|| Ok(Vec::new()));

        let service = CatalogService::new(mock_repo, assets());
        let err = service.doors_by_min_price(-1, 10).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_get_missing_door_is_not_found() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_get_item().returning(|_| Ok(None));

        let service = CatalogService::new(mock_repo, assets());
        let err = service.get_door(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_door_rejects_empty_title() {
        let mock_repo = MockCatalogRepository::new();
        let service = CatalogService::new(mock_repo, assets());

        let err = service
            .create_door(CreateDoor {
                title: String::new(),
                image_entry: "a.png".to_string(),
                image_exit: "b.png".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_filter_info_falls_back_to_default_image() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_filter_image().returning(|| Ok(None));

        let service = CatalogService::new(mock_repo, assets());
        let info = service.filter_info().await.unwrap();
        assert_eq!(info.url, "http://api.test/static/filter.png");
    }

    #[tokio::test]
    async fn test_delete_missing_variant_is_not_found() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo
            .expect_delete_variant()
            .with(mockall::predicate::always())
            .returning(|_| Ok(false));

        let service = CatalogService::new(mock_repo, assets());
        assert!(matches!(
            service.delete_variant(Uuid::now_v7()).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
