use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{article_images, articles, doors, filter_info},
    error::{CatalogError, CatalogResult},
    models::{CatalogItem, CreateDoor, CreateVariant, UpdateDoor, Variant},
    repository::CatalogRepository,
};

pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Loads articles with their image paths for the given doors, grouped by
/// door id. Articles and images come back in insertion order.
async fn load_variants<C: ConnectionTrait>(
    conn: &C,
    door_ids: Vec<Uuid>,
) -> CatalogResult<HashMap<Uuid, Vec<Variant>>> {
    if door_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let article_models = articles::Entity::find()
        .filter(articles::Column::DoorId.is_in(door_ids))
        .order_by_asc(articles::Column::CreatedAt)
        .order_by_asc(articles::Column::Id)
        .all(conn)
        .await?;

    let article_ids: Vec<Uuid> = article_models.iter().map(|a| a.id).collect();
    let mut images: HashMap<Uuid, Vec<String>> = HashMap::new();
    if !article_ids.is_empty() {
        let image_models = article_images::Entity::find()
            .filter(article_images::Column::ArticleId.is_in(article_ids))
            .order_by_asc(article_images::Column::CreatedAt)
            .order_by_asc(article_images::Column::Id)
            .all(conn)
            .await?;
        for image in image_models {
            images.entry(image.article_id).or_default().push(image.path);
        }
    }

    let mut grouped: HashMap<Uuid, Vec<Variant>> = HashMap::new();
    for article in article_models {
        let paths = images.remove(&article.id).unwrap_or_default();
        grouped
            .entry(article.door_id)
            .or_default()
            .push(article.into_variant(paths));
    }
    Ok(grouped)
}

async fn load_item<C: ConnectionTrait>(conn: &C, id: Uuid) -> CatalogResult<Option<CatalogItem>> {
    let Some(door) = doors::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    let mut variants = load_variants(conn, vec![id]).await?;
    Ok(Some(door.into_item(variants.remove(&id).unwrap_or_default())))
}

async fn touch_door<C: ConnectionTrait>(conn: &C, id: Uuid) -> CatalogResult<()> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    doors::Entity::update_many()
        .col_expr(doors::Column::UpdatedAt, Expr::value(now))
        .filter(doors::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn snapshot(&self) -> CatalogResult<Vec<CatalogItem>> {
        let door_models = doors::Entity::find()
            .order_by_desc(doors::Column::UpdatedAt)
            .order_by_desc(doors::Column::Id)
            .all(&self.db)
            .await?;

        let ids = door_models.iter().map(|d| d.id).collect();
        let mut variants = load_variants(&self.db, ids).await?;

        Ok(door_models
            .into_iter()
            .map(|door| {
                let door_variants = variants.remove(&door.id).unwrap_or_default();
                door.into_item(door_variants)
            })
            .collect())
    }

    async fn get_item(&self, id: Uuid) -> CatalogResult<Option<CatalogItem>> {
        load_item(&self.db, id).await
    }

    async fn create_item(&self, input: CreateDoor) -> CatalogResult<CatalogItem> {
        let active_model: doors::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(door_id = %model.id, "Created door");
        Ok(model.into_item(Vec::new()))
    }

    async fn update_item(&self, id: Uuid, input: UpdateDoor) -> CatalogResult<CatalogItem> {
        let txn = self.db.begin().await?;

        let model = doors::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| CatalogError::door(id))?;

        let mut active: doors::ActiveModel = model.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(image_entry) = input.image_entry {
            active.image_entry = Set(image_entry);
        }
        if let Some(image_exit) = input.image_exit {
            active.image_exit = Set(image_exit);
        }
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        let item = load_item(&txn, id).await?.ok_or_else(|| CatalogError::door(id))?;
        txn.commit().await?;

        tracing::info!(door_id = %id, "Updated door");
        Ok(item)
    }

    async fn delete_item(&self, id: Uuid) -> CatalogResult<bool> {
        // Articles and their images go with the door (ON DELETE CASCADE).
        let result = doors::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(door_id = %id, "Deleted door");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn create_variant(&self, item_id: Uuid, input: CreateVariant) -> CatalogResult<Variant> {
        let txn = self.db.begin().await?;

        if doors::Entity::find_by_id(item_id).one(&txn).await?.is_none() {
            return Err(CatalogError::door(item_id));
        }

        let variant = Variant::new(item_id, input);
        articles::ActiveModel::from(&variant).insert(&txn).await?;
        touch_door(&txn, item_id).await?;
        txn.commit().await?;

        tracing::info!(door_id = %item_id, article_id = %variant.id, "Created article");
        Ok(variant)
    }

    async fn delete_variant(&self, id: Uuid) -> CatalogResult<bool> {
        let txn = self.db.begin().await?;

        let Some(article) = articles::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };
        articles::Entity::delete_by_id(id).exec(&txn).await?;
        touch_door(&txn, article.door_id).await?;
        txn.commit().await?;

        tracing::info!(article_id = %id, "Deleted article");
        Ok(true)
    }

    async fn add_variant_image(&self, variant_id: Uuid, path: String) -> CatalogResult<Variant> {
        let txn = self.db.begin().await?;

        let article = articles::Entity::find_by_id(variant_id)
            .one(&txn)
            .await?
            .ok_or_else(|| CatalogError::variant(variant_id))?;

        article_images::new_image(variant_id, path).insert(&txn).await?;
        touch_door(&txn, article.door_id).await?;

        let images = article_images::Entity::find()
            .filter(article_images::Column::ArticleId.eq(variant_id))
            .order_by_asc(article_images::Column::CreatedAt)
            .order_by_asc(article_images::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .map(|image| image.path)
            .collect();
        txn.commit().await?;

        tracing::info!(article_id = %variant_id, "Added article image");
        Ok(article.into_variant(images))
    }

    async fn filter_image(&self) -> CatalogResult<Option<String>> {
        let model = filter_info::Entity::find_by_id(filter_info::SINGLETON_ID)
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.image))
    }

    async fn set_filter_image(&self, path: String) -> CatalogResult<()> {
        let row = filter_info::ActiveModel {
            id: Set(filter_info::SINGLETON_ID),
            image: Set(path),
            updated_at: Set(Utc::now().into()),
        };

        filter_info::Entity::insert(row)
            .on_conflict(
                OnConflict::column(filter_info::Column::Id)
                    .update_columns([filter_info::Column::Image, filter_info::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        tracing::info!("Updated filter image");
        Ok(())
    }
}
