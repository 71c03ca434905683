//! Door catalog domain.
//!
//! Doors (catalog items) carry articles (variants); the storefront reads
//! them through the query engine in [`query`], admins edit them through the
//! service.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{
    AdditionalFeature, CatalogItem, CatalogPage, CreateDoor, CreateVariant, DoorPurpose,
    FilterCriteria, FilterInfo, ImagePath, PageParams, SizeBucket, UpdateDoor, Variant,
};
pub use postgres::PgCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::CatalogService;
