//! Per-user content: images, texts, videos and user-defined tables.
//!
//! All records are owned by a user and every operation is scoped to the
//! caller taken from the access token. Image bytes go through an
//! [`ImageStorage`]; the database keeps only relative paths.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

pub use error::{ContentError, ContentResult};
pub use handlers::ApiDoc;
pub use models::{
    ContentTable, Image, ImageUpload, ImageView, RowInput, TableInput, TableRow, Text, TextInput,
    Video, VideoInput,
};
pub use postgres::PgContentRepository;
pub use repository::{ContentRepository, InMemoryContentRepository};
pub use service::ContentService;
pub use storage::{ImageStorage, LocalImageStorage};
