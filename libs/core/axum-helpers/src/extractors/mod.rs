//! Custom extractors for Axum handlers.

pub mod auth_user;
pub mod uuid_path;
pub mod validated_json;

pub use auth_user::{AdminUser, AuthUser};
pub use uuid_path::{UuidPath, UuidPathPair};
pub use validated_json::ValidatedJson;
