use crate::config::Config;
use sea_orm::DatabaseConnection;

/// Shared handles the API routers are built from.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabaseConnection,
}
