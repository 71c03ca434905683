use axum_helpers::server::{create_production_app, health_router};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use tower_http::services::ServeDir;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        "Starting {} v{} ({:?})",
        config.app.name, config.app.version, config.environment
    );

    let retry = RetryConfig::from_env()?;
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), Some(retry))
        .await
        .map_err(|e| eyre::eyre!("Failed to connect to database: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Failed to run migrations: {}", e))?;

    tokio::fs::create_dir_all(&config.assets.uploads_dir).await?;
    info!("Serving uploads from {}", config.assets.uploads_dir.display());

    let state = AppState { config, db };

    let api_routes = api::routes(&state)?;
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)
        .await?
        .nest_service("/static", ServeDir::new(&state.config.assets.uploads_dir))
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    let server_config = state.config.server.clone();
    let db = state.db.clone();

    create_production_app(router, &server_config, async move {
        info!("Closing database connections...");
        if let Err(e) = db.close().await {
            tracing::error!("Error closing database: {}", e);
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Server shutdown complete");
    Ok(())
}
