use axum::Router;
use axum_helpers::{AuthState, JwtAuth};
use domain_catalog::{CatalogService, PgCatalogRepository};
use domain_content::{ContentService, LocalImageStorage, PgContentRepository};
use domain_notifications::FeedbackService;
use domain_users::{AuthService, PgUserRepository};
use email::{EmailProvider, SmtpProvider, TemplateEngine};
use std::sync::Arc;

use crate::state::AppState;

pub mod health;

/// Builds the domain routers without the `/api` prefix, which
/// `create_router` adds.
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    let provider: Arc<dyn EmailProvider> = Arc::new(SmtpProvider::new(state.config.smtp.clone())?);
    Ok(routes_with(state, provider, TemplateEngine::new()?))
}

fn routes_with(
    state: &AppState,
    provider: Arc<dyn EmailProvider>,
    templates: TemplateEngine,
) -> Router {
    let config = &state.config;

    let jwt = JwtAuth::new(&config.jwt);
    let auth_service = AuthService::new(PgUserRepository::new(state.db.clone()), jwt.clone());
    // Access tokens of logged-out sessions are rejected on every protected route.
    let auth = AuthState::new(jwt, Some(auth_service.session_store()));

    let catalog_service = CatalogService::new(
        PgCatalogRepository::new(state.db.clone()),
        config.assets.clone(),
    );
    let content_service = ContentService::new(
        PgContentRepository::new(state.db.clone()),
        Arc::new(LocalImageStorage::new(config.assets.uploads_dir.clone())),
        config.assets.clone(),
    );
    let feedback_service = FeedbackService::new(provider, templates, config.feedback.clone());

    Router::new()
        .nest("/catalog", domain_catalog::handlers::router(catalog_service, auth.clone()))
        .nest("/content", domain_content::handlers::router(content_service, auth.clone()))
        .nest("/auth", domain_users::handlers::router(auth_service, auth))
        .nest("/feedback", domain_notifications::handlers::router(feedback_service))
}

/// `/ready` with real dependency checks, merged next to the stateless app.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
