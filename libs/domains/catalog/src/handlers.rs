use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestArgumentResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, AdminUser, AuthState, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    AdditionalFeature, CatalogItem, CatalogPage, CreateDoor, CreateVariant, DoorPurpose,
    FilterCriteria, FilterInfo, ImagePath, PageParams, UpdateDoor, Variant,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

pub const TAG: &str = "Catalog";

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        query_doors,
        doors_by_min_price,
        get_door,
        filter_info,
        create_door,
        update_door,
        delete_door,
        add_variant,
        delete_variant,
        add_variant_image,
        set_filter_image,
    ),
    components(
        schemas(
            CatalogItem,
            Variant,
            CatalogPage,
            FilterCriteria,
            FilterInfo,
            CreateDoor,
            UpdateDoor,
            CreateVariant,
            ImagePath,
            DoorPurpose,
            AdditionalFeature
        ),
        responses(
            NotFoundResponse,
            BadRequestArgumentResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Door catalog: storefront queries and admin editing")
    )
)]
pub struct ApiDoc;

/// Catalog routes. Editing routes sit behind the JWT middleware and further
/// require the `admin` role.
pub fn router<R: CatalogRepository + 'static>(service: CatalogService<R>, auth: AuthState) -> Router {
    let shared_service = Arc::new(service);
    let authenticated = middleware::from_fn_with_state(auth, jwt_auth_middleware);

    Router::new()
        .route("/doors/query", post(query_doors))
        .route("/doors/min-price", get(doors_by_min_price))
        .route(
            "/doors",
            post(create_door).route_layer(authenticated.clone()),
        )
        .route(
            "/doors/{id}",
            get(get_door).merge(
                axum::routing::put(update_door)
                    .delete(delete_door)
                    .route_layer(authenticated.clone()),
            ),
        )
        .route(
            "/doors/{id}/variants",
            post(add_variant).route_layer(authenticated.clone()),
        )
        .route(
            "/variants/{id}",
            delete(delete_variant).route_layer(authenticated.clone()),
        )
        .route(
            "/variants/{id}/images",
            post(add_variant_image).route_layer(authenticated.clone()),
        )
        .route(
            "/filter-info",
            get(filter_info).merge(axum::routing::put(set_filter_image).route_layer(authenticated)),
        )
        .with_state(shared_service)
}

/// Filter, sort and paginate the catalog
#[utoipa::path(
    post,
    path = "/doors/query",
    tag = TAG,
    request_body = FilterCriteria,
    responses(
        (status = 200, description = "One page of matching doors", body = CatalogPage),
        (status = 400, response = BadRequestArgumentResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn query_doors<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Json(criteria): Json<FilterCriteria>,
) -> CatalogResult<Json<CatalogPage>> {
    let page = service.query_doors(criteria).await?;
    Ok(Json(page))
}

/// Doors ordered by their cheapest article
#[utoipa::path(
    get,
    path = "/doors/min-price",
    tag = TAG,
    params(PageParams),
    responses(
        (status = 200, description = "One page of doors, cheapest first", body = CatalogPage),
        (status = 400, response = BadRequestArgumentResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn doors_by_min_price<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(params): Query<PageParams>,
) -> CatalogResult<Json<CatalogPage>> {
    let page = service.doors_by_min_price(params.offset, params.limit).await?;
    Ok(Json(page))
}

/// Get a door with all its articles
#[utoipa::path(
    get,
    path = "/doors/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Door ID")
    ),
    responses(
        (status = 200, description = "Door found", body = CatalogItem),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_door<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<CatalogItem>> {
    let item = service.get_door(id).await?;
    Ok(Json(item))
}

/// Illustration shown next to the filter panel
#[utoipa::path(
    get,
    path = "/filter-info",
    tag = TAG,
    responses(
        (status = 200, description = "Filter illustration URL", body = FilterInfo),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_info<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<FilterInfo>> {
    let info = service.filter_info().await?;
    Ok(Json(info))
}

/// Create a door
#[utoipa::path(
    post,
    path = "/doors",
    tag = TAG,
    request_body = CreateDoor,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Door created", body = CatalogItem),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_door<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateDoor>,
) -> CatalogResult<impl IntoResponse> {
    let item = service.create_door(input).await?;
    tracing::info!(admin_id = %admin.sub, door_id = %item.id, "Door created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a door's title or images
#[utoipa::path(
    put,
    path = "/doors/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Door ID")
    ),
    request_body = UpdateDoor,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Door updated", body = CatalogItem),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_door<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateDoor>,
) -> CatalogResult<Json<CatalogItem>> {
    let item = service.update_door(id, input).await?;
    Ok(Json(item))
}

/// Delete a door with its articles
#[utoipa::path(
    delete,
    path = "/doors/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Door ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Door deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_door<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    AdminUser(admin): AdminUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<StatusCode> {
    service.delete_door(id).await?;
    tracing::info!(admin_id = %admin.sub, door_id = %id, "Door deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Add an article to a door
#[utoipa::path(
    post,
    path = "/doors/{id}/variants",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Door ID")
    ),
    request_body = CreateVariant,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Article created", body = Variant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_variant<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateVariant>,
) -> CatalogResult<impl IntoResponse> {
    let variant = service.add_variant(id, input).await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// Delete an article
#[utoipa::path(
    delete,
    path = "/variants/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_variant<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<StatusCode> {
    service.delete_variant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach an uploaded image to an article
#[utoipa::path(
    post,
    path = "/variants/{id}/images",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    request_body = ImagePath,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Article with the new image", body = Variant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_variant_image<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<ImagePath>,
) -> CatalogResult<Json<Variant>> {
    let variant = service.add_variant_image(id, input.path).await?;
    Ok(Json(variant))
}

/// Replace the filter illustration
#[utoipa::path(
    put,
    path = "/filter-info",
    tag = TAG,
    request_body = ImagePath,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New filter illustration URL", body = FilterInfo),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn set_filter_image<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<ImagePath>,
) -> CatalogResult<Json<FilterInfo>> {
    let info = service.set_filter_image(input.path).await?;
    Ok(Json(info))
}
