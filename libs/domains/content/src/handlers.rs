use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, AuthState, AuthUser, UuidPath, UuidPathPair, ValidatedJson,
};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::{ContentError, ContentResult};
use crate::models::{
    ContentTable, ImageUpload, ImageView, RowInput, TableInput, TableRow, Text, TextInput, Video,
    VideoInput,
};
use crate::repository::ContentRepository;
use crate::service::ContentService;

pub const TAG: &str = "Content";

/// Name of the multipart field carrying the image file
pub const IMAGE_FIELD: &str = "image";

/// Multipart body for image uploads
#[derive(ToSchema)]
#[allow(dead_code)]
struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_images, add_image, get_image, edit_image, delete_image,
        list_texts, add_text, get_text, edit_text, delete_text,
        list_videos, add_video, get_video, edit_video, delete_video,
        list_tables, add_table, get_table, edit_table, delete_table,
        list_rows, add_row, get_row, edit_row, delete_row,
    ),
    components(
        schemas(
            ImageView,
            ImageForm,
            Text,
            TextInput,
            Video,
            VideoInput,
            ContentTable,
            TableInput,
            TableRow,
            RowInput
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Images, texts, videos and tables owned by the signed-in user")
    )
)]
pub struct ApiDoc;

/// Content routes; every route requires a valid access token.
pub fn router<R: ContentRepository + 'static>(service: ContentService<R>, auth: AuthState) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/images", get(list_images).post(add_image))
        .route(
            "/images/{id}",
            get(get_image).put(edit_image).delete(delete_image),
        )
        .route("/texts", get(list_texts).post(add_text))
        .route("/texts/{id}", get(get_text).put(edit_text).delete(delete_text))
        .route("/videos", get(list_videos).post(add_video))
        .route(
            "/videos/{id}",
            get(get_video).put(edit_video).delete(delete_video),
        )
        .route("/tables", get(list_tables).post(add_table))
        .route(
            "/tables/{id}",
            get(get_table).put(edit_table).delete(delete_table),
        )
        .route("/tables/{id}/rows", get(list_rows).post(add_row))
        .route(
            "/tables/{id}/rows/{row_id}",
            get(get_row).put(edit_row).delete(delete_row),
        )
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service)
}

/// Pulls the `image` field out of a multipart body.
async fn read_image(mut multipart: Multipart) -> ContentResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ContentError::Validation(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ContentError::Validation(e.body_text()))?;
        return Ok(ImageUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ContentError::Validation(format!(
        "Multipart field '{IMAGE_FIELD}' is required"
    )))
}

// ===== Images =====

/// List the caller's images, newest first
#[utoipa::path(
    get,
    path = "/images",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Images", body = Vec<ImageView>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_images<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
) -> ContentResult<Json<Vec<ImageView>>> {
    let images = service.list_images(claims.sub).await?;
    Ok(Json(images))
}

/// Upload an image
#[utoipa::path(
    post,
    path = "/images",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = ImageView),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_image<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    multipart: Multipart,
) -> ContentResult<impl IntoResponse> {
    let upload = read_image(multipart).await?;
    let image = service.add_image(claims.sub, upload).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/images/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image", body = ImageView),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_image<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<Json<ImageView>> {
    let image = service.get_image(claims.sub, id).await?;
    Ok(Json(image))
}

/// Replace an image file
#[utoipa::path(
    put,
    path = "/images/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Image ID")),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = ImageView),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_image<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> ContentResult<Json<ImageView>> {
    let upload = read_image(multipart).await?;
    let image = service.edit_image(claims.sub, id, upload).await?;
    Ok(Json(image))
}

#[utoipa::path(
    delete,
    path = "/images/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_image<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<StatusCode> {
    service.delete_image(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Texts =====

#[utoipa::path(
    get,
    path = "/texts",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Texts", body = Vec<Text>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_texts<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
) -> ContentResult<Json<Vec<Text>>> {
    Ok(Json(service.list_texts(claims.sub).await?))
}

#[utoipa::path(
    post,
    path = "/texts",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = TextInput,
    responses(
        (status = 201, description = "Text created", body = Text),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn add_text<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<TextInput>,
) -> ContentResult<impl IntoResponse> {
    let text = service.add_text(claims.sub, input).await?;
    Ok((StatusCode::CREATED, Json(text)))
}

#[utoipa::path(
    get,
    path = "/texts/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Text ID")),
    responses(
        (status = 200, description = "Text", body = Text),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_text<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<Json<Text>> {
    Ok(Json(service.get_text(claims.sub, id).await?))
}

#[utoipa::path(
    put,
    path = "/texts/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Text ID")),
    request_body = TextInput,
    responses(
        (status = 200, description = "Text updated", body = Text),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_text<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<TextInput>,
) -> ContentResult<Json<Text>> {
    Ok(Json(service.edit_text(claims.sub, id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/texts/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Text ID")),
    responses(
        (status = 204, description = "Text deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_text<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<StatusCode> {
    service.delete_text(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Videos =====

#[utoipa::path(
    get,
    path = "/videos",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Videos", body = Vec<Video>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_videos<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
) -> ContentResult<Json<Vec<Video>>> {
    Ok(Json(service.list_videos(claims.sub).await?))
}

#[utoipa::path(
    post,
    path = "/videos",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = VideoInput,
    responses(
        (status = 201, description = "Video created", body = Video),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn add_video<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<VideoInput>,
) -> ContentResult<impl IntoResponse> {
    let video = service.add_video(claims.sub, input).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/videos/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video", body = Video),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_video<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<Json<Video>> {
    Ok(Json(service.get_video(claims.sub, id).await?))
}

#[utoipa::path(
    put,
    path = "/videos/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body = VideoInput,
    responses(
        (status = 200, description = "Video updated", body = Video),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_video<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<VideoInput>,
) -> ContentResult<Json<Video>> {
    Ok(Json(service.edit_video(claims.sub, id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/videos/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_video<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<StatusCode> {
    service.delete_video(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Tables =====

#[utoipa::path(
    get,
    path = "/tables",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tables", body = Vec<ContentTable>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_tables<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
) -> ContentResult<Json<Vec<ContentTable>>> {
    Ok(Json(service.list_tables(claims.sub).await?))
}

#[utoipa::path(
    post,
    path = "/tables",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = TableInput,
    responses(
        (status = 201, description = "Table created", body = ContentTable),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn add_table<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<TableInput>,
) -> ContentResult<impl IntoResponse> {
    let table = service.add_table(claims.sub, input).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

#[utoipa::path(
    get,
    path = "/tables/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table", body = ContentTable),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_table<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<Json<ContentTable>> {
    Ok(Json(service.get_table(claims.sub, id).await?))
}

#[utoipa::path(
    put,
    path = "/tables/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Table ID")),
    request_body = TableInput,
    responses(
        (status = 200, description = "Table updated", body = ContentTable),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_table<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<TableInput>,
) -> ContentResult<Json<ContentTable>> {
    Ok(Json(service.edit_table(claims.sub, id, input).await?))
}

/// Delete a table and all of its rows
#[utoipa::path(
    delete,
    path = "/tables/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 204, description = "Table deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_table<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> ContentResult<StatusCode> {
    service.delete_table(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Table rows =====

#[utoipa::path(
    get,
    path = "/tables/{id}/rows",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Rows of the table", body = Vec<TableRow>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn list_rows<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(table_id): UuidPath,
) -> ContentResult<Json<Vec<TableRow>>> {
    Ok(Json(service.list_rows(claims.sub, table_id).await?))
}

#[utoipa::path(
    post,
    path = "/tables/{id}/rows",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Table ID")),
    request_body = RowInput,
    responses(
        (status = 201, description = "Row created", body = TableRow),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_row<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(table_id): UuidPath,
    ValidatedJson(input): ValidatedJson<RowInput>,
) -> ContentResult<impl IntoResponse> {
    let row = service.add_row(claims.sub, table_id, input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    get,
    path = "/tables/{id}/rows/{row_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    responses(
        (status = 200, description = "Row", body = TableRow),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_row<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPathPair(table_id, row_id): UuidPathPair,
) -> ContentResult<Json<TableRow>> {
    Ok(Json(service.get_row(claims.sub, table_id, row_id).await?))
}

#[utoipa::path(
    put,
    path = "/tables/{id}/rows/{row_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    request_body = RowInput,
    responses(
        (status = 200, description = "Row updated", body = TableRow),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_row<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPathPair(table_id, row_id): UuidPathPair,
    ValidatedJson(input): ValidatedJson<RowInput>,
) -> ContentResult<Json<TableRow>> {
    Ok(Json(
        service.edit_row(claims.sub, table_id, row_id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/tables/{id}/rows/{row_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Table ID"),
        ("row_id" = Uuid, Path, description = "Row ID")
    ),
    responses(
        (status = 204, description = "Row deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_row<R: ContentRepository>(
    State(service): State<Arc<ContentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPathPair(table_id, row_id): UuidPathPair,
) -> ContentResult<StatusCode> {
    service.delete_row(claims.sub, table_id, row_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
