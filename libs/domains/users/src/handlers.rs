use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_helpers::{
    auth::AccessToken,
    errors::responses::{
        BadRequestValidationResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, AuthState, AuthUser, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AuthResult;
use crate::models::{
    LogoutRequest, RefreshRequest, SignInRequest, SignUpRequest, SuccessResponse, TokenPair,
};
use crate::repository::UserRepository;
use crate::service::AuthService;

pub const TAG: &str = "Auth";

#[derive(OpenApi)]
#[openapi(
    paths(sign_up, sign_in, logout, refresh),
    components(
        schemas(SignUpRequest, SignInRequest, LogoutRequest, RefreshRequest, SuccessResponse, TokenPair),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Registration and JWT sessions")
    )
)]
pub struct ApiDoc;

/// Auth routes; only `/logout` needs a valid access token.
pub fn router<R: UserRepository + 'static>(service: AuthService<R>, auth: AuthState) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/refresh", post(refresh))
        .route(
            "/logout",
            post(logout).route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware)),
        )
        .with_state(shared_service)
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/sign-up",
    tag = TAG,
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created, tokens issued", body = TokenPair),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_up<R: UserRepository + 'static>(
    State(service): State<Arc<AuthService<R>>>,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> AuthResult<impl IntoResponse> {
    let tokens = service.sign_up(input).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/sign-in",
    tag = TAG,
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenPair),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_in<R: UserRepository + 'static>(
    State(service): State<Arc<AuthService<R>>>,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> AuthResult<Json<TokenPair>> {
    let tokens = service.sign_in(input).await?;
    Ok(Json(tokens))
}

/// Revoke the current token pair
#[utoipa::path(
    post,
    path = "/logout",
    tag = TAG,
    request_body = LogoutRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signed out", body = SuccessResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn logout<R: UserRepository + 'static>(
    State(service): State<Arc<AuthService<R>>>,
    AuthUser(claims): AuthUser,
    Extension(AccessToken(access_token)): Extension<AccessToken>,
    ValidatedJson(input): ValidatedJson<LogoutRequest>,
) -> AuthResult<Json<SuccessResponse>> {
    let response = service
        .logout(claims.sub, &access_token, &input.refresh_token)
        .await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new pair
#[utoipa::path(
    post,
    path = "/refresh",
    tag = TAG,
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn refresh<R: UserRepository + 'static>(
    State(service): State<Arc<AuthService<R>>>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> AuthResult<Json<TokenPair>> {
    let tokens = service.refresh(&input.refresh_token).await?;
    Ok(Json(tokens))
}
