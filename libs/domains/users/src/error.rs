use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, TokenError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Role '{0}' does not exist")]
    MissingRole(String),

    #[error("User is not signed in")]
    SessionNotFound,

    #[error("Refresh token is invalid, sign in again")]
    InvalidRefreshToken,

    #[error("Refresh token is not registered")]
    RefreshTokenNotFound,

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail(_) | AuthError::Validation(_) => {
                AppError::BadRequest(err.to_string())
            }
            AuthError::InvalidCredentials | AuthError::SessionNotFound => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::InvalidRefreshToken => AppError::Forbidden(err.to_string()),
            AuthError::RefreshTokenNotFound | AuthError::UserNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            AuthError::Database(e) => AppError::Database(e),
            AuthError::MissingRole(_) | AuthError::PasswordHash(_) | AuthError::Token(_) => {
                tracing::error!(error = %err, "Auth failure");
                AppError::InternalServerError("An internal error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
