use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Content domain errors
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ContentError {
    pub fn image(id: Uuid) -> Self {
        Self::NotFound(format!("Image {id}"))
    }

    pub fn text(id: Uuid) -> Self {
        Self::NotFound(format!("Text {id}"))
    }

    pub fn video(id: Uuid) -> Self {
        Self::NotFound(format!("Video {id}"))
    }

    pub fn table(id: Uuid) -> Self {
        Self::NotFound(format!("Table {id}"))
    }

    pub fn row(id: Uuid) -> Self {
        Self::NotFound(format!("Row {id}"))
    }
}

pub type ContentResult<T> = Result<T, ContentError>;

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            ContentError::Validation(msg) => AppError::BadRequest(msg),
            ContentError::Storage(e) => AppError::Io(e),
            ContentError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
