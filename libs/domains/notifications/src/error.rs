use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Failed to deliver email to {to}: {reason}")]
    Delivery { to: String, reason: String },

    #[error("Template error: {0}")]
    Template(String),
}

pub type FeedbackResult<T> = Result<T, FeedbackError>;

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::Delivery { to, reason } => {
                AppError::BadRequest(format!("Failed to deliver email to {to}: {reason}"))
            }
            FeedbackError::Template(msg) => {
                tracing::error!("Feedback template error: {}", msg);
                AppError::InternalServerError("Failed to prepare email".to_string())
            }
        }
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
