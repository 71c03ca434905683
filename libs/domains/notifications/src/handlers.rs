use axum::{extract::State, routing::post, Json, Router};
use axum_helpers::{
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
    ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::FeedbackResult;
use crate::models::{CommonFeedback, FeedbackResponse, OrderFeedback};
use crate::service::FeedbackService;

pub const TAG: &str = "Feedback";

#[derive(OpenApi)]
#[openapi(
    paths(send_common, send_order),
    components(
        schemas(CommonFeedback, OrderFeedback, FeedbackResponse),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Contact and order forms delivered by email")
    )
)]
pub struct ApiDoc;

pub fn router(service: FeedbackService) -> Router {
    Router::new()
        .route("/common", post(send_common))
        .route("/order", post(send_order))
        .with_state(Arc::new(service))
}

/// Submit the contact form
#[utoipa::path(
    post,
    path = "/common",
    tag = TAG,
    request_body = CommonFeedback,
    responses(
        (status = 200, description = "Mail sent", body = FeedbackResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn send_common(
    State(service): State<Arc<FeedbackService>>,
    ValidatedJson(form): ValidatedJson<CommonFeedback>,
) -> FeedbackResult<Json<FeedbackResponse>> {
    Ok(Json(service.send_common(form).await?))
}

/// Submit an order request for a door
#[utoipa::path(
    post,
    path = "/order",
    tag = TAG,
    request_body = OrderFeedback,
    responses(
        (status = 200, description = "Mail sent", body = FeedbackResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn send_order(
    State(service): State<Arc<FeedbackService>>,
    ValidatedJson(form): ValidatedJson<OrderFeedback>,
) -> FeedbackResult<Json<FeedbackResponse>> {
    Ok(Json(service.send_order(form).await?))
}
