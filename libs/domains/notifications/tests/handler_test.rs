//! Handler tests for the feedback routes, mail captured by `MockSmtpProvider`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use domain_notifications::*;
use email::{MockSmtpProvider, TemplateEngine};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(provider: MockSmtpProvider) -> Router {
    let service = FeedbackService::new(
        Arc::new(provider),
        TemplateEngine::new().unwrap(),
        FeedbackConfig::new(["admin@shop.test"]),
    );
    handlers::router(service)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_common_form_is_mailed() {
    let provider = MockSmtpProvider::new();
    let app = app(provider.clone());

    let response = app
        .oneshot(post(
            "/common",
            json!({"name": "Ann", "email": "ann@example.com", "phone": "+79000000000"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.into_body()).await, json!({"success": true}));

    assert!(provider.was_sent_to("admin@shop.test").await);
    assert!(provider.was_sent_to("ann@example.com").await);
}

#[tokio::test]
async fn test_order_form_validation() {
    let provider = MockSmtpProvider::new();
    let app = app(provider.clone());

    let response = app
        .oneshot(post(
            "/order",
            json!({
                "name": "Ann",
                "email": "not-an-email",
                "phone": "+79000000000",
                "door_title": "",
                "article_title": "F-800"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["door_title"].is_array());
    assert_eq!(provider.sent_count().await, 0);
}

#[tokio::test]
async fn test_delivery_failure_is_bad_request() {
    let app = app(MockSmtpProvider::failing("mailbox unavailable"));

    let response = app
        .oneshot(post(
            "/order",
            json!({
                "name": "Ann",
                "email": "ann@example.com",
                "phone": "+79000000000",
                "door_title": "Forpost",
                "article_title": "F-800"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("admin@shop.test"));
}
