//! Handler tests for the content domain
//!
//! Images go to a scratch directory through `LocalImageStorage`; everything
//! else runs against the in-memory repository.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use core_config::assets::AssetConfig;
use domain_content::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use test_utils::TestAuth;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const BOUNDARY: &str = "doorshop-test-boundary";

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct Fixture {
    app: Router,
    auth: TestAuth,
    uploads: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let uploads = std::env::temp_dir().join(format!("doorshop-content-{}", Uuid::new_v4()));
        let auth = TestAuth::new();
        let service = ContentService::new(
            InMemoryContentRepository::new(),
            Arc::new(LocalImageStorage::new(&uploads)),
            AssetConfig::new("http://api.test/static", &uploads),
        );
        Self {
            app: handlers::router(service, auth.state()),
            auth,
            uploads,
        }
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, TestAuth::bearer(token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, TestAuth::bearer(token))
        .body(Body::empty())
        .unwrap()
}

fn multipart_request(method: &str, uri: &str, token: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, TestAuth::bearer(token))
        .body(Body::from(body))
        .unwrap()
}

fn stored_file(fixture: &Fixture, url: &str) -> PathBuf {
    let name = url.rsplit('/').next().unwrap();
    fixture.uploads.join(name)
}

#[tokio::test]
async fn test_requires_token() {
    let fixture = Fixture::new();

    let request = Request::builder().uri("/texts").body(Body::empty()).unwrap();
    let response = fixture.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_text_lifecycle() {
    let fixture = Fixture::new();
    let token = fixture.auth.user_token(Uuid::now_v7());

    let response = fixture
        .send(json_request("POST", "/texts", &token, json!({"text": "Hello"})))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = json_body(response.into_body()).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = fixture
        .send(json_request("PUT", &format!("/texts/{id}"), &token, json!({"text": "Updated"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = json_body(response.into_body()).await;
    assert_eq!(updated["text"], "Updated");

    let response = fixture.send(empty_request("GET", "/texts", &token)).await;
    let list: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(list.len(), 1);

    let response = fixture
        .send(empty_request("DELETE", &format!("/texts/{id}"), &token))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = fixture
        .send(empty_request("GET", &format!("/texts/{id}"), &token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_content_is_not_found() {
    let fixture = Fixture::new();
    let owner = fixture.auth.user_token(Uuid::now_v7());
    let stranger = fixture.auth.user_token(Uuid::now_v7());

    let response = fixture
        .send(json_request(
            "POST",
            "/videos",
            &owner,
            json!({"link": "https://video.example.com/1"}),
        ))
        .await;
    let video: Value = json_body(response.into_body()).await;
    let uri = format!("/videos/{}", video["id"].as_str().unwrap());

    let response = fixture.send(empty_request("GET", &uri, &stranger)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = fixture.send(empty_request("DELETE", &uri, &stranger)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = fixture.send(empty_request("GET", "/videos", &stranger)).await;
    let list: Vec<Value> = json_body(response.into_body()).await;
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_invalid_video_link() {
    let fixture = Fixture::new();
    let token = fixture.auth.user_token(Uuid::now_v7());

    let response = fixture
        .send(json_request("POST", "/videos", &token, json!({"link": "not a url"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_table_rows_flow() {
    let fixture = Fixture::new();
    let token = fixture.auth.user_token(Uuid::now_v7());

    let response = fixture
        .send(json_request(
            "POST",
            "/tables",
            &token,
            json!({"headers": ["Model", "Price"]}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let table: Value = json_body(response.into_body()).await;
    let table_id = table["id"].as_str().unwrap().to_string();

    let response = fixture
        .send(json_request(
            "POST",
            &format!("/tables/{table_id}/rows"),
            &token,
            json!({"data": ["A1", 15000]}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let row: Value = json_body(response.into_body()).await;
    assert_eq!(row["table_id"], table_id.as_str());
    let row_uri = format!("/tables/{table_id}/rows/{}", row["id"].as_str().unwrap());

    let response = fixture
        .send(json_request("PUT", &row_uri, &token, json!({"data": ["A1", 14000]})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = json_body(response.into_body()).await;
    assert_eq!(updated["data"], json!(["A1", 14000]));

    // Deleting the table takes its rows along
    let response = fixture
        .send(empty_request("DELETE", &format!("/tables/{table_id}"), &token))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = fixture.send(empty_request("GET", &row_uri, &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rows_of_unknown_table() {
    let fixture = Fixture::new();
    let token = fixture.auth.user_token(Uuid::now_v7());

    let response = fixture
        .send(json_request(
            "POST",
            &format!("/tables/{}/rows", Uuid::now_v7()),
            &token,
            json!({"data": ["x"]}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = fixture
        .send(empty_request("GET", &format!("/tables/{}/rows/bad", Uuid::now_v7()), &token))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_image_upload_replace_and_delete() {
    let fixture = Fixture::new();
    let token = fixture.auth.user_token(Uuid::now_v7());

    let response = fixture
        .send(multipart_request("POST", "/images", &token, "door.png", b"first"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let image: Value = json_body(response.into_body()).await;
    let url = image["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("http://api.test/static/"));
    assert!(url.ends_with(".png"));
    let first_file = stored_file(&fixture, &url);
    assert_eq!(std::fs::read(&first_file).unwrap(), b"first");

    let uri = format!("/images/{}", image["id"].as_str().unwrap());
    let response = fixture
        .send(multipart_request("PUT", &uri, &token, "door.jpg", b"second"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let replaced: Value = json_body(response.into_body()).await;
    let second_file = stored_file(&fixture, replaced["url"].as_str().unwrap());
    assert!(!first_file.exists());
    assert_eq!(std::fs::read(&second_file).unwrap(), b"second");

    let response = fixture.send(empty_request("DELETE", &uri, &token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!second_file.exists());

    let _ = std::fs::remove_dir_all(&fixture.uploads);
}

#[tokio::test]
async fn test_image_upload_rejects_unknown_type() {
    let fixture = Fixture::new();
    let token = fixture.auth.user_token(Uuid::now_v7());

    let response = fixture
        .send(multipart_request("POST", "/images", &token, "notes.txt", b"hello"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}
