//! Handler tests for the catalog domain
//!
//! Run the catalog router against the in-memory repository and check
//! status codes, JSON shapes and the admin guard.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use core_config::assets::AssetConfig;
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use test_utils::TestAuth;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(repo: InMemoryCatalogRepository, auth: &TestAuth) -> Router {
    let service = CatalogService::new(repo, AssetConfig::new("http://api.test/static", "./public"));
    handlers::router(service, auth.state())
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, TestAuth::bearer(token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn seed_door(repo: &InMemoryCatalogRepository, title: &str, prices: &[i64]) -> CatalogItem {
    let item = repo
        .create_item(CreateDoor {
            title: title.to_string(),
            image_entry: format!("doors/{title}-entry.png"),
            image_exit: format!("doors/{title}-exit.png"),
        })
        .await
        .unwrap();

    for (i, price) in prices.iter().enumerate() {
        repo.create_variant(
            item.id,
            CreateVariant {
                title: format!("{title}-{i}"),
                width: 800,
                height: 2030,
                target: DoorPurpose::Apartment,
                opening_direction: i % 2 == 0,
                mirror: false,
                additional_features: None,
                is_defect: false,
                price: *price,
            },
        )
        .await
        .unwrap();
    }
    item
}

#[tokio::test]
async fn test_query_doors_sorted_by_min_price() {
    let repo = InMemoryCatalogRepository::new();
    seed_door(&repo, "a", &[500, 900]).await;
    seed_door(&repo, "b", &[200]).await;
    seed_door(&repo, "c", &[800]).await;
    let auth = TestAuth::new();

    let request = json_request(
        "POST",
        "/doors/query",
        None,
        json!({ "filter_by_min_price": true, "count": 0, "limit": 2 }),
    );
    let response = app(repo, &auth).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: CatalogPage = json_body(response.into_body()).await;
    assert_eq!(page.count, 2);
    let titles: Vec<&str> = page.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "a"]);
    assert_eq!(page.items[0].image_entry, "http://api.test/static/doors/b-entry.png");
}

#[tokio::test]
async fn test_query_doors_past_the_end_is_empty() {
    let repo = InMemoryCatalogRepository::new();
    seed_door(&repo, "only", &[100]).await;
    let auth = TestAuth::new();

    let request = json_request("POST", "/doors/query", None, json!({ "offset": 10, "limit": 5 }));
    let response = app(repo, &auth).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page, json!({ "items": [], "count": 0 }));
}

#[tokio::test]
async fn test_query_doors_rejects_negative_limit() {
    let auth = TestAuth::new();
    let request = json_request("POST", "/doors/query", None, json!({ "limit": -1 }));
    let response = app(InMemoryCatalogRepository::new(), &auth)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_query_doors_rejects_offset_together_with_count() {
    let auth = TestAuth::new();
    let request = json_request("POST", "/doors/query", None, json!({ "offset": 0, "count": 5 }));
    let response = app(InMemoryCatalogRepository::new(), &auth)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_min_price_endpoint_uses_query_params() {
    let repo = InMemoryCatalogRepository::new();
    seed_door(&repo, "x", &[300]).await;
    seed_door(&repo, "y", &[100]).await;
    let auth = TestAuth::new();

    let request = Request::builder()
        .uri("/doors/min-price?offset=1&limit=5")
        .body(Body::empty())
        .unwrap();
    let response = app(repo, &auth).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: CatalogPage = json_body(response.into_body()).await;
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].title, "x");
}

#[tokio::test]
async fn test_get_unknown_door_returns_404() {
    let auth = TestAuth::new();
    let request = Request::builder()
        .uri(format!("/doors/{}", Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();
    let response = app(InMemoryCatalogRepository::new(), &auth)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_door_with_invalid_uuid_returns_400() {
    let auth = TestAuth::new();
    let request = Request::builder()
        .uri("/doors/not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = app(InMemoryCatalogRepository::new(), &auth)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_door_requires_token() {
    let auth = TestAuth::new();
    let request = json_request(
        "POST",
        "/doors",
        None,
        json!({ "title": "Oak", "image_entry": "a.png", "image_exit": "b.png" }),
    );
    let response = app(InMemoryCatalogRepository::new(), &auth)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_door_requires_admin_role() {
    let auth = TestAuth::new();
    let token = auth.user_token(Uuid::now_v7());
    let request = json_request(
        "POST",
        "/doors",
        Some(&token),
        json!({ "title": "Oak", "image_entry": "a.png", "image_exit": "b.png" }),
    );
    let response = app(InMemoryCatalogRepository::new(), &auth)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_builds_door_with_article() {
    let repo = InMemoryCatalogRepository::new();
    let auth = TestAuth::new();
    let token = auth.admin_token(Uuid::now_v7());

    let response = app(repo.clone(), &auth)
        .oneshot(json_request(
            "POST",
            "/doors",
            Some(&token),
            json!({ "title": "Oak", "image_entry": "oak/in.png", "image_exit": "oak/out.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let door: CatalogItem = json_body(response.into_body()).await;
    assert_eq!(door.image_exit, "http://api.test/static/oak/out.png");

    let response = app(repo.clone(), &auth)
        .oneshot(json_request(
            "POST",
            &format!("/doors/{}/variants", door.id),
            Some(&token),
            json!({
                "title": "Oak 800",
                "width": 800,
                "height": 2030,
                "target": "home",
                "mirror": true,
                "additional_features": "showcase",
                "price": 1999000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let variant: Variant = json_body(response.into_body()).await;
    assert_eq!(variant.item_id, door.id);
    assert_eq!(variant.additional_features, Some(AdditionalFeature::Showcase));

    let response = app(repo.clone(), &auth)
        .oneshot(json_request(
            "POST",
            &format!("/variants/{}/images", variant.id),
            Some(&token),
            json!({ "path": "oak/800.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let variant: Variant = json_body(response.into_body()).await;
    assert_eq!(variant.images, vec!["http://api.test/static/oak/800.png"]);

    let stored = repo.get_item(door.id).await.unwrap().unwrap();
    assert_eq!(stored.variants[0].images, vec!["oak/800.png"]);
}

#[tokio::test]
async fn test_create_variant_validates_body() {
    let repo = InMemoryCatalogRepository::new();
    let door = seed_door(&repo, "v", &[]).await;
    let auth = TestAuth::new();
    let token = auth.admin_token(Uuid::now_v7());

    let response = app(repo, &auth)
        .oneshot(json_request(
            "POST",
            &format!("/doors/{}/variants", door.id),
            Some(&token),
            json!({ "title": "", "width": 0, "height": 2000, "target": "home", "price": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["width"].is_array());
}

#[tokio::test]
async fn test_delete_door_then_404() {
    let repo = InMemoryCatalogRepository::new();
    let door = seed_door(&repo, "gone", &[100]).await;
    let auth = TestAuth::new();
    let token = auth.admin_token(Uuid::now_v7());

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/doors/{}", door.id))
            .header(header::AUTHORIZATION, TestAuth::bearer(&token))
            .body(Body::empty())
            .unwrap()
    };

    let response = app(repo.clone(), &auth).oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app(repo, &auth).oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_info_default_and_update() {
    let repo = InMemoryCatalogRepository::new();
    let auth = TestAuth::new();
    let token = auth.admin_token(Uuid::now_v7());

    let get = || Request::builder().uri("/filter-info").body(Body::empty()).unwrap();

    let response = app(repo.clone(), &auth).oneshot(get()).await.unwrap();
    let info: FilterInfo = json_body(response.into_body()).await;
    assert_eq!(info.url, "http://api.test/static/filter.png");

    let response = app(repo.clone(), &auth)
        .oneshot(json_request(
            "PUT",
            "/filter-info",
            Some(&token),
            json!({ "path": "filter/2026.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(repo, &auth).oneshot(get()).await.unwrap();
    let info: FilterInfo = json_body(response.into_body()).await;
    assert_eq!(info.url, "http://api.test/static/filter/2026.png");
}
