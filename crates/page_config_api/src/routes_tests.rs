//! Tests for routes module

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use page_config::{PageConfigStore, StoreSettings};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app_state() -> AppState {
    AppState::new(Arc::new(PageConfigStore::new(
        page_config::site_defaults(),
        StoreSettings::default(),
    )))
}

#[tokio::test]
async fn test_health_route_is_under_api_prefix() {
    let app = create_router(test_app_state());

    let request = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(api_middleware::REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_unprefixed_route_is_not_found() {
    let app = create_router(test_app_state());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_field_route_rejects_get() {
    let app = create_router(test_app_state());

    let request = Request::builder()
        .uri("/api/v1/pages/homepage/sections/hero/fields/title")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_preflight_allows_put() {
    let app = create_router(test_app_state());

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/pages/homepage")
        .header("origin", "http://admin.example.com")
        .header("access-control-request-method", "PUT")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    let methods = response
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("PUT"));
}
