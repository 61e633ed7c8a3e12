//! Tests for handlers module

use super::*;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use page_config::{ConfigValue, PageConfigStore, StoreSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::routes::create_router;

fn test_app_state() -> AppState {
    AppState::new(Arc::new(PageConfigStore::new(
        page_config::site_defaults(),
        StoreSettings::default(),
    )))
}

fn test_app() -> (Router, AppState) {
    let state = test_app_state();
    (create_router(state.clone()), state)
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_returns_json() {
    let response = health_check(State(test_app_state())).await;

    assert_eq!(response.0.status, "healthy");
    assert_eq!(
        response.0.version,
        Some(env!("CARGO_PKG_VERSION").to_string())
    );
    assert_eq!(response.0.pages, 6);
    assert!(chrono::DateTime::parse_from_rfc3339(&response.0.timestamp).is_ok());
}

// ============================================================================
// Read Tests
// ============================================================================

#[tokio::test]
async fn test_list_pages() {
    let (app, _) = test_app();

    let (status, body) = send(app, "GET", "/api/v1/pages", None).await;

    assert_eq!(status, StatusCode::OK);
    let pages = body["pages"].as_array().unwrap();
    assert!(pages.contains(&json!("homepage")));
    assert!(pages.contains(&json!("support")));
}

#[tokio::test]
async fn test_get_config_returns_whole_tree() {
    let (app, _) = test_app();

    let (status, body) = send(app, "GET", "/api/v1/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["homepage"]["hotDeals"]["maxDeals"], 6);
}

#[tokio::test]
async fn test_get_page() {
    let (app, _) = test_app();

    let (status, body) = send(app, "GET", "/api/v1/pages/about", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "about");
    assert!(body["config"]["mission"].is_object());
}

#[tokio::test]
async fn test_get_unknown_page_is_not_found() {
    let (app, _) = test_app();

    let (status, body) = send(app, "GET", "/api/v1/pages/blog", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "PathNotFound");
    assert_eq!(body["error"]["details"]["missing"], "page");
}

#[tokio::test]
async fn test_get_section() {
    let (app, _) = test_app();

    let (status, body) = send(app, "GET", "/api/v1/pages/contact/sections/details", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["section"], "details");
    assert_eq!(body["config"]["email"], "support@easylifegangtok.com");
}

// ============================================================================
// Mutation Tests
// ============================================================================

#[tokio::test]
async fn test_update_field_returns_updated_page() {
    let (app, state) = test_app();

    let (status, body) = send(
        app,
        "PUT",
        "/api/v1/pages/homepage/sections/categoriesGrid/fields/selectedCategories",
        Some(json!({ "value": ["food", "vehicles", "electronics"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "homepage");
    assert_eq!(
        body["config"]["categoriesGrid"]["selectedCategories"],
        json!(["food", "vehicles", "electronics"])
    );
    assert_eq!(
        body["config"]["categoriesGrid"]["title"],
        "Browse by Category"
    );
    assert_eq!(state.store.sequence(), 1);
}

#[tokio::test]
async fn test_update_field_in_missing_section_is_not_found() {
    let (app, state) = test_app();

    let (status, body) = send(
        app,
        "PUT",
        "/api/v1/pages/homepage/sections/banner/fields/title",
        Some(json!({ "value": "Hi" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["details"]["missing"], "section");
    assert_eq!(state.store.sequence(), 0);
}

#[tokio::test]
async fn test_update_field_without_value_is_rejected() {
    let (app, state) = test_app();

    let (status, body) = send(
        app,
        "PUT",
        "/api/v1/pages/homepage/sections/hero/fields/title",
        Some(json!({ "title": "Hi" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "InvalidRequestBody");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("value"));
    assert_eq!(state.store.sequence(), 0);
}

#[tokio::test]
async fn test_malformed_json_body_uses_error_shape() {
    let (app, state) = test_app();

    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/pages/homepage/sections/hero")
        .header("content-type", "application/json")
        .body(Body::from("{ \"title\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "InvalidRequestBody");
    assert_eq!(state.store.sequence(), 0);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_rejected() {
    let (app, _) = test_app();

    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/pages/about")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_replace_section() {
    let (app, state) = test_app();

    let (status, body) = send(
        app,
        "PUT",
        "/api/v1/pages/homepage/sections/hotDeals",
        Some(json!({ "title": "Deals", "maxDeals": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["hotDeals"], json!({ "title": "Deals", "maxDeals": 3 }));
    assert!(body["config"]["hero"].is_object());
    assert_eq!(
        state.store.get_field("homepage", "hotDeals", "enabled").unwrap(),
        None
    );
}

#[tokio::test]
async fn test_replace_section_on_missing_page_is_not_found() {
    let (app, _) = test_app();

    let (status, _) = send(
        app,
        "PUT",
        "/api/v1/pages/blog/sections/hero",
        Some(json!({ "title": "Blog" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replace_page_creates_new_page() {
    let (app, state) = test_app();

    let (status, body) = send(
        app,
        "PUT",
        "/api/v1/pages/blog",
        Some(json!({ "hero": { "title": "Blog" } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["hero"]["title"], "Blog");
    assert!(state.store.page_names().contains(&"blog".to_string()));
}

#[tokio::test]
async fn test_replace_page_rejects_non_object_section() {
    let (app, state) = test_app();

    let (status, body) = send(
        app,
        "PUT",
        "/api/v1/pages/about",
        Some(json!({ "hero": "not a section" })),
    )
    .await;

    assert!(status.is_client_error());
    assert_eq!(body["error"]["code"], "InvalidRequestBody");
    assert_eq!(state.store.sequence(), 0);
}

#[tokio::test]
async fn test_reset_restores_startup_snapshot() {
    let state = test_app_state();
    state
        .store
        .update_field("about", "hero", "title", ConfigValue::from("Changed"))
        .unwrap();

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/api/v1/config/reset",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pages"].as_array().unwrap().len(), 6);
    assert_eq!(
        state.store.get_field("about", "hero", "title").unwrap(),
        Some(ConfigValue::from("About Easy Life Gangtok"))
    );
}

#[tokio::test]
async fn test_page_from_snapshot_reports_missing_page() {
    let snapshot = ConfigTree::new();

    let result = page_from_snapshot(&snapshot, "about");

    assert!(matches!(result, Err(ApiError::Internal(_))));
}
