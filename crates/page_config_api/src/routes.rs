//! HTTP routing configuration
//!
//! This module defines all HTTP routes and their corresponding handlers.
//!
//! # Route Structure
//!
//! All routes are prefixed with `/api/v1`:
//!
//! - GET    /api/v1/health - Health check
//! - GET    /api/v1/pages - List pages
//! - GET    /api/v1/config - Whole configuration tree
//! - POST   /api/v1/config/reset - Restore the startup snapshot
//! - GET    /api/v1/pages/:page - Get page
//! - PUT    /api/v1/pages/:page - Replace page
//! - GET    /api/v1/pages/:page/sections/:section - Get section
//! - PUT    /api/v1/pages/:page/sections/:section - Replace section
//! - PUT    /api/v1/pages/:page/sections/:section/fields/:field - Update field

use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{handlers, middleware as api_middleware, AppState};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// Create the complete API router with all routes configured.
///
/// This function sets up:
/// - All endpoint routes
/// - CORS configuration
/// - Request tracing
/// - Timeout handling
pub fn create_router(state: AppState) -> Router {
    // The admin control center is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(api_middleware::REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(api_middleware::REQUEST_ID_HEADER)])
        .allow_credentials(false)
        // Cache preflight responses for 1 hour
        .max_age(Duration::from_secs(3600));

    // Configure request tracing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_response(DefaultOnResponse::new().include_headers(true));

    // Configure request timeout (30 seconds)
    let timeout_layer = TimeoutLayer::new(Duration::from_secs(30));

    let api_v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/config", get(handlers::get_config))
        .route("/config/reset", post(handlers::reset_config))
        .route("/pages", get(handlers::list_pages))
        .merge(page_routes())
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(timeout_layer)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state);

    // Root router with API version prefix
    Router::new().nest("/api/v1", api_v1)
}

/// Page, section and field routes
fn page_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pages/:page",
            get(handlers::get_page).put(handlers::replace_page),
        )
        .route(
            "/pages/:page/sections/:section",
            get(handlers::get_section).put(handlers::replace_section),
        )
        .route(
            "/pages/:page/sections/:section/fields/:field",
            put(handlers::update_field),
        )
}
