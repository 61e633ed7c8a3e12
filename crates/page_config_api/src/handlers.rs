//! HTTP request handlers
//!
//! This module contains all request handlers for the REST API endpoints.
//! Handlers translate HTTP requests to store operations and store results
//! to HTTP responses.
//!
//! # Architecture
//!
//! Each handler:
//! 1. Extracts HTTP request data (path params, body)
//! 2. Calls the shared [`PageConfigStore`](page_config::PageConfigStore)
//! 3. Translates the result to an HTTP response
//! 4. Returns Result<Json<Response>, ApiError>
//!
//! Every mutation answers with the page it touched, read from the snapshot
//! the mutation produced rather than from a second store read. Bodies are
//! taken as `Result<Json<_>, JsonRejection>` so malformed JSON is reported in
//! the same error shape as store errors.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use page_config::{ConfigTree, PageConfig, SectionConfig};

use crate::{
    errors::ApiError,
    models::{request::*, response::*},
    AppState,
};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// Extract a page from a snapshot returned by a store mutation.
fn page_from_snapshot(snapshot: &ConfigTree, page: &str) -> Result<PageResponse, ApiError> {
    snapshot
        .page(page)
        .map(|config| PageResponse::new(page, Arc::clone(config)))
        .ok_or_else(|| ApiError::internal(format!("page '{}' missing after mutation", page)))
}

/// GET /api/v1/health
///
/// Health check endpoint for monitoring and load balancers.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
        pages: state.store.snapshot().len(),
    })
}

/// GET /api/v1/pages
pub async fn list_pages(State(state): State<AppState>) -> Json<ListPagesResponse> {
    Json(ListPagesResponse {
        pages: state.store.page_names(),
    })
}

/// GET /api/v1/config
///
/// Returns the whole live configuration tree.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        config: state.store.snapshot(),
    })
}

/// GET /api/v1/pages/:page
pub async fn get_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Json<PageResponse>, ApiError> {
    let config = state.store.get_page(&page)?;
    Ok(Json(PageResponse::new(page, config)))
}

/// PUT /api/v1/pages/:page
///
/// Replaces the whole page with the request body. Creates the page if it
/// does not exist yet.
pub async fn replace_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    body: Result<Json<PageConfig>, JsonRejection>,
) -> Result<Json<PageResponse>, ApiError> {
    let Json(request) = body?;
    tracing::debug!(page = %page, sections = request.len(), "Replacing page");

    let snapshot = state.store.replace_page(&page, request)?;
    Ok(Json(page_from_snapshot(&snapshot, &page)?))
}

/// GET /api/v1/pages/:page/sections/:section
pub async fn get_section(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
) -> Result<Json<SectionResponse>, ApiError> {
    let config = state.store.get_section(&page, &section)?;
    Ok(Json(SectionResponse {
        page,
        section,
        config,
    }))
}

/// PUT /api/v1/pages/:page/sections/:section
pub async fn replace_section(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
    body: Result<Json<SectionConfig>, JsonRejection>,
) -> Result<Json<PageResponse>, ApiError> {
    let Json(request) = body?;
    tracing::debug!(
        page = %page,
        section = %section,
        fields = request.len(),
        "Replacing section"
    );

    let snapshot = state.store.replace_section(&page, &section, request)?;
    Ok(Json(page_from_snapshot(&snapshot, &page)?))
}

/// PUT /api/v1/pages/:page/sections/:section/fields/:field
///
/// Sets a single field. The body is `{ "value": <any JSON> }`.
pub async fn update_field(
    State(state): State<AppState>,
    Path((page, section, field)): Path<(String, String, String)>,
    body: Result<Json<UpdateFieldRequest>, JsonRejection>,
) -> Result<Json<PageResponse>, ApiError> {
    let Json(request) = body?;
    tracing::debug!(
        page = %page,
        section = %section,
        field = %field,
        kind = request.value.kind(),
        "Updating field"
    );

    let snapshot = state
        .store
        .update_field(&page, &section, &field, request.value)?;
    Ok(Json(page_from_snapshot(&snapshot, &page)?))
}

/// POST /api/v1/config/reset
///
/// Restores the snapshot the store was built with.
pub async fn reset_config(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    let snapshot = state.store.reset_to_initial()?;

    tracing::info!(pages = snapshot.len(), "Site configuration reset via API");

    Ok(Json(ResetResponse {
        pages: snapshot.page_names().map(String::from).collect(),
    }))
}
