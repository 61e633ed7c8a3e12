//! HTTP response type definitions

use std::sync::Arc;

use page_config::{ConfigTree, PageConfig, SectionConfig};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// Names of all configured pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPagesResponse {
    pub pages: Vec<String>,
}

/// The whole configuration tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub config: Arc<ConfigTree>,
}

/// One page, returned by reads and by every page-scoped mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub page: String,
    pub config: Arc<PageConfig>,
}

impl PageResponse {
    pub fn new(page: impl Into<String>, config: Arc<PageConfig>) -> Self {
        Self {
            page: page.into(),
            config,
        }
    }
}

/// One section of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub page: String,
    pub section: String,
    pub config: Arc<SectionConfig>,
}

/// Result of a reset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    /// Pages present after the reset
    pub pages: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status: "healthy" or "unhealthy"
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,

    /// Number of configured pages
    pub pages: usize,
}
