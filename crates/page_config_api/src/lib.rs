//! Easy Life Gangtok site configuration REST API
//!
//! This crate exposes the [`PageConfigStore`] to the admin control center over
//! HTTP. Each admin screen reads the page it owns and sends field updates,
//! section replacements or page replacements back.
//!
//! # Architecture
//!
//! This crate exists in the HTTP layer and handles:
//! - HTTP request/response translation
//! - Error mapping from domain to HTTP
//! - Routing and server configuration
//! - Building the store at startup
//!
//! The store is created once in [`startup`] and handed to every handler
//! through [`AppState`].

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod startup;

use std::sync::Arc;

use page_config::PageConfigStore;

// Re-export key types for convenience
pub use errors::{ApiError, ErrorResponse};
pub use models::{request, response};
pub use server::{ApiConfig, ApiServer};
pub use startup::{Startup, StartupConfig};

/// API version
pub const API_VERSION: &str = "v1";

/// Default API port
pub const DEFAULT_PORT: u16 = 8080;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The live site configuration
    pub store: Arc<PageConfigStore>,
}

impl AppState {
    /// Create new application state around an existing store
    pub fn new(store: Arc<PageConfigStore>) -> Self {
        Self { store }
    }
}
