//! Easy Life Gangtok site configuration API server
//!
//! Main binary for running the API server in production or development.
//!
//! # Environment Variables
//!
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `RUST_LOG`: Log level (default: info)
//! - `SITE_CONFIG_SNAPSHOT`: Initial snapshot file, JSON or TOML (default: built-in site defaults)
//! - `SITE_CONFIG_SETTINGS`: Store settings TOML file (default: strict missing paths)
//! - `SITE_CONFIG_STATE`: JSON file the live configuration is saved to (default: not saved)

use std::env;

use page_config_api::{ApiConfig, ApiServer, StartupConfig, API_VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    // Load configuration from environment
    let config = ApiConfig::from_env()?;
    let startup = StartupConfig::from_env();

    tracing::info!("Starting Easy Life Gangtok site configuration API");
    tracing::info!("API version: {}", API_VERSION);
    tracing::debug!(?startup, "Startup configuration");

    let server = ApiServer::from_startup(config, startup.build().await?);

    // Start server with graceful shutdown; returns once pending changes are saved
    server.serve().await
}
