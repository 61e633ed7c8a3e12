//! HTTP server configuration and startup
//!
//! This module provides the main server configuration, startup and the
//! shutdown sequence that drains pending configuration saves.

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;

use crate::{routes, startup::Startup, AppState, DEFAULT_PORT};

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl ApiConfig {
    /// Build the configuration from `API_PORT` and `API_HOST`.
    ///
    /// # Errors
    ///
    /// Returns an error if `API_PORT` is set but is not a valid port number.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let port = match lookup("API_PORT") {
            Some(value) => value
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid API_PORT '{}': {}", value, e))?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            host: lookup("API_HOST").unwrap_or(defaults.host),
        })
    }
}

/// Longest wait for pending configuration changes to be saved at shutdown.
pub const PERSISTENCE_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// API server
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
    persistence_worker: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Create a new API server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            persistence_worker: None,
        }
    }

    /// Create a server from the result of [`StartupConfig::build`](crate::StartupConfig::build).
    ///
    /// The persistence worker, if any, is drained when the server shuts down.
    pub fn from_startup(config: ApiConfig, startup: Startup) -> Self {
        Self {
            config,
            state: startup.state,
            persistence_worker: startup.persistence_worker,
        }
    }

    /// Build the Axum router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Start the server and listen for requests.
    ///
    /// This method blocks until the server is shut down gracefully via
    /// CTRL+C (SIGINT) or SIGTERM signal, and every configuration change made
    /// before shutdown has been persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn serve(self) -> anyhow::Result<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Like [`serve`](Self::serve), stopping when `signal` completes.
    pub async fn serve_with_shutdown<S>(self, signal: S) -> anyhow::Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let Self {
            config,
            state,
            persistence_worker,
        } = self;

        let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

        tracing::info!("Starting API server on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        // The router owns the last handle to the store; once serving ends the
        // store is dropped and the persistence worker sees the channel close.
        let app = routes::create_router(state);

        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        if let Some(worker) = persistence_worker {
            drain_persistence(worker).await;
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait for the persistence worker to save the changes it has not saved yet.
async fn drain_persistence(worker: JoinHandle<()>) {
    tracing::info!("Waiting for pending configuration changes to be saved");

    match tokio::time::timeout(PERSISTENCE_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => tracing::info!("Pending configuration changes saved"),
        Ok(Err(e)) => tracing::error!("Persistence worker failed: {}", e),
        Err(_) => tracing::warn!(
            timeout_secs = PERSISTENCE_DRAIN_TIMEOUT.as_secs(),
            "Gave up waiting for the persistence worker; recent changes may not be saved"
        ),
    }
}

/// Wait for shutdown signal (CTRL+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
