//! Building the shared store at process start.
//!
//! The initial snapshot comes from `SITE_CONFIG_SNAPSHOT` (JSON or TOML) or
//! from the built-in site defaults. When `SITE_CONFIG_STATE` is set, the
//! tree saved there by an earlier run becomes the live tree and every later
//! change is written back to it. The startup snapshot stays the reset target.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use page_config::{
    load_snapshot, site_defaults, ConfigPersistence, ConfigTree, JsonFilePersistence,
    PageConfigStore, PersistenceWorker, StoreSettings,
};
use tokio::task::JoinHandle;

use crate::AppState;

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;

/// The built application state and, when persistence is configured, the
/// worker saving its changes.
pub struct Startup {
    pub state: AppState,

    /// Finishes once the store has been dropped and every pending change is saved
    pub persistence_worker: Option<JoinHandle<()>>,
}

/// Where the API process gets its configuration from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// Initial snapshot file; built-in defaults when `None`
    pub snapshot_path: Option<PathBuf>,

    /// Store settings TOML file; default settings when `None`
    pub settings_path: Option<PathBuf>,

    /// JSON file the live tree is saved to; no persistence when `None`
    pub state_path: Option<PathBuf>,
}

impl StartupConfig {
    /// Read `SITE_CONFIG_SNAPSHOT`, `SITE_CONFIG_SETTINGS` and `SITE_CONFIG_STATE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        Self {
            snapshot_path: path("SITE_CONFIG_SNAPSHOT"),
            settings_path: path("SITE_CONFIG_SETTINGS"),
            state_path: path("SITE_CONFIG_STATE"),
        }
    }

    fn initial_snapshot(&self) -> anyhow::Result<ConfigTree> {
        match &self.snapshot_path {
            Some(path) => load_snapshot(path)
                .with_context(|| format!("Failed to load initial snapshot {}", path.display())),
            None => Ok(site_defaults()),
        }
    }

    fn settings(&self) -> anyhow::Result<StoreSettings> {
        match &self.settings_path {
            Some(path) => StoreSettings::load(path)
                .with_context(|| format!("Failed to load store settings {}", path.display())),
            None => Ok(StoreSettings::default()),
        }
    }

    /// Build the store and the application state around it.
    ///
    /// Must be called inside a Tokio runtime when `state_path` is set, since
    /// the persistence worker is spawned on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot, the settings or the saved state
    /// cannot be loaded.
    pub async fn build(&self) -> anyhow::Result<Startup> {
        let initial = self.initial_snapshot()?;
        let settings = self.settings()?;

        tracing::info!(
            pages = initial.len(),
            policy = ?settings.missing_paths,
            from_file = self.snapshot_path.is_some(),
            "Initial site configuration loaded"
        );

        let store = Arc::new(PageConfigStore::new(initial, settings));

        let mut persistence_worker = None;
        if let Some(state_path) = &self.state_path {
            let persistence = Arc::new(JsonFilePersistence::new(state_path));

            let saved = persistence
                .load()
                .await
                .with_context(|| format!("Failed to load saved state {}", state_path.display()))?;
            if let Some(saved) = saved {
                tracing::info!(
                    path = %state_path.display(),
                    pages = saved.len(),
                    "Restoring saved site configuration"
                );
                store.reset_to_defaults(&saved)?;
            }

            persistence_worker = Some(PersistenceWorker::spawn(&store, persistence));
        }

        Ok(Startup {
            state: AppState::new(store),
            persistence_worker,
        })
    }
}
