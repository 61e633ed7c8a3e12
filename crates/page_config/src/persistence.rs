//! Persistence collaborator for the page configuration store.
//!
//! The in-memory store is the source of truth for a running site. Persistence
//! happens after a change has been committed and is best effort: a failed save
//! is logged and never rolls the in-memory tree back.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::errors::{PageConfigError, PageConfigResult};
use crate::loader::{parse_snapshot, SnapshotFormat};
use crate::store::PageConfigStore;
use crate::tree::ConfigTree;

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;

/// Storage backend for configuration trees.
///
/// The storage format is entirely up to the implementation.
#[async_trait]
pub trait ConfigPersistence: Send + Sync {
    /// Load the last saved tree, `None` if nothing has been saved yet.
    async fn load(&self) -> PageConfigResult<Option<ConfigTree>>;

    /// Save a full tree, replacing whatever was saved before.
    async fn save(&self, tree: &ConfigTree) -> PageConfigResult<()>;
}

/// Saves the tree as pretty printed JSON in a single file.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so readers never see a half written file.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ConfigPersistence for JsonFilePersistence {
    async fn load(&self) -> PageConfigResult<Option<ConfigTree>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No saved configuration at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => {
                return Err(PageConfigError::FileAccessError {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        parse_snapshot(&content, SnapshotFormat::Json).map(Some)
    }

    async fn save(&self, tree: &ConfigTree) -> PageConfigResult<()> {
        let content =
            serde_json::to_vec_pretty(tree).map_err(|e| PageConfigError::PersistenceFailed {
                reason: format!("failed to serialize configuration: {}", e),
            })?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &content)
            .await
            .map_err(|e| PageConfigError::PersistenceFailed {
                reason: format!("failed to write {}: {}", temp_path.display(), e),
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| PageConfigError::PersistenceFailed {
                reason: format!("failed to replace {}: {}", self.path.display(), e),
            })?;

        debug!(bytes = content.len(), "Configuration saved to {:?}", self.path);
        Ok(())
    }
}

/// Keeps the last saved tree in memory.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    saved: Mutex<Option<ConfigTree>>,
    saves: Mutex<usize>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `tree` already saved.
    pub fn with_saved(tree: ConfigTree) -> Self {
        Self {
            saved: Mutex::new(Some(tree)),
            saves: Mutex::new(0),
        }
    }

    pub fn saved(&self) -> Option<ConfigTree> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ConfigPersistence for InMemoryPersistence {
    async fn load(&self) -> PageConfigResult<Option<ConfigTree>> {
        Ok(self.saved())
    }

    async fn save(&self, tree: &ConfigTree) -> PageConfigResult<()> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(tree.clone());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Background task that saves every committed change.
pub struct PersistenceWorker;

impl PersistenceWorker {
    /// Spawn the worker on the current Tokio runtime.
    ///
    /// The worker holds only a weak reference to the store and exits once the
    /// store has been dropped and every change already broadcast has been
    /// handled. When it lags behind the change stream it saves the store's
    /// current tree instead of the missed intermediate ones. A change older
    /// than the last tree handed to `save` is never saved.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(
        store: &Arc<PageConfigStore>,
        persistence: Arc<dyn ConfigPersistence>,
    ) -> JoinHandle<()> {
        let mut changes = store.watch();
        let store = Arc::downgrade(store);

        tokio::spawn(async move {
            info!("Configuration persistence worker started");
            let mut last_sequence = 0;

            loop {
                let (sequence, snapshot) = match changes.recv().await {
                    Ok(change) => (change.sequence, change.snapshot),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Persistence worker lagged, saving latest snapshot");
                        match store.upgrade() {
                            Some(store) => store.versioned_snapshot(),
                            None => continue,
                        }
                    }
                    Err(RecvError::Closed) => break,
                };

                if sequence <= last_sequence {
                    trace!(sequence, last_sequence, "Skipping already persisted change");
                    continue;
                }
                last_sequence = sequence;

                match persistence.save(&snapshot).await {
                    Ok(()) => debug!(sequence, "Configuration change persisted"),
                    Err(e) => warn!(
                        sequence,
                        error = %e,
                        "Failed to persist configuration change; in-memory configuration is unchanged"
                    ),
                }
            }

            info!("Configuration persistence worker stopped");
        })
    }
}
