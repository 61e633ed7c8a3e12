//! Loading initial snapshots from files.
//!
//! The site ships its initial configuration as a JSON or TOML document whose
//! top level keys are page names:
//!
//! ```toml
//! [homepage.hero]
//! title = "Discover Gangtok"
//! subtitle = "Local businesses, all in one place"
//!
//! [homepage.categoriesGrid]
//! selectedCategories = ["food", "vehicles"]
//! ```

use std::{fs, path::Path};
use tracing::debug;

use crate::errors::{PageConfigError, PageConfigResult};
use crate::tree::ConfigTree;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Text format of a snapshot document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Toml,
}

impl SnapshotFormat {
    /// Pick the format from a file extension (`.json` or `.toml`).
    ///
    /// # Errors
    ///
    /// Returns `PageConfigError::ParseError` for any other extension.
    pub fn from_path(path: &Path) -> PageConfigResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(PageConfigError::ParseError {
                reason: format!(
                    "unsupported snapshot file '{}', expected a .json or .toml file",
                    path.display()
                ),
            }),
        }
    }
}

/// Parse a snapshot document.
///
/// # Errors
///
/// Returns `PageConfigError::ParseError` if the text is malformed or is not a
/// page -> section -> field mapping.
pub fn parse_snapshot(text: &str, format: SnapshotFormat) -> PageConfigResult<ConfigTree> {
    match format {
        SnapshotFormat::Json => serde_json::from_str(text).map_err(|e| PageConfigError::ParseError {
            reason: format!("invalid JSON snapshot: {}", e),
        }),
        SnapshotFormat::Toml => toml::from_str(text).map_err(|e| PageConfigError::ParseError {
            reason: format!("invalid TOML snapshot: {}", e),
        }),
    }
}

/// Load a snapshot file, choosing the format from its extension.
///
/// # Errors
///
/// Returns `FileNotFound`, `FileAccessError` or `ParseError`.
pub fn load_snapshot(path: &Path) -> PageConfigResult<ConfigTree> {
    debug!("Loading configuration snapshot from {:?}", path);

    let format = SnapshotFormat::from_path(path)?;

    if !path.exists() {
        return Err(PageConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| PageConfigError::FileAccessError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let tree = parse_snapshot(&content, format)?;
    debug!(
        pages = tree.len(),
        sections = tree.section_count(),
        "Configuration snapshot loaded"
    );
    Ok(tree)
}
