//! Store behaviour settings.
//!
//! Settings are plain serde types so they can be read from a TOML file next to
//! the site snapshot.
//!
//! # TOML Format
//!
//! ```toml
//! missing_paths = "strict"        # or "auto_create"
//! max_value_depth = 32
//! change_channel_capacity = 256
//! ```

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

use crate::errors::{PageConfigError, PageConfigResult};

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

/// What a field or section mutation does when an ancestor page or section is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPathPolicy {
    /// Fail with `PageConfigError::PathNotFound`. Catches typos in page and
    /// section names.
    #[default]
    Strict,

    /// Create the missing page and section as empty mappings.
    AutoCreate,
}

/// Settings for a [`PageConfigStore`](crate::PageConfigStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Handling of missing ancestor paths
    pub missing_paths: MissingPathPolicy,

    /// Deepest nesting accepted for a single field value
    pub max_value_depth: usize,

    /// Buffered change events per asynchronous subscriber before it lags
    pub change_channel_capacity: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            missing_paths: MissingPathPolicy::Strict,
            max_value_depth: 32,
            change_channel_capacity: 256,
        }
    }
}

impl StoreSettings {
    /// Settings with the auto-create policy, everything else default.
    pub fn auto_create() -> Self {
        Self {
            missing_paths: MissingPathPolicy::AutoCreate,
            ..Self::default()
        }
    }

    /// Parse settings from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `PageConfigError::ParseError` if the text is not valid TOML or a
    /// key has the wrong type.
    pub fn from_toml_str(text: &str) -> PageConfigResult<Self> {
        toml::from_str(text).map_err(|e| PageConfigError::ParseError {
            reason: format!("invalid store settings: {}", e),
        })
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` when the file does not exist, `FileAccessError`
    /// when it cannot be read and `ParseError` when it is malformed.
    pub fn load(path: &Path) -> PageConfigResult<Self> {
        debug!("Loading store settings from {:?}", path);

        if !path.exists() {
            return Err(PageConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| PageConfigError::FileAccessError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Render the settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns `PageConfigError::ParseError` if serialization fails.
    pub fn to_toml_string(&self) -> PageConfigResult<String> {
        toml::to_string(self).map_err(|e| PageConfigError::ParseError {
            reason: format!("failed to serialize store settings: {}", e),
        })
    }
}
