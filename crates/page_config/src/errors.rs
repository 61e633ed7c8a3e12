//! Page configuration error types.
//!
//! Domain-specific errors for store mutations, snapshot loading
//! and persistence.

use thiserror::Error;

use crate::path::{ConfigPath, PathSegment};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Page configuration errors.
///
/// Mutation errors are raised before the live tree changes, so a failed call
/// never leaves a partial write behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageConfigError {
    #[error("Configuration path not found: {path} (missing {missing})")]
    PathNotFound {
        path: ConfigPath,
        missing: PathSegment,
    },

    #[error("Invalid configuration value at {path}: {reason}")]
    InvalidValue { path: ConfigPath, reason: String },

    #[error("Snapshot file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to access snapshot file: {path} - {reason}")]
    FileAccessError { path: String, reason: String },

    #[error("Failed to parse configuration: {reason}")]
    ParseError { reason: String },

    #[error("Failed to persist configuration: {reason}")]
    PersistenceFailed { reason: String },
}

impl PageConfigError {
    pub(crate) fn path_not_found(path: ConfigPath, missing: PathSegment) -> Self {
        Self::PathNotFound { path, missing }
    }

    pub(crate) fn invalid_value(path: ConfigPath, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path,
            reason: reason.into(),
        }
    }

    /// Target path of a mutation error, if this error concerns one.
    pub fn path(&self) -> Option<&ConfigPath> {
        match self {
            Self::PathNotFound { path, .. } | Self::InvalidValue { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for page configuration operations.
pub type PageConfigResult<T> = Result<T, PageConfigError>;
