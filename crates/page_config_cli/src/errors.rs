use std::io;

use page_config::PageConfigError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the site configuration CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// A snapshot or settings file could not be loaded, or a requested
    /// page or section is not in it.
    #[error("Configuration error: {0}")]
    Config(#[from] PageConfigError),

    /// Invalid command-line arguments were provided.
    ///
    /// This error is returned when the user provides invalid or incompatible
    /// command-line arguments that cannot be processed.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Refused to overwrite an existing file.
    #[error("File already exists: {0}")]
    FileExists(String),

    /// Failed to write a file to the filesystem.
    #[error("Failed to write file: {0}")]
    WriteFile(#[source] io::Error),

    /// Failed to render output as JSON.
    #[error("Failed to render JSON output: {0}")]
    RenderJson(#[source] serde_json::Error),

    /// Failed to render output as TOML.
    #[error("Failed to render TOML output: {0}")]
    RenderToml(#[source] toml::ser::Error),
}
