//! `settings-init`: write a store settings file with the default values.

use std::path::{Path, PathBuf};

use page_config::StoreSettings;
use tracing::{debug, error, info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "settings_cmd_tests.rs"]
mod tests;

/// File written when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "site-config.toml";

/// Resolve the settings path, falling back to [`DEFAULT_SETTINGS_FILE`].
pub fn settings_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

/// Create a settings file. Never overwrites an existing file.
#[instrument]
pub fn init_settings(path: Option<&Path>) -> Result<String, Error> {
    let settings_path = settings_path(path);
    debug!(message = "Initializing store settings", path = ?settings_path);

    if settings_path.exists() {
        let err = Error::FileExists(settings_path.display().to_string());
        error!(
            message = "Settings file already exists",
            path = ?settings_path,
            error = ?err
        );
        return Err(err);
    }

    let content = StoreSettings::default().to_toml_string()?;
    std::fs::write(&settings_path, content).map_err(Error::WriteFile)?;

    info!(message = "Store settings initialized", path = ?settings_path);
    Ok(format!(
        "Store settings initialized at {}",
        settings_path.display()
    ))
}
