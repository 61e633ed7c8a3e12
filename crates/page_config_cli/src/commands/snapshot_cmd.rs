//! Snapshot file commands: `validate`, `show` and `defaults`.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use page_config::{
    load_snapshot, site_defaults, ConfigTree, PageConfigStore, SnapshotFormat, StoreSettings,
};
use tracing::{debug, info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "snapshot_cmd_tests.rs"]
mod tests;

/// Check that a snapshot file parses and print what it contains.
#[instrument]
pub fn validate(file: &Path) -> Result<String, Error> {
    debug!(message = "Validating snapshot", path = ?file);

    let tree = load_snapshot(file)?;

    info!(
        message = "Snapshot is valid",
        path = ?file,
        pages = tree.len(),
        sections = tree.section_count()
    );
    Ok(format_summary(file, &tree))
}

/// Render a snapshot file, or one page or section of it, as pretty JSON.
///
/// Lookups go through a [`PageConfigStore`] so a missing page or section is
/// reported exactly as the running site would report it.
#[instrument]
pub fn show(file: &Path, page: Option<&str>, section: Option<&str>) -> Result<String, Error> {
    debug!(message = "Showing snapshot", path = ?file, page = ?page, section = ?section);

    let store = PageConfigStore::new(load_snapshot(file)?, StoreSettings::default());

    let rendered = match (page, section) {
        (None, None) => serde_json::to_string_pretty(&store.snapshot()),
        (Some(page), None) => serde_json::to_string_pretty(&store.get_page(page)?),
        (Some(page), Some(section)) => {
            serde_json::to_string_pretty(&store.get_section(page, section)?)
        }
        (None, Some(_)) => {
            return Err(Error::InvalidArguments(
                "--section requires --page".to_string(),
            ))
        }
    };

    rendered.map_err(Error::RenderJson)
}

/// Render the built-in site defaults.
///
/// With an output path the snapshot is written there, as TOML for a `.toml`
/// path and JSON otherwise, and a confirmation is returned. Without one the
/// JSON document itself is returned.
#[instrument]
pub fn defaults(output: Option<&Path>) -> Result<String, Error> {
    let tree = Arc::new(site_defaults());

    let Some(path) = output else {
        return serde_json::to_string_pretty(&tree).map_err(Error::RenderJson);
    };

    let content = match SnapshotFormat::from_path(path) {
        Ok(SnapshotFormat::Toml) => toml::to_string_pretty(tree.as_ref()).map_err(Error::RenderToml)?,
        _ => serde_json::to_string_pretty(&tree).map_err(Error::RenderJson)?,
    };

    std::fs::write(path, content).map_err(Error::WriteFile)?;

    info!(message = "Default snapshot written", path = ?path, pages = tree.len());
    Ok(format!(
        "Default snapshot with {} pages written to {}",
        tree.len(),
        path.display()
    ))
}

fn format_summary(file: &Path, tree: &ConfigTree) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n\n",
        "Validating snapshot:".bold(),
        file.display().to_string().bright_cyan()
    ));
    output.push_str(&format!("{}\n\n", "✓ Snapshot is VALID".green().bold()));
    output.push_str(&format!(
        "{}: {} pages, {} sections\n",
        "Contents".bold(),
        tree.len(),
        tree.section_count()
    ));

    if tree.is_empty() {
        output.push_str(&format!("  {}\n", "(no pages defined)".dimmed()));
    }

    for (name, page) in tree.iter() {
        let sections = page.section_names().collect::<Vec<_>>();
        let sections = if sections.is_empty() {
            "(no sections)".dimmed().to_string()
        } else {
            sections.join(", ")
        };
        output.push_str(&format!("  {} {}: {}\n", "✓".green(), name.bold(), sections));
    }

    output
}
