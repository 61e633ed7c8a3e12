//! Command modules for the site configuration CLI.
//!
//! - `snapshot_cmd`: inspecting and validating snapshot files, exporting the built-in defaults
//! - `settings_cmd`: creating store settings files

pub mod settings_cmd;
pub mod snapshot_cmd;
