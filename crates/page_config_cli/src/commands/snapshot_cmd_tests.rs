//! Tests for snapshot commands.

use super::*;
use page_config::{ConfigValue, PageConfigError, PathSegment};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_snapshot(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const SNAPSHOT: &str = r#"{
    "about": {
        "hero": { "title": "About Us" },
        "mission": { "content": "Help Gangtok" }
    },
    "support": {}
}"#;

#[test]
fn test_validate_lists_pages_and_sections() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "site.json", SNAPSHOT);

    let output = validate(&path).unwrap();

    assert!(output.contains("VALID"));
    assert!(output.contains("2 pages, 2 sections"));
    assert!(output.contains("hero, mission"));
    assert!(output.contains("(no sections)"));
}

#[test]
fn test_validate_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "site.json", r#"{ "about": "oops" }"#);

    let result = validate(&path);

    assert!(matches!(
        result,
        Err(Error::Config(PageConfigError::ParseError { .. }))
    ));
}

#[test]
fn test_validate_reports_missing_file() {
    let dir = TempDir::new().unwrap();

    let result = validate(&dir.path().join("absent.toml"));

    assert!(matches!(
        result,
        Err(Error::Config(PageConfigError::FileNotFound { .. }))
    ));
}

#[test]
fn test_show_whole_tree() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "site.json", SNAPSHOT);

    let output = show(&path, None, None).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["about"]["hero"]["title"], "About Us");
}

#[test]
fn test_show_single_section() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "site.json", SNAPSHOT);

    let output = show(&path, Some("about"), Some("mission")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json, serde_json::json!({ "content": "Help Gangtok" }));
}

#[test]
fn test_show_missing_page() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "site.json", SNAPSHOT);

    let result = show(&path, Some("blog"), None);

    match result {
        Err(Error::Config(PageConfigError::PathNotFound { missing, .. })) => {
            assert_eq!(missing, PathSegment::Page)
        }
        other => panic!("expected PathNotFound, got {:?}", other),
    }
}

#[test]
fn test_show_section_without_page_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "site.json", SNAPSHOT);

    let result = show(&path, None, Some("hero"));

    assert!(matches!(result, Err(Error::InvalidArguments(_))));
}

#[test]
fn test_defaults_printed_as_json() {
    let output = defaults(None).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["homepage"]["hotDeals"]["maxDeals"], 6);
}

#[test]
fn test_defaults_written_as_toml_load_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defaults.toml");

    let message = defaults(Some(&path)).unwrap();
    let tree = load_snapshot(&path).unwrap();

    assert!(message.contains("6 pages"));
    assert_eq!(
        tree.field("homepage", "hero", "showSearch"),
        Some(&ConfigValue::Bool(true))
    );
    assert_eq!(tree, site_defaults());
}
