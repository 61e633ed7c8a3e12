//! HTTP request type definitions
//!
//! Whole-page and whole-section replacements take the domain types
//! (`PageConfig`, `SectionConfig`) directly as the request body, since their
//! JSON form is already the plain nested object the admin screens send.

use page_config::ConfigValue;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// HTTP request to set a single field.
///
/// # Example
///
/// ```json
/// {
///   "value": ["food", "vehicles", "electronics"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFieldRequest {
    /// New value of the field; any JSON value
    pub value: ConfigValue,
}
