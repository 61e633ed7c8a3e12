//! Addressing of nodes inside a configuration tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a page, section or field inside a [`ConfigTree`](crate::ConfigTree).
///
/// Renders as a dotted path, e.g. `homepage.hero.title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigPath {
    /// Page name
    pub page: String,

    /// Section name, if the path points at or below a section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Field name, if the path points at a single field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ConfigPath {
    /// Path to a whole page.
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            section: None,
            field: None,
        }
    }

    /// Path to a section of a page.
    pub fn section(page: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            section: Some(section.into()),
            field: None,
        }
    }

    /// Path to a single field.
    pub fn field(
        page: impl Into<String>,
        section: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            page: page.into(),
            section: Some(section.into()),
            field: Some(field.into()),
        }
    }

    /// Name of the given segment of this path, if present.
    pub fn segment(&self, segment: PathSegment) -> Option<&str> {
        match segment {
            PathSegment::Page => Some(self.page.as_str()),
            PathSegment::Section => self.section.as_deref(),
        }
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.page)?;
        if let Some(section) = &self.section {
            write!(f, ".{}", section)?;
        }
        if let Some(field) = &self.field {
            write!(f, ".{}", field)?;
        }
        Ok(())
    }
}

/// Ancestor segment of a path that has to exist before a mutation can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    Page,
    Section,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Page => write!(f, "page"),
            PathSegment::Section => write!(f, "section"),
        }
    }
}
