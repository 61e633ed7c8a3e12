//! Change notification types.
//!
//! Every successful mutation of a [`PageConfigStore`](crate::PageConfigStore)
//! produces exactly one [`ConfigChange`]. Synchronous listeners registered with
//! `subscribe` receive it on the mutating thread before the mutation call
//! returns; asynchronous consumers receive it through the broadcast channel
//! returned by `watch`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::tree::ConfigTree;

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;

/// Part of the tree a mutation touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ChangeScope {
    Field {
        page: String,
        section: String,
        field: String,
    },
    Section {
        page: String,
        section: String,
    },
    Page {
        page: String,
    },
    /// Whole tree replaced (reset)
    All,
}

impl ChangeScope {
    /// Page touched by the change; `None` for whole-tree changes.
    pub fn page(&self) -> Option<&str> {
        match self {
            Self::Field { page, .. } | Self::Section { page, .. } | Self::Page { page } => {
                Some(page)
            }
            Self::All => None,
        }
    }

    /// Section touched by the change, if the change is section scoped or narrower.
    pub fn section(&self) -> Option<&str> {
        match self {
            Self::Field { section, .. } | Self::Section { section, .. } => Some(section),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field {
                page,
                section,
                field,
            } => write!(f, "{}.{}.{}", page, section, field),
            Self::Section { page, section } => write!(f, "{}.{}", page, section),
            Self::Page { page } => write!(f, "{}", page),
            Self::All => write!(f, "*"),
        }
    }
}

/// A committed mutation.
#[derive(Debug, Clone)]
pub struct ConfigChange {
    /// Position of this change in the store's commit order, starting at 1
    pub sequence: u64,

    /// What was changed
    pub scope: ChangeScope,

    /// The tree as of this change
    pub snapshot: Arc<ConfigTree>,
}

/// Selects which changes a listener is interested in.
///
/// Whole-tree changes match every filter. A page-scoped change matches filters
/// on any section of that page, because the section may have been replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeFilter {
    All,
    Page(String),
    Section { page: String, section: String },
}

impl ChangeFilter {
    pub fn page(page: impl Into<String>) -> Self {
        Self::Page(page.into())
    }

    pub fn section(page: impl Into<String>, section: impl Into<String>) -> Self {
        Self::Section {
            page: page.into(),
            section: section.into(),
        }
    }

    pub fn matches(&self, scope: &ChangeScope) -> bool {
        match (self, scope) {
            (Self::All, _) | (_, ChangeScope::All) => true,
            (Self::Page(page), scope) => scope.page() == Some(page.as_str()),
            (Self::Section { page, .. }, ChangeScope::Page { page: changed }) => page == changed,
            (Self::Section { page, section }, scope) => {
                scope.page() == Some(page.as_str()) && scope.section() == Some(section.as_str())
            }
        }
    }
}

/// Receiver of synchronous change notifications.
///
/// Implemented for any `Fn(&ConfigChange) + Send + Sync` closure.
pub trait ConfigChangeListener: Send + Sync {
    fn on_change(&self, change: &ConfigChange);
}

impl<F> ConfigChangeListener for F
where
    F: Fn(&ConfigChange) + Send + Sync,
{
    fn on_change(&self, change: &ConfigChange) {
        self(change)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription-{}", self.0)
    }
}
