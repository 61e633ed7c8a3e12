//! Configuration tree types.
//!
//! Pages and sections are held behind [`Arc`] so that a snapshot of the tree is
//! cheap to clone and a mutation only copies the nodes on the path it touches
//! (copy-on-write through [`Arc::make_mut`]). Every untouched page and section
//! of the new tree is pointer-identical to the one in the previous tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::value::ConfigValue;

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;

/// Field name to value mapping for one section of a page.
///
/// # Examples
///
/// ```rust
/// use page_config::SectionConfig;
///
/// let hero = SectionConfig::new()
///     .with_field("title", "Discover Gangtok")
///     .with_field("showSearch", true);
/// assert_eq!(hero.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionConfig {
    fields: BTreeMap<String, ConfigValue>,
}

impl SectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insert.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&ConfigValue> {
        self.fields.get(field)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<ConfigValue> {
        self.fields.remove(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for SectionConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for SectionConfig {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Section name to section mapping for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageConfig {
    sections: BTreeMap<String, Arc<SectionConfig>>,
}

impl PageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insert.
    pub fn with_section(mut self, name: impl Into<String>, section: SectionConfig) -> Self {
        self.insert_section(name, section);
        self
    }

    pub fn section(&self, name: &str) -> Option<&Arc<SectionConfig>> {
        self.sections.get(name)
    }

    /// Mutable access to a section, detaching it from any shared snapshot first.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut SectionConfig> {
        self.sections.get_mut(name).map(Arc::make_mut)
    }

    /// Mutable access to a section, creating an empty one when missing.
    pub fn section_entry(&mut self, name: &str) -> &mut SectionConfig {
        Arc::make_mut(self.sections.entry(name.to_string()).or_default())
    }

    pub fn insert_section(
        &mut self,
        name: impl Into<String>,
        section: SectionConfig,
    ) -> Option<Arc<SectionConfig>> {
        self.sections.insert(name.into(), Arc::new(section))
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Arc<SectionConfig>> {
        self.sections.remove(name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<SectionConfig>)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SectionConfig)> for PageConfig {
    fn from_iter<I: IntoIterator<Item = (K, SectionConfig)>>(iter: I) -> Self {
        Self {
            sections: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Arc::new(v)))
                .collect(),
        }
    }
}

/// Page name to page mapping; the full site configuration.
///
/// The set of page names is open: any string is a legal key.
///
/// # Examples
///
/// ```rust
/// use page_config::{ConfigTree, PageConfig, SectionConfig};
///
/// let tree: ConfigTree = serde_json::from_str(
///     r#"{"homepage": {"hero": {"title": "Old", "subtitle": "X"}}}"#,
/// ).unwrap();
///
/// let title = tree.field("homepage", "hero", "title").and_then(|v| v.as_str());
/// assert_eq!(title, Some("Old"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree {
    pages: BTreeMap<String, Arc<PageConfig>>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insert.
    pub fn with_page(mut self, name: impl Into<String>, page: PageConfig) -> Self {
        self.insert_page(name, page);
        self
    }

    pub fn page(&self, name: &str) -> Option<&Arc<PageConfig>> {
        self.pages.get(name)
    }

    /// Mutable access to a page, detaching it from any shared snapshot first.
    pub fn page_mut(&mut self, name: &str) -> Option<&mut PageConfig> {
        self.pages.get_mut(name).map(Arc::make_mut)
    }

    /// Mutable access to a page, creating an empty one when missing.
    pub fn page_entry(&mut self, name: &str) -> &mut PageConfig {
        Arc::make_mut(self.pages.entry(name.to_string()).or_default())
    }

    pub fn insert_page(&mut self, name: impl Into<String>, page: PageConfig) -> Option<Arc<PageConfig>> {
        self.pages.insert(name.into(), Arc::new(page))
    }

    pub fn remove_page(&mut self, name: &str) -> Option<Arc<PageConfig>> {
        self.pages.remove(name)
    }

    pub fn section(&self, page: &str, section: &str) -> Option<&Arc<SectionConfig>> {
        self.page(page).and_then(|p| p.section(section))
    }

    pub fn field(&self, page: &str, section: &str, field: &str) -> Option<&ConfigValue> {
        self.section(page, section).and_then(|s| s.get(field))
    }

    pub fn contains_page(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Page names in sorted order.
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<PageConfig>)> {
        self.pages.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of sections across all pages.
    pub fn section_count(&self) -> usize {
        self.pages.values().map(|p| p.len()).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, PageConfig)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (K, PageConfig)>>(iter: I) -> Self {
        Self {
            pages: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Arc::new(v)))
                .collect(),
        }
    }
}
