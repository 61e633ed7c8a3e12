//! Site page configuration store for Easy Life Gangtok.
//!
//! This crate holds the configuration that the admin control center edits for
//! every public page of the site (homepage, about, contact, policy pages, ...).
//! The configuration is a three level tree:
//!
//! ```text
//! ConfigTree  : page name    -> PageConfig
//! PageConfig  : section name -> SectionConfig
//! SectionConfig: field name  -> ConfigValue
//! ```
//!
//! The [`PageConfigStore`] owns the live tree and exposes the mutation verbs
//! (`update_field`, `replace_section`, `replace_page`, `reset_to_defaults`)
//! together with synchronous change notification and a broadcast channel for
//! asynchronous consumers such as the [`PersistenceWorker`].
//!
//! # Examples
//!
//! ```rust
//! use page_config::{ConfigTree, PageConfig, PageConfigStore, SectionConfig, StoreSettings};
//!
//! let initial = ConfigTree::new().with_page(
//!     "homepage",
//!     PageConfig::new().with_section(
//!         "hero",
//!         SectionConfig::new()
//!             .with_field("title", "Old")
//!             .with_field("subtitle", "X"),
//!     ),
//! );
//!
//! let store = PageConfigStore::new(initial, StoreSettings::default());
//! store.update_field("homepage", "hero", "title", "New")?;
//!
//! let hero = store.get_section("homepage", "hero")?;
//! assert_eq!(hero.get("title").and_then(|v| v.as_str()), Some("New"));
//! assert_eq!(hero.get("subtitle").and_then(|v| v.as_str()), Some("X"));
//! # Ok::<(), page_config::PageConfigError>(())
//! ```

// Value and tree model
pub mod path;
pub mod tree;
pub mod value;

// Store and notifications
pub mod notifications;
pub mod store;

// Collaborators
pub mod loader;
pub mod persistence;
pub mod settings;
pub mod site_defaults;

pub mod errors;

// Re-export for convenient access
pub use errors::{PageConfigError, PageConfigResult};
pub use loader::{load_snapshot, parse_snapshot, SnapshotFormat};
pub use notifications::{
    ChangeFilter, ChangeScope, ConfigChange, ConfigChangeListener, SubscriptionId,
};
pub use path::{ConfigPath, PathSegment};
pub use persistence::{
    ConfigPersistence, InMemoryPersistence, JsonFilePersistence, PersistenceWorker,
};
pub use settings::{MissingPathPolicy, StoreSettings};
pub use site_defaults::site_defaults;
pub use store::PageConfigStore;
pub use tree::{ConfigTree, PageConfig, SectionConfig};
pub use value::ConfigValue;
