//! The live page configuration store.
//!
//! # Consistency
//!
//! The current tree is an `Arc<ConfigTree>` behind a `RwLock`. A mutation takes
//! the write lock, builds the next tree from the current one (copying only the
//! page and section it touches), swaps it in and releases the lock before
//! listeners run. Writers are therefore serialized: two concurrent
//! `update_field` calls on different fields of one section both land. Readers
//! never observe a partially applied mutation, and once a mutation call returns
//! every later read sees its result.
//!
//! Listeners are called without any store lock held, so they may read the
//! store, subscribe or unsubscribe, and even issue further mutations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, info, instrument, trace};

use crate::{
    errors::{PageConfigError, PageConfigResult},
    notifications::{ChangeFilter, ChangeScope, ConfigChange, ConfigChangeListener, SubscriptionId},
    path::{ConfigPath, PathSegment},
    settings::{MissingPathPolicy, StoreSettings},
    tree::{ConfigTree, PageConfig, SectionConfig},
    value::ConfigValue,
};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

struct Registration {
    id: SubscriptionId,
    filter: ChangeFilter,
    listener: Arc<dyn ConfigChangeListener>,
}

/// In-memory store for the site's page configuration tree.
///
/// Build one at application start and share it as `Arc<PageConfigStore>` with
/// every consumer that needs it.
///
/// # Examples
///
/// ```rust
/// use page_config::{ChangeFilter, PageConfigStore, StoreSettings, site_defaults};
/// use std::sync::{Arc, Mutex};
///
/// let store = PageConfigStore::new(site_defaults(), StoreSettings::default());
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// store.subscribe(ChangeFilter::page("homepage"), move |change: &page_config::ConfigChange| {
///     sink.lock().unwrap().push(change.scope.to_string());
/// });
///
/// store.update_field("homepage", "hero", "title", "Welcome to Gangtok")?;
/// assert_eq!(seen.lock().unwrap().as_slice(), ["homepage.hero.title"]);
/// # Ok::<(), page_config::PageConfigError>(())
/// ```
pub struct PageConfigStore {
    tree: RwLock<Arc<ConfigTree>>,
    initial: Arc<ConfigTree>,
    settings: StoreSettings,
    sequence: AtomicU64,
    listeners: RwLock<Vec<Registration>>,
    next_subscription: AtomicU64,
    changes: broadcast::Sender<ConfigChange>,
}

impl PageConfigStore {
    /// Create a store holding `initial`.
    ///
    /// The snapshot is accepted as is; it is also retained for
    /// [`reset_to_initial`](Self::reset_to_initial).
    pub fn new(initial: ConfigTree, settings: StoreSettings) -> Self {
        let (changes, _) = broadcast::channel(settings.change_channel_capacity.max(1));
        let initial = Arc::new(initial);

        debug!(
            pages = initial.len(),
            sections = initial.section_count(),
            policy = ?settings.missing_paths,
            "Page configuration store created"
        );

        Self {
            tree: RwLock::new(Arc::clone(&initial)),
            initial,
            settings,
            sequence: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            changes,
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// The snapshot the store was constructed with.
    pub fn initial_snapshot(&self) -> Arc<ConfigTree> {
        Arc::clone(&self.initial)
    }

    /// Number of mutations committed so far.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    // ----------------------------------------------------------------------------------------
    // Reads
    // ----------------------------------------------------------------------------------------

    /// The current tree.
    pub fn snapshot(&self) -> Arc<ConfigTree> {
        self.tree
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current tree together with the sequence number of the change that
    /// produced it.
    pub fn versioned_snapshot(&self) -> (u64, Arc<ConfigTree>) {
        let current = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        (self.sequence(), current.clone())
    }

    /// The current configuration of one page.
    ///
    /// # Errors
    ///
    /// Returns `PageConfigError::PathNotFound` if the page does not exist.
    pub fn get_page(&self, page: &str) -> PageConfigResult<Arc<PageConfig>> {
        self.snapshot().page(page).cloned().ok_or_else(|| {
            PageConfigError::path_not_found(ConfigPath::page(page), PathSegment::Page)
        })
    }

    /// The current configuration of one section.
    ///
    /// # Errors
    ///
    /// Returns `PageConfigError::PathNotFound` naming the first missing segment.
    pub fn get_section(&self, page: &str, section: &str) -> PageConfigResult<Arc<SectionConfig>> {
        let page_config = self.get_page(page).map_err(|_| {
            PageConfigError::path_not_found(ConfigPath::section(page, section), PathSegment::Page)
        })?;

        page_config.section(section).cloned().ok_or_else(|| {
            PageConfigError::path_not_found(
                ConfigPath::section(page, section),
                PathSegment::Section,
            )
        })
    }

    /// Current value of one field, `None` if the field is unset.
    ///
    /// # Errors
    ///
    /// Returns `PageConfigError::PathNotFound` if the page or section is missing.
    pub fn get_field(
        &self,
        page: &str,
        section: &str,
        field: &str,
    ) -> PageConfigResult<Option<ConfigValue>> {
        Ok(self.get_section(page, section)?.get(field).cloned())
    }

    /// Sorted names of all pages.
    pub fn page_names(&self) -> Vec<String> {
        self.snapshot().page_names().map(str::to_string).collect()
    }

    // ----------------------------------------------------------------------------------------
    // Mutations
    // ----------------------------------------------------------------------------------------

    /// Set `tree[page][section][field] = value`, leaving every sibling untouched.
    ///
    /// Returns the tree as of this change.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for empty names, over-deep or non-finite values
    /// - `PathNotFound` for a missing page or section under the strict policy
    #[instrument(level = "trace", skip(self, value))]
    pub fn update_field(
        &self,
        page: &str,
        section: &str,
        field: &str,
        value: impl Into<ConfigValue>,
    ) -> PageConfigResult<Arc<ConfigTree>> {
        let value = value.into();
        let path = ConfigPath::field(page, section, field);
        validate_names(&path)?;
        self.validate_value(&path, &value)?;

        let auto_create = self.auto_create();
        let scope = ChangeScope::Field {
            page: page.to_string(),
            section: section.to_string(),
            field: field.to_string(),
        };

        self.commit(scope, |tree| {
            let page_config = if auto_create {
                tree.page_entry(page)
            } else {
                tree.page_mut(page).ok_or_else(|| {
                    PageConfigError::path_not_found(path.clone(), PathSegment::Page)
                })?
            };

            let section_config = if auto_create {
                page_config.section_entry(section)
            } else {
                page_config.section_mut(section).ok_or_else(|| {
                    PageConfigError::path_not_found(path.clone(), PathSegment::Section)
                })?
            };

            section_config.insert(field, value);
            Ok(())
        })
    }

    /// Set `tree[page][section] = data` verbatim; fields absent from `data` are dropped.
    ///
    /// The section itself may be new. Under the strict policy the page must exist.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for empty names or invalid field values
    /// - `PathNotFound` for a missing page under the strict policy
    #[instrument(level = "trace", skip(self, data))]
    pub fn replace_section(
        &self,
        page: &str,
        section: &str,
        data: SectionConfig,
    ) -> PageConfigResult<Arc<ConfigTree>> {
        let path = ConfigPath::section(page, section);
        validate_names(&path)?;
        self.validate_section(page, section, &data)?;

        let auto_create = self.auto_create();
        let scope = ChangeScope::Section {
            page: page.to_string(),
            section: section.to_string(),
        };

        self.commit(scope, |tree| {
            let page_config = if auto_create {
                tree.page_entry(page)
            } else {
                tree.page_mut(page).ok_or_else(|| {
                    PageConfigError::path_not_found(path.clone(), PathSegment::Page)
                })?
            };

            page_config.insert_section(section, data);
            Ok(())
        })
    }

    /// Set `tree[page] = data` verbatim; sections absent from `data` are dropped.
    ///
    /// This is how new pages are introduced, so an unknown page is never an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for an empty page name or invalid section contents.
    #[instrument(level = "trace", skip(self, data))]
    pub fn replace_page(&self, page: &str, data: PageConfig) -> PageConfigResult<Arc<ConfigTree>> {
        validate_names(&ConfigPath::page(page))?;
        for (section, section_config) in data.iter() {
            validate_names(&ConfigPath::section(page, section))?;
            self.validate_section(page, section, section_config)?;
        }

        let scope = ChangeScope::Page {
            page: page.to_string(),
        };

        self.commit(scope, |tree| {
            tree.insert_page(page, data);
            Ok(())
        })
    }

    /// Replace the whole live tree with `snapshot`, discarding all prior mutations.
    ///
    /// The live tree and `snapshot` stay independent afterwards: later
    /// mutations of either one are never visible through the other.
    pub fn reset_to_defaults(&self, snapshot: &ConfigTree) -> PageConfigResult<Arc<ConfigTree>> {
        let previous_sequence = self.sequence();
        let tree = self.commit(ChangeScope::All, |tree| {
            *tree = snapshot.clone();
            Ok(())
        })?;

        info!(
            pages = tree.len(),
            previous_sequence,
            "Page configuration reset to defaults"
        );
        Ok(tree)
    }

    /// Reset to the snapshot the store was constructed with.
    pub fn reset_to_initial(&self) -> PageConfigResult<Arc<ConfigTree>> {
        let initial = Arc::clone(&self.initial);
        self.reset_to_defaults(&initial)
    }

    // ----------------------------------------------------------------------------------------
    // Subscriptions
    // ----------------------------------------------------------------------------------------

    /// Register a synchronous listener for changes matching `filter`.
    pub fn subscribe(
        &self,
        filter: ChangeFilter,
        listener: impl ConfigChangeListener + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        debug!(%id, ?filter, "Listener subscribed");

        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                id,
                filter,
                listener: Arc::new(listener),
            });
        id
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|registration| registration.id != id);
        let removed = listeners.len() != before;

        debug!(%id, removed, "Listener unsubscribed");
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Receive every committed change asynchronously.
    ///
    /// A receiver that falls more than `change_channel_capacity` changes behind
    /// gets `RecvError::Lagged` and should re-read [`snapshot`](Self::snapshot).
    pub fn watch(&self) -> broadcast::Receiver<ConfigChange> {
        self.changes.subscribe()
    }

    // ----------------------------------------------------------------------------------------
    // Internals
    // ----------------------------------------------------------------------------------------

    fn auto_create(&self) -> bool {
        self.settings.missing_paths == MissingPathPolicy::AutoCreate
    }

    fn validate_value(&self, path: &ConfigPath, value: &ConfigValue) -> PageConfigResult<()> {
        let depth = value.depth();
        if depth > self.settings.max_value_depth {
            return Err(PageConfigError::invalid_value(
                path.clone(),
                format!(
                    "nesting depth {} exceeds the limit of {}",
                    depth, self.settings.max_value_depth
                ),
            ));
        }

        if !value.is_finite() {
            return Err(PageConfigError::invalid_value(
                path.clone(),
                "non-finite numbers cannot be stored",
            ));
        }

        Ok(())
    }

    fn validate_section(
        &self,
        page: &str,
        section: &str,
        data: &SectionConfig,
    ) -> PageConfigResult<()> {
        for (field, value) in data.iter() {
            let path = ConfigPath::field(page, section, field);
            validate_names(&path)?;
            self.validate_value(&path, value)?;
        }
        Ok(())
    }

    /// Apply `mutate` to a copy of the current tree and publish the result.
    ///
    /// Nothing is committed or published if `mutate` fails. The change is
    /// broadcast before the write lock is released, so watchers receive
    /// changes in sequence order.
    fn commit<F>(&self, scope: ChangeScope, mutate: F) -> PageConfigResult<Arc<ConfigTree>>
    where
        F: FnOnce(&mut ConfigTree) -> PageConfigResult<()>,
    {
        let change = {
            let mut current = self.tree.write().unwrap_or_else(PoisonError::into_inner);

            let mut next = ConfigTree::clone(&current);
            mutate(&mut next)?;

            let next = Arc::new(next);
            *current = Arc::clone(&next);
            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

            let change = ConfigChange {
                sequence,
                scope,
                snapshot: next,
            };

            // No receivers is fine; nobody is watching asynchronously.
            let _ = self.changes.send(change.clone());
            change
        };

        debug!(sequence = change.sequence, scope = %change.scope, "Configuration change committed");
        self.notify_listeners(&change);

        Ok(change.snapshot)
    }

    fn notify_listeners(&self, change: &ConfigChange) {
        let targets: Vec<Arc<dyn ConfigChangeListener>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|registration| registration.filter.matches(&change.scope))
            .map(|registration| Arc::clone(&registration.listener))
            .collect();

        trace!(
            sequence = change.sequence,
            listeners = targets.len(),
            "Notifying listeners"
        );
        for listener in targets {
            listener.on_change(change);
        }
    }
}

impl std::fmt::Debug for PageConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageConfigStore")
            .field("settings", &self.settings)
            .field("sequence", &self.sequence())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

fn validate_names(path: &ConfigPath) -> PageConfigResult<()> {
    let names = [
        ("page", Some(path.page.as_str())),
        ("section", path.section.as_deref()),
        ("field", path.field.as_deref()),
    ];

    for (segment, name) in names {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(PageConfigError::invalid_value(
                    path.clone(),
                    format!("{} name must not be empty", segment),
                ));
            }
        }
    }
    Ok(())
}
