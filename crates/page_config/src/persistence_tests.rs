use super::*;
use crate::notifications::{ChangeFilter, ConfigChange};
use crate::settings::StoreSettings;
use crate::tree::{PageConfig, SectionConfig};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn sample_tree() -> ConfigTree {
    ConfigTree::new().with_page(
        "homepage",
        PageConfig::new().with_section(
            "hero",
            SectionConfig::new()
                .with_field("title", "Old")
                .with_field("subtitle", "X"),
        ),
    )
}

/// Always fails to save.
struct FailingPersistence;

#[async_trait]
impl ConfigPersistence for FailingPersistence {
    async fn load(&self) -> PageConfigResult<Option<ConfigTree>> {
        Ok(None)
    }

    async fn save(&self, _tree: &ConfigTree) -> PageConfigResult<()> {
        Err(PageConfigError::PersistenceFailed {
            reason: "disk full".to_string(),
        })
    }
}

async fn wait_for_saves(persistence: &InMemoryPersistence, count: usize) {
    for _ in 0..100 {
        if persistence.save_count() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} saves, saw {}",
        count,
        persistence.save_count()
    );
}

#[tokio::test]
async fn test_json_file_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let persistence = JsonFilePersistence::new(temp_dir.path().join("state.json"));

    assert_eq!(persistence.load().await.unwrap(), None);

    persistence.save(&sample_tree()).await.unwrap();
    let loaded = persistence.load().await.unwrap();

    assert_eq!(loaded, Some(sample_tree()));
    assert!(!temp_dir.path().join("state.json.tmp").exists());
}

#[tokio::test]
async fn test_json_file_load_corrupt_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("state.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let result = JsonFilePersistence::new(&path).load().await;

    assert!(matches!(result, Err(PageConfigError::ParseError { .. })));
}

#[tokio::test]
async fn test_worker_saves_each_change() {
    let store = Arc::new(PageConfigStore::new(sample_tree(), StoreSettings::default()));
    let persistence = Arc::new(InMemoryPersistence::new());
    let _worker = PersistenceWorker::spawn(&store, persistence.clone());

    store.update_field("homepage", "hero", "title", "New").unwrap();
    store
        .replace_section("homepage", "hotDeals", SectionConfig::new().with_field("enabled", true))
        .unwrap();

    wait_for_saves(&persistence, 2).await;
    let saved = persistence.saved().unwrap();
    assert_eq!(*store.snapshot(), saved);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_saved_tree_matches_live_tree_after_overlapping_commits() {
    let store = Arc::new(PageConfigStore::new(sample_tree(), StoreSettings::default()));
    let persistence = Arc::new(InMemoryPersistence::new());
    let _worker = PersistenceWorker::spawn(&store, persistence.clone());

    // The listener for the first change stalls until a second writer has
    // committed, so the two calls overlap.
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let started_tx = Mutex::new(started_tx);
    let release_rx = Mutex::new(release_rx);
    store.subscribe(ChangeFilter::All, move |change: &ConfigChange| {
        if change.sequence == 1 {
            let _ = started_tx.lock().unwrap().send(());
            let _ = release_rx
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5));
        }
    });

    let first_writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            store.update_field("homepage", "hero", "title", "A").unwrap();
        })
    };
    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    store.update_field("homepage", "hero", "subtitle", "B").unwrap();
    release_tx.send(()).unwrap();
    first_writer.join().unwrap();

    wait_for_saves(&persistence, 2).await;
    let live = store.snapshot();
    assert_eq!(live.field("homepage", "hero", "title"), Some(&"A".into()));
    assert_eq!(live.field("homepage", "hero", "subtitle"), Some(&"B".into()));
    assert_eq!(persistence.saved().unwrap(), *live);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_saved_tree_matches_live_tree_with_concurrent_writers() {
    let store = Arc::new(PageConfigStore::new(sample_tree(), StoreSettings::default()));
    let persistence = Arc::new(InMemoryPersistence::new());
    let _worker = PersistenceWorker::spawn(&store, persistence.clone());

    let writers: Vec<_> = (0..4)
        .map(|writer| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..20 {
                    store
                        .update_field(
                            "homepage",
                            "hero",
                            &format!("writer{}", writer),
                            round as i64,
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let live = store.snapshot();
    for _ in 0..200 {
        if persistence.saved().as_ref() == Some(&*live) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(store.sequence(), 80);
    assert_eq!(persistence.saved().unwrap(), *live);
}

#[tokio::test]
async fn test_lagging_worker_saves_latest_tree_once() {
    let settings = StoreSettings {
        change_channel_capacity: 1,
        ..StoreSettings::default()
    };
    let store = Arc::new(PageConfigStore::new(sample_tree(), settings));
    let persistence = Arc::new(InMemoryPersistence::new());
    let _worker = PersistenceWorker::spawn(&store, persistence.clone());

    // The worker does not run until this task yields, so it falls behind.
    for round in 0..5 {
        store
            .update_field("homepage", "hero", "title", format!("v{}", round))
            .unwrap();
    }

    wait_for_saves(&persistence, 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(persistence.save_count(), 1);
    assert_eq!(persistence.saved().unwrap(), *store.snapshot());
}

#[tokio::test]
async fn test_worker_drains_pending_changes_after_store_dropped() {
    let store = Arc::new(PageConfigStore::new(sample_tree(), StoreSettings::default()));
    let persistence = Arc::new(InMemoryPersistence::new());
    let worker = PersistenceWorker::spawn(&store, persistence.clone());

    store.update_field("homepage", "hero", "title", "First").unwrap();
    store.update_field("homepage", "hero", "title", "Last").unwrap();
    drop(store);

    tokio::time::timeout(Duration::from_secs(1), worker)
        .await
        .expect("worker should stop")
        .expect("worker should not panic");

    let saved = persistence.saved().unwrap();
    assert_eq!(saved.field("homepage", "hero", "title"), Some(&"Last".into()));
    assert_eq!(persistence.save_count(), 2);
}

#[tokio::test]
async fn test_failed_save_keeps_in_memory_change() {
    let store = Arc::new(PageConfigStore::new(sample_tree(), StoreSettings::default()));
    let _worker = PersistenceWorker::spawn(&store, Arc::new(FailingPersistence));

    store.update_field("homepage", "hero", "title", "Kept").unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(
        store.get_field("homepage", "hero", "title").unwrap(),
        Some("Kept".into())
    );
}

#[tokio::test]
async fn test_worker_stops_when_store_dropped() {
    let store = Arc::new(PageConfigStore::new(sample_tree(), StoreSettings::default()));
    let worker = PersistenceWorker::spawn(&store, Arc::new(InMemoryPersistence::new()));

    drop(store);

    tokio::time::timeout(Duration::from_secs(1), worker)
        .await
        .expect("worker should stop")
        .expect("worker should not panic");
}

#[tokio::test]
async fn test_in_memory_with_saved() {
    let persistence = InMemoryPersistence::with_saved(sample_tree());

    assert_eq!(persistence.load().await.unwrap(), Some(sample_tree()));
    assert_eq!(persistence.save_count(), 0);
}
