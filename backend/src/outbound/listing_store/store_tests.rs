//! Tests for the snapshot listing store and its sinks.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{TimeZone, Utc};
use futures::FutureExt;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::domain::{CountryCode, ListingDetails, ListingDraft};

fn draft(title: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_owned(),
        description: "Lightly used".to_owned(),
        price: "12.5".to_owned(),
        location: "Ankara".to_owned(),
        category: "technology".to_owned(),
        contact_channel: "seller@example.com".to_owned(),
        images: vec!["data:image/png;base64,AAAA".to_owned()],
        sold: None,
    }
}

fn new_listing(title: &str, owner: &str) -> NewListing {
    NewListing {
        details: ListingDetails::from_draft(draft(title), &CountryCode::default())
            .expect("valid draft"),
        owner: Identity::new(owner).expect("identity"),
        created_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp"),
        sold: false,
    }
}

struct TempStore {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl TempStore {
    fn open(&self) -> JsonListingStore {
        JsonListingStore::open(&self.path).expect("open store")
    }
}

#[fixture]
fn temp_store() -> TempStore {
    let dir = TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("data").join("listings.json"))
        .expect("utf8 temp path");
    TempStore { _dir: dir, path }
}

#[rstest]
#[tokio::test]
async fn missing_file_opens_as_empty_catalog(temp_store: TempStore) {
    let store = temp_store.open();
    assert!(store.scan_all().await.expect("scan").is_empty());
    assert_eq!(store.snapshot().await.next_id(), 1);
}

#[rstest]
#[tokio::test]
async fn writes_survive_reopening(temp_store: TempStore) {
    let store = temp_store.open();
    let lamp = store
        .insert(new_listing("Desk Lamp", "alice"))
        .await
        .expect("insert");
    let coat = store
        .insert(new_listing("Winter Coat", "bob"))
        .await
        .expect("insert");
    store
        .replace(coat.clone().with_sold(true))
        .await
        .expect("replace");
    drop(store);

    let reopened = temp_store.open();
    let listings = reopened.scan_all().await.expect("scan");
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0], lamp);
    assert!(listings[1].sold());
    let owned = reopened
        .find_by_owner(&Identity::new("bob").expect("identity"))
        .await
        .expect("owner scan");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id(), coat.id());
}

#[rstest]
#[tokio::test]
async fn sequence_survives_deleting_the_newest_listing(temp_store: TempStore) {
    let store = temp_store.open();
    store
        .insert(new_listing("First", "alice"))
        .await
        .expect("insert");
    let second = store
        .insert(new_listing("Second", "alice"))
        .await
        .expect("insert");
    store.remove(second.id()).await.expect("remove");
    drop(store);

    let reopened = temp_store.open();
    let third = reopened
        .insert(new_listing("Third", "alice"))
        .await
        .expect("insert");
    assert_eq!(third.id(), ListingId::new(3));
    assert!(
        reopened
            .find_by_id(second.id())
            .await
            .expect("lookup")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_are_all_persisted(temp_store: TempStore) {
    let store = Arc::new(temp_store.open());
    let mut tasks = Vec::new();
    for n in 0..16 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store
                .insert(new_listing(&format!("Item {n}"), "alice"))
                .await
                .expect("insert")
                .id()
                .get()
        }));
    }
    let mut ids = BTreeSet::new();
    for task in tasks {
        ids.insert(task.await.expect("join"));
    }
    assert_eq!(ids, (1..=16).collect::<BTreeSet<u64>>());
    drop(store);

    let reopened = temp_store.open();
    assert_eq!(reopened.scan_all().await.expect("scan").len(), 16);
    assert_eq!(reopened.snapshot().await.next_id(), 17);
}

#[rstest]
#[tokio::test]
async fn failed_write_keeps_previous_snapshot(temp_store: TempStore) {
    let store = temp_store.open();
    store
        .insert(new_listing("Kept", "alice"))
        .await
        .expect("insert");
    let parent = temp_store.path.parent().expect("parent");
    std::fs::remove_dir_all(parent).expect("remove data dir");

    let err = store
        .insert(new_listing("Lost", "alice"))
        .await
        .expect_err("directory is gone");
    assert!(matches!(err, ListingRepositoryError::Persistence { .. }));

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.listings().len(), 1);
    assert_eq!(snapshot.next_id(), 2);
}

#[rstest]
#[tokio::test]
async fn abandoned_insert_is_still_published(temp_store: TempStore) {
    let store = temp_store.open();
    let first_poll = store.insert(new_listing("Abandoned", "alice")).now_or_never();
    assert!(first_poll.is_none(), "insert should still be pending");

    let mut published = None;
    for _ in 0..200 {
        published = store.find_by_id(ListingId::new(1)).await.expect("lookup");
        if published.is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(
        published.expect("abandoned insert published").details().title(),
        "Abandoned"
    );

    let next = store
        .insert(new_listing("Next", "bob"))
        .await
        .expect("insert");
    assert_eq!(next.id().get(), 2);

    let titles: BTreeSet<String> = temp_store
        .open()
        .scan_all()
        .await
        .expect("scan")
        .iter()
        .map(|listing| listing.details().title().to_owned())
        .collect();
    assert_eq!(
        titles,
        BTreeSet::from(["Abandoned".to_owned(), "Next".to_owned()])
    );
}

#[rstest]
#[tokio::test]
async fn unsupported_version_is_rejected_on_open(temp_store: TempStore) {
    let parent = temp_store.path.parent().expect("parent");
    std::fs::create_dir_all(parent).expect("create dir");
    std::fs::write(
        &temp_store.path,
        r#"{"version": 7, "nextId": 1, "listings": []}"#,
    )
    .expect("write document");

    let err = JsonListingStore::open(&temp_store.path)
        .err()
        .expect("unknown version");
    assert!(matches!(err, ListingRepositoryError::Corrupt { .. }));
}

#[derive(Default)]
struct ToggleSink {
    failing: AtomicBool,
}

#[async_trait]
impl DocumentSink for ToggleSink {
    async fn persist(&self, _document: &ListingDocument) -> Result<(), ListingRepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ListingRepositoryError::persistence("sink offline"));
        }
        Ok(())
    }
}

#[tokio::test]
async fn rejected_replace_and_remove_leave_snapshot_untouched() {
    let store = ListingStore::with_document(ToggleSink::default(), ListingDocument::default());
    let listing = store
        .insert(new_listing("Desk Lamp", "alice"))
        .await
        .expect("insert");
    store.state.sink.failing.store(true, Ordering::SeqCst);

    store
        .replace(listing.clone().with_sold(true))
        .await
        .expect_err("sink offline");
    store.remove(listing.id()).await.expect_err("sink offline");

    let current = store
        .find_by_id(listing.id())
        .await
        .expect("lookup")
        .expect("still present");
    assert!(!current.sold());
}

#[tokio::test]
async fn in_memory_store_reports_missing_targets() {
    let store = InMemoryListingStore::new();
    let listing = store
        .insert(new_listing("Desk Lamp", "alice"))
        .await
        .expect("insert");
    store.remove(listing.id()).await.expect("remove");

    assert_eq!(
        store.replace(listing.clone()).await,
        Err(ListingRepositoryError::not_found(listing.id().get()))
    );
    assert_eq!(
        store.remove(listing.id()).await,
        Err(ListingRepositoryError::not_found(listing.id().get()))
    );
}
