//! Snapshot-based listing store.
//!
//! Readers clone an `Arc` to the current [`ListingDocument`] and never wait on
//! disk I/O. Writers queue on a single mutex, derive the next document, hand
//! it to a [`DocumentSink`] and only publish it once the sink reports success.
//! A failed write therefore leaves both the published snapshot and the backing
//! file exactly as they were.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{Identity, Listing, ListingId, NewListing};

use super::atomic_io::write_atomic;
use super::document::ListingDocument;

/// Destination for committed documents.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Durably record `document`, or fail without side effects.
    async fn persist(&self, document: &ListingDocument) -> Result<(), ListingRepositoryError>;
}

/// Sink that keeps nothing beyond the in-memory snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemorySink;

#[async_trait]
impl DocumentSink for MemorySink {
    async fn persist(&self, _document: &ListingDocument) -> Result<(), ListingRepositoryError> {
        Ok(())
    }
}

/// Sink writing the document as JSON through an atomic replace.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: Arc<Dir>,
    file_name: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl JsonFileSink {
    /// Open the directory holding `path`, creating it if needed.
    pub fn open(path: &Utf8Path) -> Result<Self, ListingRepositoryError> {
        let file_name = path.file_name().ok_or_else(|| {
            ListingRepositoryError::persistence(format!("{path} does not name a file"))
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|err| {
            ListingRepositoryError::persistence(format!("create {parent}: {err}"))
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
            ListingRepositoryError::persistence(format!("open {parent}: {err}"))
        })?;
        Ok(Self {
            dir: Arc::new(dir),
            file_name: Utf8PathBuf::from(file_name),
            path: path.to_path_buf(),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Read the stored document; a missing file is an empty catalog.
    pub fn load(&self) -> Result<ListingDocument, ListingRepositoryError> {
        match self.dir.read_to_string(&self.file_name) {
            Ok(raw) => ListingDocument::from_json(&raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path, "no listing document yet, starting empty");
                Ok(ListingDocument::default())
            }
            Err(err) => Err(ListingRepositoryError::corrupt(format!(
                "read {}: {err}",
                self.path
            ))),
        }
    }
}

#[async_trait]
impl DocumentSink for JsonFileSink {
    async fn persist(&self, document: &ListingDocument) -> Result<(), ListingRepositoryError> {
        let json = document.to_json()?;
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &file_name, json.as_bytes()))
            .await
            .map_err(|err| ListingRepositoryError::persistence(format!("writer task: {err}")))?
            .map_err(|err| ListingRepositoryError::persistence(err.to_string()))?;
        debug!(path = %self.path, listings = document.listings().len(), "listing document written");
        Ok(())
    }
}

struct StoreState<S> {
    sink: S,
    writer: Mutex<()>,
    snapshot: RwLock<Arc<ListingDocument>>,
}

/// Listing store publishing immutable snapshots after each committed write.
pub struct ListingStore<S> {
    state: Arc<StoreState<S>>,
}

/// Store backed by a JSON document on disk.
pub type JsonListingStore = ListingStore<JsonFileSink>;

/// Store that lives only for the lifetime of the process.
pub type InMemoryListingStore = ListingStore<MemorySink>;

impl<S> ListingStore<S> {
    /// Build a store publishing `document` as its first snapshot.
    pub fn with_document(sink: S, document: ListingDocument) -> Self {
        Self {
            state: Arc::new(StoreState {
                sink,
                writer: Mutex::new(()),
                snapshot: RwLock::new(Arc::new(document)),
            }),
        }
    }

    /// Current committed snapshot.
    pub async fn snapshot(&self) -> Arc<ListingDocument> {
        self.state.snapshot().await
    }
}

impl<S> StoreState<S> {
    async fn snapshot(&self) -> Arc<ListingDocument> {
        Arc::clone(&*self.snapshot.read().await)
    }
}

impl<S> StoreState<S>
where
    S: DocumentSink,
{
    async fn apply<T, F>(&self, change: F) -> Result<T, ListingRepositoryError>
    where
        F: FnOnce(&ListingDocument) -> Result<(ListingDocument, T), ListingRepositoryError>,
    {
        let _writer = self.writer.lock().await;
        let current = self.snapshot().await;
        let (next, output) = change(&current)?;
        self.sink.persist(&next).await?;
        *self.snapshot.write().await = Arc::new(next);
        Ok(output)
    }
}

impl JsonListingStore {
    /// Open the document at `path`, starting empty when it does not exist.
    pub fn open(path: &Utf8Path) -> Result<Self, ListingRepositoryError> {
        let sink = JsonFileSink::open(path)?;
        let document = sink.load()?;
        info!(
            path = %sink.path(),
            listings = document.listings().len(),
            next_id = document.next_id(),
            "listing store opened"
        );
        Ok(Self::with_document(sink, document))
    }
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::with_document(MemorySink, ListingDocument::default())
    }
}

impl Default for InMemoryListingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ListingStore<S>
where
    S: DocumentSink + 'static,
{
    /// Apply `change` to the latest snapshot and publish the result.
    ///
    /// The writer lock is held across persistence, so changes are applied
    /// in a single total order and none is lost. The work runs on its own
    /// task: a caller that stops waiting cannot leave a persisted document
    /// unpublished.
    async fn commit<T, F>(&self, change: F) -> Result<T, ListingRepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&ListingDocument) -> Result<(ListingDocument, T), ListingRepositoryError>
            + Send
            + 'static,
    {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move { state.apply(change).await })
            .await
            .map_err(|err| ListingRepositoryError::persistence(format!("commit task: {err}")))?
    }
}

#[async_trait]
impl<S> ListingRepository for ListingStore<S>
where
    S: DocumentSink + 'static,
{
    async fn insert(&self, listing: NewListing) -> Result<Listing, ListingRepositoryError> {
        self.commit(move |document| document.with_inserted(listing))
            .await
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        Ok(self.snapshot().await.find(id).cloned())
    }

    async fn find_by_owner(
        &self,
        owner: &Identity,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(self
            .snapshot()
            .await
            .listings()
            .iter()
            .filter(|listing| listing.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn scan_all(&self) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(self.snapshot().await.listings().to_vec())
    }

    async fn replace(&self, listing: Listing) -> Result<(), ListingRepositoryError> {
        self.commit(move |document| Ok((document.with_replaced(listing)?, ())))
            .await
    }

    async fn remove(&self, id: ListingId) -> Result<(), ListingRepositoryError> {
        self.commit(move |document| Ok((document.with_removed(id)?, ())))
            .await
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
