//! Listing store adapters.
//!
//! The catalog is kept as a single versioned JSON document. Every committed
//! mutation rewrites the whole document atomically, and readers work from an
//! immutable in-memory snapshot of the last committed state.

mod atomic_io;
mod document;
mod store;

pub use atomic_io::{AtomicWriteError, write_atomic};
pub use document::{DOCUMENT_VERSION, ListingDocument};
pub use store::{
    DocumentSink, InMemoryListingStore, JsonFileSink, JsonListingStore, ListingStore, MemorySink,
};
