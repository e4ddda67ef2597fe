//! Driving port for catalog reads.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Listing, ListingCriteria, ListingId, ListingPage};

/// Catalog queries. None of these check ownership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingQuery: Send + Sync {
    /// Filter, sort and page the catalog.
    async fn list_listings(&self, criteria: ListingCriteria) -> Result<ListingPage, Error>;

    /// Fetch one listing or fail with `NotFound`.
    async fn get_listing(&self, id: ListingId) -> Result<Listing, Error>;

    /// Every listing owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: Identity) -> Result<Vec<Listing>, Error>;
}
