//! Port for the persisted listing collection.
//!
//! The collection is the catalog's only shared mutable resource. Adapters
//! must serialise writers and publish each mutation atomically: a reader
//! either sees the collection before a write or after it, never a mix.

use async_trait::async_trait;

use crate::domain::{Identity, Listing, ListingId, NewListing};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing store adapters.
    pub enum ListingRepositoryError {
        /// No listing with the given id exists.
        NotFound { id: u64 } => "listing {id} not found",
        /// The collection could not be written.
        Persistence { message: String } => "listing store write failed: {message}",
        /// The stored collection could not be read back.
        Corrupt { message: String } => "listing store is corrupt: {message}",
    }
}

/// Storage for listings.
///
/// `insert` assigns the identifier from a monotonically increasing sequence
/// that survives deletions, so identifiers are never reused.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a new listing and return it with its assigned id.
    async fn insert(&self, listing: NewListing) -> Result<Listing, ListingRepositoryError>;

    /// Fetch a single listing.
    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, ListingRepositoryError>;

    /// Every listing owned by `owner`, in storage order.
    async fn find_by_owner(&self, owner: &Identity)
    -> Result<Vec<Listing>, ListingRepositoryError>;

    /// The whole collection, in storage order.
    async fn scan_all(&self) -> Result<Vec<Listing>, ListingRepositoryError>;

    /// Overwrite the stored listing with the same id.
    ///
    /// Fails with [`ListingRepositoryError::NotFound`] if it has been removed.
    async fn replace(&self, listing: Listing) -> Result<(), ListingRepositoryError>;

    /// Delete a listing permanently.
    async fn remove(&self, id: ListingId) -> Result<(), ListingRepositoryError>;
}

/// Store that holds nothing and accepts nothing.
///
/// Lookups come back empty and every write reports the target as missing,
/// except `insert`, which fails with a persistence error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingRepository;

#[async_trait]
impl ListingRepository for FixtureListingRepository {
    async fn insert(&self, _listing: NewListing) -> Result<Listing, ListingRepositoryError> {
        Err(ListingRepositoryError::persistence("fixture store is read-only"))
    }

    async fn find_by_id(&self, _id: ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        Ok(None)
    }

    async fn find_by_owner(
        &self,
        _owner: &Identity,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(Vec::new())
    }

    async fn scan_all(&self) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(Vec::new())
    }

    async fn replace(&self, listing: Listing) -> Result<(), ListingRepositoryError> {
        Err(ListingRepositoryError::not_found(listing.id().get()))
    }

    async fn remove(&self, id: ListingId) -> Result<(), ListingRepositoryError> {
        Err(ListingRepositoryError::not_found(id.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_lookups_are_empty() {
        let repo = FixtureListingRepository;
        assert!(
            repo.find_by_id(ListingId::new(1))
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(repo.scan_all().await.expect("scan").is_empty());
    }

    #[tokio::test]
    async fn fixture_remove_reports_not_found() {
        let err = FixtureListingRepository
            .remove(ListingId::new(5))
            .await
            .expect_err("nothing to remove");
        assert_eq!(err, ListingRepositoryError::NotFound { id: 5 });
        assert_eq!(err.to_string(), "listing 5 not found");
    }
}
