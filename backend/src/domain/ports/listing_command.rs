//! Driving port for listing mutations.
//!
//! Every request carries the already-resolved actor. Ownership is checked by
//! the implementation, never by the caller.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Listing, ListingDraft, ListingId};

/// Publish a new listing owned by `actor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateListingRequest {
    pub draft: ListingDraft,
    pub actor: Identity,
}

/// Replace the editable fields of listing `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateListingRequest {
    pub id: ListingId,
    pub draft: ListingDraft,
    pub actor: Identity,
}

/// Set or clear the sold flag of listing `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSoldRequest {
    pub id: ListingId,
    pub sold: bool,
    pub actor: Identity,
}

/// Permanently remove listing `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteListingRequest {
    pub id: ListingId,
    pub actor: Identity,
}

/// Listing mutations.
///
/// Errors use [`crate::domain::ErrorCode`]: `InvalidRequest` for field
/// validation, `NotFound` for missing listings, `Forbidden` when the actor
/// does not own the listing, `InternalError` when the store cannot persist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCommand: Send + Sync {
    /// Validate and persist a new listing.
    async fn create_listing(&self, request: CreateListingRequest) -> Result<Listing, Error>;

    /// Validate and apply an owner's edit.
    async fn update_listing(&self, request: UpdateListingRequest) -> Result<Listing, Error>;

    /// Toggle the sold flag only.
    async fn mark_sold(&self, request: MarkSoldRequest) -> Result<Listing, Error>;

    /// Delete a listing.
    async fn delete_listing(&self, request: DeleteListingRequest) -> Result<(), Error>;
}
