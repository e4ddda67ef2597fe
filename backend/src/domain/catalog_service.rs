//! Catalog service implementing the listing command and query ports.
//!
//! Validation and ownership checks happen here, before the store is asked to
//! write anything. The owner of a listing never changes, so checking it on a
//! fetched copy and then replacing is safe under concurrent writers.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::listing_query::{catalog_order, select_listings};
use crate::domain::ports::{
    CreateListingRequest, DeleteListingRequest, ListingCommand, ListingQuery, ListingRepository,
    ListingRepositoryError, MarkSoldRequest, UpdateListingRequest,
};
use crate::domain::{
    CountryCode, Error, Identity, Listing, ListingCriteria, ListingDetails, ListingDraft, ListingId,
    ListingPage, ListingValidationError, NewListing,
};

fn map_repository_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::NotFound { id } => {
            Error::not_found(format!("listing {id} not found"))
        }
        ListingRepositoryError::Persistence { message } => {
            error!(%message, "listing store write failed");
            Error::internal(format!("listing store write failed: {message}"))
        }
        ListingRepositoryError::Corrupt { message } => {
            error!(%message, "listing store is corrupt");
            Error::internal(format!("listing store is corrupt: {message}"))
        }
    }
}

fn map_validation_error(error: &ListingValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

/// Listing service backed by a [`ListingRepository`].
#[derive(Clone)]
pub struct CatalogService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    default_country_code: CountryCode,
}

impl<R> CatalogService<R> {
    /// Create a service that stamps listings with `clock` and normalises
    /// phone numbers without a country code to `default_country_code`.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use bazaar_backend::domain::{CatalogService, CountryCode};
    /// # use bazaar_backend::domain::ports::FixtureListingRepository;
    /// # use mockable::DefaultClock;
    /// let service = CatalogService::new(
    ///     Arc::new(FixtureListingRepository),
    ///     Arc::new(DefaultClock),
    ///     CountryCode::default(),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        default_country_code: CountryCode,
    ) -> Self {
        Self {
            repository,
            clock,
            default_country_code,
        }
    }
}

impl<R> CatalogService<R>
where
    R: ListingRepository,
{
    async fn fetch(&self, id: ListingId) -> Result<Listing, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("listing {id} not found")))
    }

    async fn fetch_owned(&self, id: ListingId, actor: &Identity) -> Result<Listing, Error> {
        let listing = self.fetch(id).await?;
        if !listing.is_owned_by(actor) {
            warn!(
                listing_id = %id,
                actor = %actor,
                owner = %listing.owner(),
                "rejected mutation by non-owner"
            );
            return Err(Error::forbidden(format!(
                "listing {id} belongs to another user"
            )));
        }
        Ok(listing)
    }

    fn validate(&self, draft: ListingDraft) -> Result<ListingDetails, Error> {
        ListingDetails::from_draft(draft, &self.default_country_code)
            .map_err(|err| map_validation_error(&err))
    }
}

#[async_trait]
impl<R> ListingCommand for CatalogService<R>
where
    R: ListingRepository,
{
    async fn create_listing(&self, request: CreateListingRequest) -> Result<Listing, Error> {
        let CreateListingRequest { draft, actor } = request;
        let sold = draft.sold.unwrap_or(false);
        let details = self.validate(draft)?;
        let listing = self
            .repository
            .insert(NewListing {
                details,
                owner: actor,
                created_at: self.clock.utc(),
                sold,
            })
            .await
            .map_err(map_repository_error)?;
        info!(listing_id = %listing.id(), owner = %listing.owner(), "listing created");
        Ok(listing)
    }

    async fn update_listing(&self, request: UpdateListingRequest) -> Result<Listing, Error> {
        let UpdateListingRequest { id, draft, actor } = request;
        let current = self.fetch_owned(id, &actor).await?;
        let sold = draft.sold.unwrap_or(current.sold());
        let details = self.validate(draft)?;
        let updated = current.with_details(details).with_sold(sold);
        self.repository
            .replace(updated.clone())
            .await
            .map_err(map_repository_error)?;
        info!(listing_id = %id, actor = %actor, "listing updated");
        Ok(updated)
    }

    async fn mark_sold(&self, request: MarkSoldRequest) -> Result<Listing, Error> {
        let MarkSoldRequest { id, sold, actor } = request;
        let updated = self.fetch_owned(id, &actor).await?.with_sold(sold);
        self.repository
            .replace(updated.clone())
            .await
            .map_err(map_repository_error)?;
        info!(listing_id = %id, actor = %actor, sold, "listing sold flag changed");
        Ok(updated)
    }

    async fn delete_listing(&self, request: DeleteListingRequest) -> Result<(), Error> {
        let DeleteListingRequest { id, actor } = request;
        self.fetch_owned(id, &actor).await?;
        self.repository
            .remove(id)
            .await
            .map_err(map_repository_error)?;
        info!(listing_id = %id, actor = %actor, "listing deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> ListingQuery for CatalogService<R>
where
    R: ListingRepository,
{
    async fn list_listings(&self, criteria: ListingCriteria) -> Result<ListingPage, Error> {
        let listings = self
            .repository
            .scan_all()
            .await
            .map_err(map_repository_error)?;
        Ok(select_listings(listings, &criteria))
    }

    async fn get_listing(&self, id: ListingId) -> Result<Listing, Error> {
        self.fetch(id).await
    }

    async fn list_by_owner(&self, owner: Identity) -> Result<Vec<Listing>, Error> {
        let mut listings = self
            .repository
            .find_by_owner(&owner)
            .await
            .map_err(map_repository_error)?;
        listings.sort_by(catalog_order);
        Ok(listings)
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
