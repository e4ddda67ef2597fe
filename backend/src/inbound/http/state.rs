//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IdentityResolver, ListingCommand, ListingQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub listings: Arc<dyn ListingCommand>,
    pub listings_query: Arc<dyn ListingQuery>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bazaar_backend::domain::CatalogService;
    /// use bazaar_backend::domain::CountryCode;
    /// use bazaar_backend::domain::ports::FixtureIdentityResolver;
    /// use bazaar_backend::inbound::http::state::HttpState;
    /// use bazaar_backend::outbound::listing_store::InMemoryListingStore;
    /// use mockable::DefaultClock;
    ///
    /// let catalog = Arc::new(CatalogService::new(
    ///     Arc::new(InMemoryListingStore::new()),
    ///     Arc::new(DefaultClock),
    ///     CountryCode::default(),
    /// ));
    /// let state = HttpState::new(catalog.clone(), catalog, Arc::new(FixtureIdentityResolver));
    /// let _query = state.listings_query.clone();
    /// ```
    pub fn new(
        listings: Arc<dyn ListingCommand>,
        listings_query: Arc<dyn ListingQuery>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            listings,
            listings_query,
            identity,
        }
    }
}
