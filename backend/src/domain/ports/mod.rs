//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_resolver;
mod listing_command;
mod listing_query;
mod listing_repository;

#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{
    FIXTURE_USERNAMES, FixtureIdentityResolver, IdentityResolver, IdentityResolverError,
};
#[cfg(test)]
pub use listing_command::MockListingCommand;
pub use listing_command::{
    CreateListingRequest, DeleteListingRequest, ListingCommand, MarkSoldRequest,
    UpdateListingRequest,
};
#[cfg(test)]
pub use listing_query::MockListingQuery;
pub use listing_query::ListingQuery;
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{
    FixtureListingRepository, ListingRepository, ListingRepositoryError,
};
