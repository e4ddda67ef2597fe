//! Domain primitives, services and ports for the listing catalog.
//!
//! Types here are transport agnostic. Inbound adapters translate requests
//! into [`ListingDraft`]s and [`Credentials`]; outbound adapters implement
//! the traits in [`ports`].

pub mod catalog_service;
pub mod error;
pub mod identity;
pub mod listing;
pub mod listing_query;
pub mod ports;
pub mod trace_id;

pub use self::catalog_service::CatalogService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{Credentials, Identity, IdentityValidationError};
pub use self::listing::{
    Category, ContactChannel, ContactKind, ContactValidationError, CountryCode,
    DEFAULT_COUNTRY_CODE, EmptyImage, ImageBlob, Listing, ListingDetails, ListingDetailsParts,
    ListingDraft, ListingId, ListingValidationError, NewListing, Price, PriceValidationError,
    SUBSCRIBER_DIGITS, UnknownCategory, format_phone,
};
pub use self::listing_query::{ListingCriteria, ListingPage, catalog_order, select_listings};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
