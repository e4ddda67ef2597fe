//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **listing_store**: versioned JSON document store with atomic replace
//! - **identity**: identity resolvers for trusted usernames and account
//!   directories
//!
//! Adapters translate between domain types and storage formats. They contain
//! no business rules.

pub mod identity;
pub mod listing_store;
