//! HTTP inbound adapter exposing the listing REST endpoints.

pub mod actor;
pub mod error;
pub mod health;
pub mod listings;
mod listings_dto;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// `/listings/{id}/sold` is registered before `/listings/{id}` so the more
/// specific route wins.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::login)
        .service(users::logout)
        .service(listings::list_listings)
        .service(listings::create_listing)
        .service(listings::mark_sold)
        .service(listings::get_listing)
        .service(listings::update_listing)
        .service(listings::delete_listing)
        .service(listings::list_owner_listings);
}
