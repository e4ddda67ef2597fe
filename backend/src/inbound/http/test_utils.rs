//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::ports::{FixtureIdentityResolver, IdentityResolver};
use crate::domain::{CatalogService, CountryCode};
use crate::outbound::listing_store::InMemoryListingStore;
use crate::test_support::clock::SteppingClock;

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// State over an empty in-memory catalog with a stepping clock.
pub fn in_memory_state(identity: Arc<dyn IdentityResolver>) -> HttpState {
    let catalog = Arc::new(CatalogService::new(
        Arc::new(InMemoryListingStore::new()),
        Arc::new(SteppingClock::per_minute()),
        CountryCode::default(),
    ));
    HttpState::new(catalog.clone(), catalog, identity)
}

/// State whose resolver accepts the fixture users `alice` and `bob`.
pub fn fixture_state() -> HttpState {
    in_memory_state(Arc::new(FixtureIdentityResolver))
}

/// Register the `/api/v1` routes over `state`, mirroring the server layout.
pub fn configure_api(state: HttpState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(super::error::json_config())
            .app_data(super::error::query_config())
            .app_data(super::error::path_config())
            .service(web::scope("/api/v1").configure(super::configure_routes));
    }
}
