//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every listing, session and health endpoint together
//! with the request and response bodies they exchange. Swagger UI serves it
//! in debug builds and `openapi-dump` prints it for external tooling.

use crate::domain::ErrorCode;
use crate::inbound::http::listings::{
    ItemResponse, ItemsResponse, ListingBody, ListingResponse, MarkSoldBody, PageResponse,
    SuccessResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the listing catalog API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bazaar listing catalog API",
        description = "Browse, create and manage second-hand listings.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::listings::list_listings,
        crate::inbound::http::listings::get_listing,
        crate::inbound::http::listings::list_owner_listings,
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::listings::update_listing,
        crate::inbound::http::listings::mark_sold,
        crate::inbound::http::listings::delete_listing,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCode,
        LoginRequest,
        ListingBody,
        MarkSoldBody,
        ListingResponse,
        ItemResponse,
        ItemsResponse,
        PageResponse,
        SuccessResponse,
    )),
    tags(
        (name = "listings", description = "Listing catalog operations"),
        (name = "users", description = "Session login and logout"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
