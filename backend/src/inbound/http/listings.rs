//! Listing HTTP handlers.
//!
//! ```text
//! GET    /api/v1/listings?page&pageSize&search&category&includeSold
//! GET    /api/v1/listings/{id}
//! GET    /api/v1/users/{username}/listings
//! POST   /api/v1/listings
//! PUT    /api/v1/listings/{id}
//! PUT    /api/v1/listings/{id}/sold
//! DELETE /api/v1/listings/{id}?actorUsername=
//! ```
//!
//! Handlers translate wire shapes into domain requests and nothing more.
//! Validation, ownership and persistence live behind the listing ports.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};

use crate::domain::ports::{
    CreateListingRequest, DeleteListingRequest, MarkSoldRequest, UpdateListingRequest,
};
use crate::domain::{Identity, ListingCriteria};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::resolve_actor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_category_filter, parse_listing_id, parse_page_request,
};

pub use super::listings_dto::{
    ActorQuery, ItemResponse, ItemsResponse, ListListingsQuery, ListingBody, ListingResponse,
    MarkSoldBody, PageResponse, SuccessResponse,
};

fn criteria_from_query(query: ListListingsQuery) -> ApiResult<ListingCriteria> {
    let page = parse_page_request(query.page, query.page_size)?;
    let mut criteria = ListingCriteria::default()
        .with_page(page)
        .with_include_sold(query.include_sold.unwrap_or(true));
    if let Some(category) = parse_category_filter(query.category.as_deref())? {
        criteria = criteria.with_category(category);
    }
    if let Some(search) = query.search {
        criteria = criteria.with_search_term(search);
    }
    Ok(criteria)
}

/// Browse listings, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    params(ListListingsQuery),
    responses(
        (status = 200, description = "One page of listings", body = PageResponse),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listListings",
    security([])
)]
#[get("/listings")]
pub async fn list_listings(
    state: web::Data<HttpState>,
    query: web::Query<ListListingsQuery>,
) -> ApiResult<web::Json<PageResponse>> {
    let criteria = criteria_from_query(query.into_inner())?;
    let page = state.listings_query.list_listings(criteria).await?;
    Ok(web::Json(page.into()))
}

/// Fetch one listing.
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    params(("id" = u64, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing", body = ItemResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getListing",
    security([])
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItemResponse>> {
    let id = parse_listing_id(&path.into_inner())?;
    let listing = state.listings_query.get_listing(id).await?;
    Ok(web::Json(listing.into()))
}

/// Listings owned by one user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/listings",
    params(("username" = String, Path, description = "Owner username")),
    responses(
        (status = 200, description = "Owner listings", body = ItemsResponse),
        (status = 400, description = "Invalid username", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listListingsByOwner",
    security([])
)]
#[get("/users/{username}/listings")]
pub async fn list_owner_listings(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItemsResponse>> {
    let owner = Identity::new(path.into_inner())
        .map_err(|_| missing_field_error(FieldName::new("username")))?;
    let listings = state.listings_query.list_by_owner(owner).await?;
    Ok(web::Json(listings.into()))
}

/// Publish a new listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/listings",
    request_body = ListingBody,
    params(("X-Actor-Secret" = Option<String>, Header, description = "Secret for ownerUsername")),
    responses(
        (status = 201, description = "Listing created", body = ItemResponse),
        (status = 400, description = "Invalid listing", body = ErrorSchema),
        (status = 401, description = "Unknown caller", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "createListing",
    security(("SessionCookie" = []), ())
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<ListingBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let actor = resolve_actor(
        state.identity.as_ref(),
        &session,
        &request,
        body.claimed_username(),
        "ownerUsername",
    )
    .await?;
    let draft = body.into_draft()?;
    let listing = state
        .listings
        .create_listing(CreateListingRequest { draft, actor })
        .await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(listing)))
}

/// Replace the editable fields of a listing owned by the caller.
#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    request_body = ListingBody,
    params(
        ("id" = u64, Path, description = "Listing identifier"),
        ("X-Actor-Secret" = Option<String>, Header, description = "Secret for actorUsername")
    ),
    responses(
        (status = 200, description = "Listing updated", body = ItemResponse),
        (status = 400, description = "Invalid listing", body = ErrorSchema),
        (status = 401, description = "Unknown caller", body = ErrorSchema),
        (status = 403, description = "Caller does not own the listing", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateListing",
    security(("SessionCookie" = []), ())
)]
#[put("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<ListingBody>,
) -> ApiResult<web::Json<ItemResponse>> {
    let id = parse_listing_id(&path.into_inner())?;
    let body = payload.into_inner();
    let actor = resolve_actor(
        state.identity.as_ref(),
        &session,
        &request,
        body.claimed_username(),
        "actorUsername",
    )
    .await?;
    let draft = body.into_draft()?;
    let listing = state
        .listings
        .update_listing(UpdateListingRequest { id, draft, actor })
        .await?;
    Ok(web::Json(listing.into()))
}

/// Set or clear the sold flag.
#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}/sold",
    request_body = MarkSoldBody,
    params(
        ("id" = u64, Path, description = "Listing identifier"),
        ("X-Actor-Secret" = Option<String>, Header, description = "Secret for actorUsername")
    ),
    responses(
        (status = 200, description = "Sold flag updated", body = ItemResponse),
        (status = 401, description = "Unknown caller", body = ErrorSchema),
        (status = 403, description = "Caller does not own the listing", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "markSold",
    security(("SessionCookie" = []), ())
)]
#[put("/listings/{id}/sold")]
pub async fn mark_sold(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<MarkSoldBody>,
) -> ApiResult<web::Json<ItemResponse>> {
    let id = parse_listing_id(&path.into_inner())?;
    let MarkSoldBody {
        value,
        actor_username,
    } = payload.into_inner();
    let actor = resolve_actor(
        state.identity.as_ref(),
        &session,
        &request,
        actor_username.as_deref(),
        "actorUsername",
    )
    .await?;
    let listing = state
        .listings
        .mark_sold(MarkSoldRequest {
            id,
            sold: value,
            actor,
        })
        .await?;
    Ok(web::Json(listing.into()))
}

/// Permanently remove a listing owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    params(
        ("id" = u64, Path, description = "Listing identifier"),
        ActorQuery,
        ("X-Actor-Secret" = Option<String>, Header, description = "Secret for actorUsername")
    ),
    responses(
        (status = 200, description = "Listing deleted", body = SuccessResponse),
        (status = 401, description = "Unknown caller", body = ErrorSchema),
        (status = 403, description = "Caller does not own the listing", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "deleteListing",
    security(("SessionCookie" = []), ())
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<String>,
    query: web::Query<ActorQuery>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let id = parse_listing_id(&path.into_inner())?;
    let actor = resolve_actor(
        state.identity.as_ref(),
        &session,
        &request,
        query.actor_username.as_deref(),
        "actorUsername",
    )
    .await?;
    state
        .listings
        .delete_listing(DeleteListingRequest { id, actor })
        .await?;
    Ok(web::Json(SuccessResponse::ok()))
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
