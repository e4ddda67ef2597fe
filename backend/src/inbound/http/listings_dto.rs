//! Request and response bodies for the listing endpoints.

use chrono::{DateTime, Utc};
use pagination::Paginated;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Category, Error, Listing, ListingDraft};

use super::validation::price_text;

/// Body accepted by `POST /listings` and `PUT /listings/{id}`.
///
/// Missing text fields are treated as empty and rejected by listing
/// validation with a field-specific code.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingBody {
    pub title: String,
    pub description: String,
    /// Number or numeric string.
    #[schema(value_type = f64, example = 25)]
    pub price: Option<Value>,
    pub location: String,
    #[schema(example = "technology")]
    pub category: String,
    /// Email address or phone number.
    pub contact_channel: String,
    /// Encoded images; the first is the cover.
    pub images: Vec<String>,
    pub sold: Option<bool>,
    /// Owner named on create when no session exists.
    pub owner_username: Option<String>,
    /// Acting user named on update when no session exists.
    pub actor_username: Option<String>,
}

impl ListingBody {
    /// Username claimed by the body, preferring `actorUsername`.
    pub(crate) fn claimed_username(&self) -> Option<&str> {
        self.actor_username
            .as_deref()
            .or(self.owner_username.as_deref())
    }

    pub(crate) fn into_draft(self) -> Result<ListingDraft, Error> {
        Ok(ListingDraft {
            title: self.title,
            description: self.description,
            price: price_text(self.price)?,
            location: self.location,
            category: self.category,
            contact_channel: self.contact_channel,
            images: self.images,
            sold: self.sold,
        })
    }
}

/// Body accepted by `PUT /listings/{id}/sold`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkSoldBody {
    pub value: bool,
    #[serde(default)]
    pub actor_username: Option<String>,
}

/// Query string for `GET /listings`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListListingsQuery {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
    /// Items per page, 1..=100 (default 20).
    pub page_size: Option<u32>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Category wire name or label.
    pub category: Option<String>,
    /// Include sold listings (default true).
    pub include_sold: Option<bool>,
}

/// Query string for `DELETE /listings/{id}`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ActorQuery {
    pub actor_username: Option<String>,
}

/// A listing as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 25)]
    pub price: Decimal,
    pub location: String,
    pub category: Category,
    /// Human-readable category label.
    pub category_label: String,
    pub contact_channel: String,
    pub images: Vec<String>,
    pub cover_image: Option<String>,
    pub owner_username: String,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
    pub sold: bool,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        let details = listing.details();
        Self {
            id: listing.id().get(),
            title: details.title().to_owned(),
            description: details.description().to_owned(),
            price: details.price().amount(),
            location: details.location().to_owned(),
            category: details.category(),
            category_label: details.category().label().to_owned(),
            contact_channel: details.contact_channel().to_string(),
            images: details
                .images()
                .iter()
                .map(|image| image.as_ref().to_owned())
                .collect(),
            cover_image: details.cover_image().map(|image| image.as_ref().to_owned()),
            owner_username: listing.owner().to_string(),
            created_at: listing.created_at(),
            sold: listing.sold(),
        }
    }
}

/// `{ "success": true, "item": { ... } }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub success: bool,
    pub item: ListingResponse,
}

impl From<Listing> for ItemResponse {
    fn from(listing: Listing) -> Self {
        Self {
            success: true,
            item: listing.into(),
        }
    }
}

/// `{ "success": true, "items": [ ... ] }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemsResponse {
    pub success: bool,
    pub items: Vec<ListingResponse>,
}

impl From<Vec<Listing>> for ItemsResponse {
    fn from(listings: Vec<Listing>) -> Self {
        Self {
            success: true,
            items: listings.into_iter().map(ListingResponse::from).collect(),
        }
    }
}

/// One page of listings with paging metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub success: bool,
    pub items: Vec<ListingResponse>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: u32,
    pub page_size: u32,
}

impl From<Paginated<Listing>> for PageResponse {
    fn from(page: Paginated<Listing>) -> Self {
        let page = page.map(ListingResponse::from);
        Self {
            success: true,
            total_count: page.total_count(),
            total_pages: page.total_pages(),
            page: page.page(),
            page_size: page.page_size(),
            items: page.into_items(),
        }
    }
}

/// `{ "success": true }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
