//! Versioned listing document and its JSON representation.
//!
//! ```json
//! { "version": 1, "nextId": 3, "listings": [ { "id": 1, ... } ] }
//! ```
//!
//! The whole document is rewritten on every mutation. `nextId` is stored so
//! identifiers are never handed out twice, even after the highest listing is
//! deleted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ports::ListingRepositoryError;
use crate::domain::{
    Category, ContactChannel, Identity, ImageBlob, Listing, ListingDetails, ListingDetailsParts,
    ListingId, NewListing, Price,
};

/// Document format version written by this build.
pub const DOCUMENT_VERSION: u32 = 1;

/// Immutable snapshot of the listing collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDocument {
    next_id: u64,
    listings: Vec<Listing>,
}

impl Default for ListingDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            listings: Vec::new(),
        }
    }
}

impl ListingDocument {
    /// Listings in storage (insertion) order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Identifier the next insert will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn find(&self, id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id() == id)
    }

    /// Copy with `listing` appended under the next identifier.
    pub fn with_inserted(
        &self,
        listing: NewListing,
    ) -> Result<(Self, Listing), ListingRepositoryError> {
        let id = ListingId::new(self.next_id);
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| ListingRepositoryError::persistence("listing id sequence exhausted"))?;
        let stored = Listing::new(id, listing);
        let mut listings = self.listings.clone();
        listings.push(stored.clone());
        Ok((Self { next_id, listings }, stored))
    }

    /// Copy with the listing sharing `listing`'s id replaced in place.
    pub fn with_replaced(&self, listing: Listing) -> Result<Self, ListingRepositoryError> {
        let id = listing.id();
        let position = self.position(id)?;
        let mut listings = self.listings.clone();
        if let Some(slot) = listings.get_mut(position) {
            *slot = listing;
        }
        Ok(Self {
            next_id: self.next_id,
            listings,
        })
    }

    /// Copy without listing `id`.
    pub fn with_removed(&self, id: ListingId) -> Result<Self, ListingRepositoryError> {
        let position = self.position(id)?;
        let mut listings = self.listings.clone();
        listings.remove(position);
        Ok(Self {
            next_id: self.next_id,
            listings,
        })
    }

    fn position(&self, id: ListingId) -> Result<usize, ListingRepositoryError> {
        self.listings
            .iter()
            .position(|listing| listing.id() == id)
            .ok_or_else(|| ListingRepositoryError::not_found(id.get()))
    }

    /// Serialise to pretty JSON.
    pub fn to_json(&self) -> Result<String, ListingRepositoryError> {
        let dto = DocumentDto {
            version: DOCUMENT_VERSION,
            next_id: self.next_id,
            listings: self.listings.iter().map(ListingRecord::from).collect(),
        };
        serde_json::to_string_pretty(&dto)
            .map_err(|err| ListingRepositoryError::persistence(err.to_string()))
    }

    /// Parse and validate a stored document.
    pub fn from_json(raw: &str) -> Result<Self, ListingRepositoryError> {
        let dto: DocumentDto = serde_json::from_str(raw)
            .map_err(|err| ListingRepositoryError::corrupt(err.to_string()))?;
        if dto.version != DOCUMENT_VERSION {
            return Err(ListingRepositoryError::corrupt(format!(
                "unsupported document version {}",
                dto.version
            )));
        }

        let mut seen = HashSet::with_capacity(dto.listings.len());
        let mut listings = Vec::with_capacity(dto.listings.len());
        for record in dto.listings {
            let id = record.id;
            if id == 0 || id >= dto.next_id {
                return Err(ListingRepositoryError::corrupt(format!(
                    "listing id {id} is outside the allocated range 1..{}",
                    dto.next_id
                )));
            }
            if !seen.insert(id) {
                return Err(ListingRepositoryError::corrupt(format!(
                    "duplicate listing id {id}"
                )));
            }
            listings.push(record.into_listing()?);
        }

        Ok(Self {
            next_id: dto.next_id,
            listings,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentDto {
    version: u32,
    next_id: u64,
    listings: Vec<ListingRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingRecord {
    id: u64,
    title: String,
    description: String,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    location: String,
    category: Category,
    contact_channel: String,
    images: Vec<String>,
    owner_username: String,
    created_at: DateTime<Utc>,
    sold: bool,
}

impl From<&Listing> for ListingRecord {
    fn from(listing: &Listing) -> Self {
        let details = listing.details();
        Self {
            id: listing.id().get(),
            title: details.title().to_owned(),
            description: details.description().to_owned(),
            price: details.price().amount(),
            location: details.location().to_owned(),
            category: details.category(),
            contact_channel: details.contact_channel().as_ref().to_owned(),
            images: details
                .images()
                .iter()
                .map(|image| image.as_ref().to_owned())
                .collect(),
            owner_username: listing.owner().as_ref().to_owned(),
            created_at: listing.created_at(),
            sold: listing.sold(),
        }
    }
}

impl ListingRecord {
    fn into_listing(self) -> Result<Listing, ListingRepositoryError> {
        let id = self.id;
        let corrupt = |reason: String| {
            ListingRepositoryError::corrupt(format!("listing {id}: {reason}"))
        };

        let price = Price::new(self.price).map_err(|err| corrupt(err.to_string()))?;
        let contact_channel =
            ContactChannel::from_stored(self.contact_channel).map_err(|err| corrupt(err.to_string()))?;
        let images = self
            .images
            .into_iter()
            .map(ImageBlob::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| corrupt(err.to_string()))?;
        let owner = Identity::new(&self.owner_username).map_err(|err| corrupt(err.to_string()))?;
        let details = ListingDetails::new(ListingDetailsParts {
            title: self.title,
            description: self.description,
            price,
            location: self.location,
            category: self.category,
            contact_channel,
            images,
        })
        .map_err(|err| corrupt(err.to_string()))?;

        Ok(Listing::new(
            ListingId::new(id),
            NewListing {
                details,
                owner,
                created_at: self.created_at,
                sold: self.sold,
            },
        ))
    }
}
