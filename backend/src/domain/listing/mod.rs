//! Listing aggregate and the validation applied to listing mutations.
//!
//! A [`ListingDraft`] carries raw caller input. Converting it into
//! [`ListingDetails`] validates every field; the identity fields of a
//! [`Listing`] (`id`, owner, creation time) have no setters, so updates can
//! only ever replace the details and the sold flag.

mod category;
mod contact;
mod image;
mod price;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Identity;

pub use self::category::{Category, UnknownCategory};
pub use self::contact::{
    ContactChannel, ContactKind, ContactValidationError, CountryCode, DEFAULT_COUNTRY_CODE,
    SUBSCRIBER_DIGITS, format_phone,
};
pub use self::image::{EmptyImage, ImageBlob};
pub use self::price::{Price, PriceValidationError};

/// Store-assigned listing identifier. Never reused.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::ListingId;
///
/// let id: ListingId = "42".parse().expect("numeric id");
/// assert_eq!(id.get(), 42);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = u64, example = 7)]
pub struct ListingId(u64);

impl ListingId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Field-level validation failures for listing mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Description was blank.
    #[error("description must not be empty")]
    EmptyDescription,
    /// Location was blank.
    #[error("location must not be empty")]
    EmptyLocation,
    /// Price was negative or not a number.
    #[error(transparent)]
    Price(#[from] PriceValidationError),
    /// Category was outside the closed set.
    #[error(transparent)]
    Category(#[from] UnknownCategory),
    /// Contact channel was blank or malformed.
    #[error(transparent)]
    Contact(#[from] ContactValidationError),
    /// No images were supplied.
    #[error("at least one image is required")]
    MissingImages,
    /// An image payload was blank.
    #[error("image {index} must not be empty")]
    EmptyImage {
        /// Position of the offending image.
        index: usize,
    },
}

impl ListingValidationError {
    /// Name of the request field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyDescription => "description",
            Self::EmptyLocation => "location",
            Self::Price(_) => "price",
            Self::Category(_) => "category",
            Self::Contact(_) => "contactChannel",
            Self::MissingImages | Self::EmptyImage { .. } => "images",
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::EmptyDescription => "empty_description",
            Self::EmptyLocation => "empty_location",
            Self::Price(PriceValidationError::Negative) => "negative_price",
            Self::Price(PriceValidationError::NotANumber) => "invalid_price",
            Self::Category(_) => "unknown_category",
            Self::Contact(ContactValidationError::Empty) => "empty_contact",
            Self::Contact(ContactValidationError::InvalidEmail) => "invalid_email",
            Self::Contact(
                ContactValidationError::InvalidPhone | ContactValidationError::InvalidCountryCode(_),
            ) => "invalid_phone",
            Self::MissingImages => "missing_images",
            Self::EmptyImage { .. } => "empty_image",
        }
    }
}

/// Raw, unvalidated listing fields supplied by a caller.
///
/// `sold` is optional: creation defaults it to `false` and updates keep the
/// stored flag when it is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub location: String,
    pub category: String,
    pub contact_channel: String,
    pub images: Vec<String>,
    pub sold: Option<bool>,
}

/// Already-typed listing fields, checked by [`ListingDetails::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetailsParts {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub location: String,
    pub category: Category,
    pub contact_channel: ContactChannel,
    pub images: Vec<ImageBlob>,
}

/// Validated, owner-mutable listing fields.
///
/// ## Invariants
/// - `title`, `description` and `location` are non-blank.
/// - `images` holds at least one payload; the first is the cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetails {
    title: String,
    description: String,
    price: Price,
    location: String,
    category: Category,
    contact_channel: ContactChannel,
    images: Vec<ImageBlob>,
}

fn require_text(value: String, error: ListingValidationError) -> Result<String, ListingValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

impl ListingDetails {
    /// Check typed parts against the listing invariants.
    pub fn new(parts: ListingDetailsParts) -> Result<Self, ListingValidationError> {
        let ListingDetailsParts {
            title,
            description,
            price,
            location,
            category,
            contact_channel,
            images,
        } = parts;
        if images.is_empty() {
            return Err(ListingValidationError::MissingImages);
        }
        Ok(Self {
            title: require_text(title, ListingValidationError::EmptyTitle)?,
            description: require_text(description, ListingValidationError::EmptyDescription)?,
            price,
            location: require_text(location, ListingValidationError::EmptyLocation)?,
            category,
            contact_channel,
            images,
        })
    }

    /// Validate a raw draft, normalising the contact channel.
    ///
    /// Fields are checked in declaration order and the first failure wins.
    ///
    /// # Examples
    /// ```
    /// use bazaar_backend::domain::{Category, CountryCode, ListingDetails, ListingDraft};
    ///
    /// let draft = ListingDraft {
    ///     title: "Desk Lamp".into(),
    ///     description: "Adjustable arm".into(),
    ///     price: "25".into(),
    ///     location: "Izmir".into(),
    ///     category: "Technology".into(),
    ///     contact_channel: "0555 111 22 33".into(),
    ///     images: vec!["data:image/png;base64,AAAA".into()],
    ///     sold: None,
    /// };
    /// let details = ListingDetails::from_draft(draft, &CountryCode::default()).expect("valid");
    /// assert_eq!(details.category(), Category::Technology);
    /// assert_eq!(details.contact_channel().as_ref(), "+90 555 111 22 33");
    /// ```
    pub fn from_draft(
        draft: ListingDraft,
        default_country_code: &CountryCode,
    ) -> Result<Self, ListingValidationError> {
        let ListingDraft {
            title,
            description,
            price,
            location,
            category,
            contact_channel,
            images,
            sold: _,
        } = draft;

        let title = require_text(title, ListingValidationError::EmptyTitle)?;
        let description = require_text(description, ListingValidationError::EmptyDescription)?;
        let price: Price = price.parse()?;
        let location = require_text(location, ListingValidationError::EmptyLocation)?;
        let category: Category = category.parse()?;
        let contact_channel = ContactChannel::parse(&contact_channel, default_country_code)?;
        if images.is_empty() {
            return Err(ListingValidationError::MissingImages);
        }
        let images = images
            .into_iter()
            .enumerate()
            .map(|(index, payload)| {
                ImageBlob::new(payload).map_err(|EmptyImage| ListingValidationError::EmptyImage { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(ListingDetailsParts {
            title,
            description,
            price,
            location,
            category,
            contact_channel,
            images,
        })
    }

    /// Listing title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Asking price.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Where the item can be collected.
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Listing category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Canonical contact channel.
    pub fn contact_channel(&self) -> &ContactChannel {
        &self.contact_channel
    }

    /// Images in display order.
    pub fn images(&self) -> &[ImageBlob] {
        &self.images
    }

    /// First image, shown as the listing cover.
    pub fn cover_image(&self) -> Option<&ImageBlob> {
        self.images.first()
    }
}

/// A listing that has not yet been assigned an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub details: ListingDetails,
    pub owner: Identity,
    pub created_at: DateTime<Utc>,
    pub sold: bool,
}

/// A persisted listing.
///
/// `id`, `owner` and `created_at` are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    id: ListingId,
    details: ListingDetails,
    owner: Identity,
    created_at: DateTime<Utc>,
    sold: bool,
}

impl Listing {
    /// Attach a store-assigned identifier to a new listing.
    #[must_use]
    pub fn new(id: ListingId, listing: NewListing) -> Self {
        let NewListing {
            details,
            owner,
            created_at,
            sold,
        } = listing;
        Self {
            id,
            details,
            owner,
            created_at,
            sold,
        }
    }

    /// Replace the owner-editable fields, keeping identity fields intact.
    #[must_use]
    pub fn with_details(self, details: ListingDetails) -> Self {
        Self { details, ..self }
    }

    /// Set the sold flag.
    #[must_use]
    pub fn with_sold(self, sold: bool) -> Self {
        Self { sold, ..self }
    }

    /// Whether `identity` owns this listing.
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }

    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn details(&self) -> &ListingDetails {
        &self.details
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn sold(&self) -> bool {
        self.sold
    }
}
