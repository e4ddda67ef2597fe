//! Closed set of listing categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category a listing is published under.
///
/// Serialises with stable snake_case wire names. Parsing also accepts the
/// display labels and the legacy Turkish labels, ignoring case.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::Category;
///
/// let category: Category = "Vaping/Accessories".parse().expect("known label");
/// assert_eq!(category, Category::VapingAccessories);
/// assert_eq!(category.as_str(), "vaping_accessories");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Category {
    /// Prepared or packaged food.
    Food,
    /// Cosmetics and personal care.
    Cosmetics,
    /// Clothing and accessories.
    Clothing,
    /// Electronics and gadgets.
    Technology,
    /// Vaping devices and accessories.
    VapingAccessories,
}

/// Error returned when a category label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Food,
        Self::Cosmetics,
        Self::Clothing,
        Self::Technology,
        Self::VapingAccessories,
    ];

    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Cosmetics => "cosmetics",
            Self::Clothing => "clothing",
            Self::Technology => "technology",
            Self::VapingAccessories => "vaping_accessories",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Cosmetics => "Cosmetics",
            Self::Clothing => "Clothing",
            Self::Technology => "Technology",
            Self::VapingAccessories => "Vaping/Accessories",
        }
    }

    const fn legacy_label(self) -> &'static str {
        match self {
            Self::Food => "Yemek",
            Self::Cosmetics => "Kozmetik",
            Self::Clothing => "Giyim",
            Self::Technology => "Teknoloji",
            Self::VapingAccessories => "Elektronik Sigara & Puff",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| {
                [category.as_str(), category.label(), category.legacy_label()]
                    .iter()
                    .any(|candidate| candidate.to_lowercase() == needle)
            })
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
