//! Pure filtering, ordering and paging over a listing snapshot.
//!
//! Nothing here touches storage. The catalog service hands a full scan to
//! [`select_listings`] and returns whatever page it produces.

use std::cmp::Ordering;

use pagination::{PageRequest, Paginated};

use crate::domain::{Category, Listing};

/// One page of listings plus totals for the filtered set.
pub type ListingPage = Paginated<Listing>;

/// Filters and paging applied to a catalog query.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::{Category, ListingCriteria};
///
/// let criteria = ListingCriteria::default()
///     .with_search_term("lamp")
///     .with_category(Category::Technology);
/// assert!(criteria.include_sold());
/// assert_eq!(criteria.page().page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCriteria {
    search_term: Option<String>,
    category: Option<Category>,
    include_sold: bool,
    page: PageRequest,
}

impl Default for ListingCriteria {
    fn default() -> Self {
        Self {
            search_term: None,
            category: None,
            include_sold: true,
            page: PageRequest::default(),
        }
    }
}

impl ListingCriteria {
    /// Keep listings whose title or description contains `term`.
    ///
    /// Blank terms are ignored.
    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.search_term = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Keep only listings in `category`.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether sold listings stay in the result.
    #[must_use]
    pub fn with_include_sold(mut self, include_sold: bool) -> Self {
        self.include_sold = include_sold;
        self
    }

    /// Page to return.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Lower-cased search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn include_sold(&self) -> bool {
        self.include_sold
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    fn matches(&self, listing: &Listing) -> bool {
        let details = listing.details();
        let category_ok = self
            .category
            .is_none_or(|category| details.category() == category);
        let sold_ok = self.include_sold || !listing.sold();
        let search_ok = self.search_term.as_deref().is_none_or(|needle| {
            details.title().to_lowercase().contains(needle)
                || details.description().to_lowercase().contains(needle)
        });
        category_ok && sold_ok && search_ok
    }
}

/// Newest first; equal timestamps fall back to ascending id.
pub fn catalog_order(a: &Listing, b: &Listing) -> Ordering {
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Filter, sort and page a full listing scan.
pub fn select_listings(listings: Vec<Listing>, criteria: &ListingCriteria) -> ListingPage {
    let mut matching: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| criteria.matches(listing))
        .collect();
    matching.sort_by(catalog_order);
    criteria.page.paginate(matching)
}
