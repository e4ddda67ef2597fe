//! Page-number pagination primitives shared by Bazaar list endpoints.
//!
//! A [`PageRequest`] carries a validated one-based page number and a bounded
//! page size. [`PageRequest::paginate`] slices an already filtered and
//! ordered result set and wraps the slice in a [`Paginated`] envelope that
//! reports the pre-pagination totals.
//!
//! # Example
//!
//! ```
//! use pagination::PageRequest;
//!
//! let request = PageRequest::new(2, 2).expect("valid page request");
//! let page = request.paginate(vec!["a", "b", "c"]);
//!
//! assert_eq!(page.items(), &["c"]);
//! assert_eq!(page.total_count(), 3);
//! assert_eq!(page.total_pages(), 2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size applied when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers are one-based.
    #[error("page must be at least 1")]
    ZeroPage,
    /// The requested page size is outside `1..=MAX_PAGE_SIZE`.
    #[error("page size must be between 1 and {max}, got {actual}")]
    PageSizeOutOfRange {
        /// Requested page size.
        actual: u32,
        /// Upper bound accepted by the request.
        max: u32,
    },
}

/// Validated one-based page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPage`] when `page` is zero and
    /// [`PageRequestError::PageSizeOutOfRange`] when `page_size` is outside
    /// `1..=MAX_PAGE_SIZE`.
    pub const fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange {
                actual: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, page_size })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding the first item of this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        to_usize(self.page - 1).saturating_mul(to_usize(self.page_size))
    }

    /// Number of pages needed to show `total_count` items; zero when empty.
    #[must_use]
    pub fn total_pages(&self, total_count: usize) -> usize {
        total_count.div_ceil(to_usize(self.page_size))
    }

    /// Slice an ordered result set into this page.
    ///
    /// Pages past the end yield an empty item list while still reporting the
    /// totals of the full set.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> Paginated<T> {
        let total_count = items.len();
        let page_items = items
            .into_iter()
            .skip(self.offset())
            .take(to_usize(self.page_size))
            .collect();
        Paginated {
            items: page_items,
            total_count,
            total_pages: self.total_pages(total_count),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// One page of results together with the totals of the unpaginated set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    items: Vec<T>,
    total_count: usize,
    total_pages: usize,
    page: u32,
    page_size: u32,
}

impl<T> Paginated<T> {
    /// Items on this page, in result order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Size of the filtered set before pagination.
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    /// `ceil(total_count / page_size)`.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Requested page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Consume the envelope, returning the page items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert the page items while keeping the totals.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page maths and slicing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, PageRequestError::ZeroPage)]
    #[case(1, 0, PageRequestError::PageSizeOutOfRange { actual: 0, max: MAX_PAGE_SIZE })]
    #[case(1, 101, PageRequestError::PageSizeOutOfRange { actual: 101, max: MAX_PAGE_SIZE })]
    fn rejects_out_of_range_requests(
        #[case] page: u32,
        #[case] page_size: u32,
        #[case] expected: PageRequestError,
    ) {
        let err = PageRequest::new(page, page_size).expect_err("request must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(2, 1, 2)]
    fn total_pages_rounds_up(
        #[case] total_count: usize,
        #[case] page_size: u32,
        #[case] expected: usize,
    ) {
        let request = PageRequest::new(1, page_size).expect("valid request");
        assert_eq!(request.total_pages(total_count), expected);
    }

    #[rstest]
    fn page_past_the_end_is_empty_but_keeps_totals() {
        let request = PageRequest::new(5, 2).expect("valid request");
        let page = request.paginate(vec![1, 2, 3]);

        assert!(page.items().is_empty());
        assert_eq!(page.total_count(), 3);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.page(), 5);
    }

    #[rstest]
    fn second_page_starts_after_offset() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let page = request.paginate(vec![1, 2, 3, 4, 5]);

        assert_eq!(page.items(), &[3, 4]);
        assert_eq!(request.offset(), 2);
    }

    #[rstest]
    fn maximum_page_size_is_accepted() {
        let request = PageRequest::new(1, MAX_PAGE_SIZE).expect("upper bound is inclusive");
        assert_eq!(request.page_size(), MAX_PAGE_SIZE);
    }

    #[rstest]
    fn default_request_uses_first_page() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[rstest]
    fn envelope_serialises_camel_case_totals() {
        let page = PageRequest::new(1, 10)
            .expect("valid request")
            .paginate(vec!["x"])
            .map(str::to_owned);
        let json = serde_json::to_value(&page).expect("serialise envelope");

        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["pageSize"], 10);
    }
}
