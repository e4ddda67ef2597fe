//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper reports failures as `invalid_request` errors carrying
//! `details.field` and `details.code`, matching the domain validation shape.

use pagination::{PageRequest, PageRequestError};
use serde_json::{Value, json};

use crate::domain::{Category, Error, ListingId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidListingId,
    UnknownCategory,
    InvalidPage,
    InvalidPageSize,
    InvalidPrice,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidListingId => "invalid_listing_id",
            ErrorCode::UnknownCategory => "unknown_category",
            ErrorCode::InvalidPage => "invalid_page",
            ErrorCode::InvalidPageSize => "invalid_page_size",
            ErrorCode::InvalidPrice => "invalid_price",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_error_with_value(
    field: FieldName,
    code: ErrorCode,
    message: String,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Parse a listing id path segment.
pub(crate) fn parse_listing_id(raw: &str) -> Result<ListingId, Error> {
    let field = FieldName::new("id");
    raw.parse::<ListingId>()
        .ok()
        .filter(|id| id.get() > 0)
        .ok_or_else(|| {
            field_error_with_value(
                field,
                ErrorCode::InvalidListingId,
                "id must be a positive integer".to_owned(),
                raw,
            )
        })
}

/// Parse an optional category filter; blank values mean no filter.
pub(crate) fn parse_category_filter(raw: Option<&str>) -> Result<Option<Category>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<Category>().map(Some).map_err(|err| {
        field_error_with_value(
            FieldName::new("category"),
            ErrorCode::UnknownCategory,
            err.to_string(),
            raw,
        )
    })
}

/// Build a page request, defaulting absent values.
pub(crate) fn parse_page_request(
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<PageRequest, Error> {
    let defaults = PageRequest::default();
    PageRequest::new(
        page.unwrap_or(defaults.page()),
        page_size.unwrap_or(defaults.page_size()),
    )
    .map_err(|err| match err {
        PageRequestError::ZeroPage => field_error(
            FieldName::new("page"),
            ErrorCode::InvalidPage,
            err.to_string(),
        ),
        PageRequestError::PageSizeOutOfRange { .. } => field_error(
            FieldName::new("pageSize"),
            ErrorCode::InvalidPageSize,
            err.to_string(),
        ),
    })
}

/// Accept a price given either as a JSON number or a numeric string.
pub(crate) fn price_text(value: Option<Value>) -> Result<String, Error> {
    let field = FieldName::new("price");
    match value {
        None | Some(Value::Null) => Err(missing_field_error(field)),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(field_error_with_value(
            field,
            ErrorCode::InvalidPrice,
            "price must be a number".to_owned(),
            &other.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn detail_code(error: &Error) -> &str {
        error
            .details()
            .and_then(|details| details.get("code"))
            .and_then(Value::as_str)
            .expect("code detail")
    }

    #[rstest]
    #[case("7", Some(7))]
    #[case("0", None)]
    #[case("-1", None)]
    #[case("abc", None)]
    fn listing_ids_must_be_positive(#[case] raw: &str, #[case] expected: Option<u64>) {
        match (parse_listing_id(raw), expected) {
            (Ok(id), Some(value)) => assert_eq!(id.get(), value),
            (Err(err), None) => assert_eq!(detail_code(&err), "invalid_listing_id"),
            (other, _) => panic!("unexpected result for {raw}: {other:?}"),
        }
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some("Food"), Some(Category::Food))]
    #[case(Some("vaping_accessories"), Some(Category::VapingAccessories))]
    fn category_filters_parse(#[case] raw: Option<&str>, #[case] expected: Option<Category>) {
        assert_eq!(parse_category_filter(raw).expect("valid filter"), expected);
    }

    #[test]
    fn unknown_category_filter_is_rejected() {
        let err = parse_category_filter(Some("furniture")).expect_err("unknown");
        assert_eq!(detail_code(&err), "unknown_category");
    }

    #[rstest]
    #[case(None, None, 1, 20)]
    #[case(Some(3), Some(5), 3, 5)]
    fn page_requests_default(
        #[case] page: Option<u32>,
        #[case] size: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_size: u32,
    ) {
        let request = parse_page_request(page, size).expect("valid page");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.page_size(), expected_size);
    }

    #[rstest]
    #[case(Some(0), None, "invalid_page")]
    #[case(None, Some(0), "invalid_page_size")]
    #[case(None, Some(500), "invalid_page_size")]
    fn page_requests_reject_out_of_range(
        #[case] page: Option<u32>,
        #[case] size: Option<u32>,
        #[case] code: &str,
    ) {
        let err = parse_page_request(page, size).expect_err("invalid page");
        assert_eq!(detail_code(&err), code);
    }

    #[rstest]
    #[case(json!(25), "25")]
    #[case(json!(40.5), "40.5")]
    #[case(json!("19.99"), "19.99")]
    fn prices_accept_numbers_and_strings(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(price_text(Some(value)).expect("price"), expected);
    }

    #[rstest]
    #[case(None, "missing_field")]
    #[case(Some(json!(true)), "invalid_price")]
    fn prices_reject_missing_and_non_numeric(#[case] value: Option<Value>, #[case] code: &str) {
        let err = price_text(value).expect_err("invalid price");
        assert_eq!(detail_code(&err), code);
    }
}
