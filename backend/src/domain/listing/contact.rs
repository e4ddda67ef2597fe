//! Contact channel parsing and phone number formatting.
//!
//! A channel containing `@` is an email address; anything else is a phone
//! number. Phone numbers follow one grammar: an optional `+`, a country code
//! of one to three digits, then exactly ten subscriber digits. Spaces,
//! dashes, dots and parentheses are ignored. Numbers without a country code
//! take the configured default after a single leading trunk `0` is dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of subscriber digits following the country code.
pub const SUBSCRIBER_DIGITS: usize = 10;

/// Country code applied to phone numbers entered without one.
pub const DEFAULT_COUNTRY_CODE: &str = "90";

/// Validation errors for contact channels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// The channel was blank.
    #[error("contact channel must not be empty")]
    Empty,
    /// The channel looked like an email address but was malformed.
    #[error("contact email address is malformed")]
    InvalidEmail,
    /// The channel was neither a valid email nor a valid phone number.
    #[error("contact phone number must have a 1-3 digit country code and 10 subscriber digits")]
    InvalidPhone,
    /// A configured country code was not 1-3 digits.
    #[error("country code must be 1-3 digits without a leading zero: {0}")]
    InvalidCountryCode(String),
}

/// Dialling prefix for a country, without the leading `+`.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::CountryCode;
///
/// let code = CountryCode::new("+44").expect("valid code");
/// assert_eq!(code.as_ref(), "44");
/// assert!(CountryCode::new("0044").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Validate a country code, accepting an optional leading `+`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ContactValidationError> {
        let raw = raw.as_ref();
        let digits = raw.trim().trim_start_matches('+');
        let well_formed = (1..=3).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit())
            && !digits.starts_with('0');
        if well_formed {
            Ok(Self(digits.to_owned()))
        } else {
            Err(ContactValidationError::InvalidCountryCode(raw.to_owned()))
        }
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self(DEFAULT_COUNTRY_CODE.to_owned())
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ContactValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Kind of contact channel, derived from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// An email address.
    Email,
    /// A phone number in canonical display form.
    Phone,
}

/// A validated contact channel stored in canonical form.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::{ContactChannel, ContactKind, CountryCode};
///
/// let channel = ContactChannel::parse("0555 111 22 33", &CountryCode::default())
///     .expect("valid phone");
/// assert_eq!(channel.as_ref(), "+90 555 111 22 33");
/// assert_eq!(channel.kind(), ContactKind::Phone);
/// assert_eq!(channel.dial_digits().as_deref(), Some("905551112233"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ContactChannel(String);

impl ContactChannel {
    /// Validate raw input and return the canonical channel.
    pub fn parse(
        raw: &str,
        default_country_code: &CountryCode,
    ) -> Result<Self, ContactValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContactValidationError::Empty);
        }
        if trimmed.contains('@') {
            return validate_email(trimmed).map(|()| Self(trimmed.to_owned()));
        }
        format_phone(trimmed, default_country_code).map(Self)
    }

    /// Rebuild a channel previously stored in canonical form.
    pub fn from_stored(value: String) -> Result<Self, ContactValidationError> {
        if value.trim().is_empty() {
            return Err(ContactValidationError::Empty);
        }
        Ok(Self(value))
    }

    /// Whether the channel is an email address or a phone number.
    #[must_use]
    pub fn kind(&self) -> ContactKind {
        if self.0.contains('@') {
            ContactKind::Email
        } else {
            ContactKind::Phone
        }
    }

    /// Digits-only phone number for dialling links; `None` for email.
    #[must_use]
    pub fn dial_digits(&self) -> Option<String> {
        match self.kind() {
            ContactKind::Email => None,
            ContactKind::Phone => Some(self.0.chars().filter(char::is_ascii_digit).collect()),
        }
    }
}

impl AsRef<str> for ContactChannel {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ContactChannel> for String {
    fn from(value: ContactChannel) -> Self {
        value.0
    }
}

fn validate_email(candidate: &str) -> Result<(), ContactValidationError> {
    let mut parts = candidate.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ContactValidationError::InvalidEmail);
    };
    let domain_ok = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || candidate.chars().any(char::is_whitespace) {
        return Err(ContactValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate a phone number and render it as `+CC XXX XXX XX XX`.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::{CountryCode, format_phone};
///
/// let formatted = format_phone("+1 (212) 555-0100", &CountryCode::default())
///     .expect("valid phone");
/// assert_eq!(formatted, "+1 212 555 01 00");
/// ```
pub fn format_phone(
    raw: &str,
    default_country_code: &CountryCode,
) -> Result<String, ContactValidationError> {
    let trimmed = raw.trim();
    let (explicit_plus, body) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')'))
    {
        return Err(ContactValidationError::InvalidPhone);
    }
    let digits: String = body.chars().filter(char::is_ascii_digit).collect();

    let (country_code, subscriber) = split_country_code(&digits, explicit_plus, default_country_code)
        .ok_or(ContactValidationError::InvalidPhone)?;

    let mut formatted = String::with_capacity(country_code.len() + SUBSCRIBER_DIGITS + 6);
    formatted.push('+');
    formatted.push_str(country_code);
    for (index, digit) in subscriber.chars().enumerate() {
        if matches!(index, 0 | 3 | 6 | 8) {
            formatted.push(' ');
        }
        formatted.push(digit);
    }
    Ok(formatted)
}

fn split_country_code<'a>(
    digits: &'a str,
    explicit_plus: bool,
    default_country_code: &'a CountryCode,
) -> Option<(&'a str, &'a str)> {
    let len = digits.len();
    if !explicit_plus {
        if len == SUBSCRIBER_DIGITS {
            return Some((default_country_code.as_ref(), digits));
        }
        if len == SUBSCRIBER_DIGITS + 1 {
            if let Some(rest) = digits.strip_prefix('0') {
                return Some((default_country_code.as_ref(), rest));
            }
        }
    }
    let code_len = len.checked_sub(SUBSCRIBER_DIGITS)?;
    if !(1..=3).contains(&code_len) || digits.starts_with('0') {
        return None;
    }
    let (code, subscriber) = digits.split_at(code_len);
    Some((code, subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn turkey() -> CountryCode {
        CountryCode::default()
    }

    #[rstest]
    #[case("5551112233", "+90 555 111 22 33")]
    #[case("0555 111 22 33", "+90 555 111 22 33")]
    #[case("(0555) 111-22-33", "+90 555 111 22 33")]
    #[case("+90 555 111 22 33", "+90 555 111 22 33")]
    #[case("905551112233", "+90 555 111 22 33")]
    #[case("+1 212.555.0100", "+1 212 555 01 00")]
    #[case("+358 401 234 5678", "+358 401 234 56 78")]
    fn formats_phone_numbers(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_phone(raw, &turkey()).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case("555 111")]
    #[case("+0 555 111 22 33")]
    #[case("+12345 555 111 22 33")]
    #[case("555-111-22-33 ext 4")]
    #[case("00555 111 22 33")]
    fn rejects_malformed_phone_numbers(#[case] raw: &str) {
        assert_eq!(
            format_phone(raw, &turkey()),
            Err(ContactValidationError::InvalidPhone)
        );
    }

    #[rstest]
    fn default_country_code_is_configurable() {
        let uk = CountryCode::new("44").expect("valid code");
        assert_eq!(
            format_phone("07700 900123", &uk).as_deref(),
            Ok("+44 770 090 01 23")
        );
    }

    #[rstest]
    #[case("seller@example.com")]
    #[case("  a.b@shop.co.uk ")]
    fn accepts_email_channels(#[case] raw: &str) {
        let channel = ContactChannel::parse(raw, &turkey()).expect("valid email");
        assert_eq!(channel.kind(), ContactKind::Email);
        assert_eq!(channel.as_ref(), raw.trim());
        assert!(channel.dial_digits().is_none());
    }

    #[rstest]
    #[case("@example.com")]
    #[case("seller@localhost")]
    #[case("a@b@c.com")]
    #[case("sel ler@example.com")]
    fn rejects_malformed_email(#[case] raw: &str) {
        assert_eq!(
            ContactChannel::parse(raw, &turkey()),
            Err(ContactValidationError::InvalidEmail)
        );
    }

    #[rstest]
    fn rejects_blank_channel() {
        assert_eq!(
            ContactChannel::parse("   ", &turkey()),
            Err(ContactValidationError::Empty)
        );
    }

    #[rstest]
    fn canonical_phone_reparses_unchanged() {
        let first = ContactChannel::parse("0555 111 22 33", &turkey()).expect("valid");
        let second = ContactChannel::parse(first.as_ref(), &CountryCode::new("1").expect("code"))
            .expect("valid");
        assert_eq!(first, second);
    }
}
