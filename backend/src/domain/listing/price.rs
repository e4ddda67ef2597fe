//! Listing price.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Validation errors for prices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceValidationError {
    /// The price was below zero.
    #[error("price must not be negative")]
    Negative,
    /// The price could not be read as a decimal number.
    #[error("price must be a decimal number")]
    NotANumber,
}

/// Non-negative price in the catalog's single implicit currency.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::Price;
///
/// let price: Price = "25.50".parse().expect("valid price");
/// assert_eq!(price.to_string(), "25.50");
/// assert!("-1".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Validate a decimal amount.
    pub fn new(amount: Decimal) -> Result<Self, PriceValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceValidationError::Negative);
        }
        Ok(Self(amount))
    }

    /// Underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceValidationError::NotANumber)?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
