//! Caller identity and the credentials used to establish it.
//!
//! The catalog only ever compares identities for equality; how a username is
//! verified is the concern of an [`IdentityResolver`] adapter.
//!
//! [`IdentityResolver`]: crate::domain::ports::IdentityResolver

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation errors raised when building identities or credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// A secret was supplied but it was empty.
    EmptySecret,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptySecret => write!(f, "secret must not be empty when provided"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Authenticated username that owns listings.
///
/// ## Invariants
/// - The username is trimmed and non-empty.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::Identity;
///
/// let identity = Identity::new("  alice ").expect("valid username");
/// assert_eq!(identity.as_ref(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Validate and construct an identity from a raw username.
    pub fn new(username: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Caller-supplied credentials handed to an identity resolver.
///
/// The secret is optional because the trusted-username path carries none. It
/// is wiped from memory on drop.
///
/// # Examples
/// ```
/// use bazaar_backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("bob", Some("hunter2")).expect("credentials");
/// assert_eq!(creds.username(), "bob");
/// assert_eq!(creds.secret(), Some("hunter2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    secret: Option<Zeroizing<String>>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        username: &str,
        secret: Option<&str>,
    ) -> Result<Self, IdentityValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        let secret = match secret {
            Some("") => return Err(IdentityValidationError::EmptySecret),
            Some(value) => Some(Zeroizing::new(value.to_owned())),
            None => None,
        };
        Ok(Self {
            username: normalized.to_owned(),
            secret,
        })
    }

    /// Credentials carrying only a username.
    pub fn username_only(username: &str) -> Result<Self, IdentityValidationError> {
        Self::try_from_parts(username, None)
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Secret supplied by the caller, if any.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_ref().map(|secret| secret.as_str())
    }
}
