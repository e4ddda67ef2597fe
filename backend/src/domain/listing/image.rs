//! Opaque listing images.

/// Error returned for blank image payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("image payload must not be empty")]
pub struct EmptyImage;

/// Base64 or data-URL image payload, stored and returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob(String);

impl ImageBlob {
    /// Wrap a non-blank payload.
    pub fn new(payload: impl Into<String>) -> Result<Self, EmptyImage> {
        let payload = payload.into();
        if payload.trim().is_empty() {
            return Err(EmptyImage);
        }
        Ok(Self(payload))
    }
}

impl AsRef<str> for ImageBlob {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ImageBlob> for String {
    fn from(value: ImageBlob) -> Self {
        value.0
    }
}
