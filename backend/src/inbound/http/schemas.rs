//! OpenAPI schema for the failure envelope.
//!
//! The domain [`crate::domain::Error`] has no `success` flag; the HTTP
//! adapter adds it when rendering. This wrapper documents the rendered shape.

use utoipa::ToSchema;

use crate::domain::ErrorCode;

/// Failure body returned by every endpoint.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    /// Human-readable message.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "title", "code": "empty_title"}`.
    details: Option<serde_json::Value>,
}
