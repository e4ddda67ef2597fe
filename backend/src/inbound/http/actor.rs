//! Actor resolution for mutating HTTP requests.
//!
//! An identity stored in the session cookie wins. Without one, the username
//! named in the request (plus the optional `X-Actor-Secret` header) is handed
//! to the configured [`IdentityResolver`].

use actix_web::HttpRequest;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{IdentityResolver, IdentityResolverError};
use crate::domain::{Credentials, Error, Identity, IdentityValidationError};

use super::session::SessionContext;
use super::validation::{FieldName, missing_field_error};

/// Header carrying the actor's secret when no session exists.
pub const ACTOR_SECRET_HEADER: &str = "X-Actor-Secret";

pub(crate) fn map_identity_validation_error(
    err: IdentityValidationError,
    username_field: &'static str,
    secret_field: &'static str,
) -> Error {
    match err {
        IdentityValidationError::EmptyUsername => {
            missing_field_error(FieldName::new(username_field))
        }
        IdentityValidationError::EmptySecret => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": secret_field, "code": "empty_secret" })),
    }
}

fn map_resolver_error(err: &IdentityResolverError) -> Error {
    warn!(reason = %err, "identity rejected");
    match err {
        IdentityResolverError::InvalidCredentials { .. }
        | IdentityResolverError::UnknownAccount { .. } => {
            Error::unauthorized("invalid credentials")
        }
        IdentityResolverError::Malformed { message } => {
            Error::unauthorized(format!("malformed credentials: {message}"))
        }
    }
}

/// Resolve credentials through `resolver`, reporting rejection as `401`.
pub(crate) async fn authenticate(
    resolver: &dyn IdentityResolver,
    credentials: &Credentials,
) -> Result<Identity, Error> {
    resolver
        .resolve_identity(credentials)
        .await
        .map_err(|err| map_resolver_error(&err))
}

fn secret_header(request: &HttpRequest) -> Result<Option<&str>, Error> {
    request
        .headers()
        .get(ACTOR_SECRET_HEADER)
        .map(|value| {
            value.to_str().map_err(|_| {
                Error::invalid_request("actor secret must be visible ASCII").with_details(
                    json!({ "field": ACTOR_SECRET_HEADER, "code": "invalid_secret" }),
                )
            })
        })
        .transpose()
}

/// Work out who is performing a mutation.
///
/// `claimed` is the username named in the request body or query, and
/// `field` is its wire name for error details.
pub(crate) async fn resolve_actor(
    resolver: &dyn IdentityResolver,
    session: &SessionContext,
    request: &HttpRequest,
    claimed: Option<&str>,
    field: &'static str,
) -> Result<Identity, Error> {
    if let Some(identity) = session.identity()? {
        return Ok(identity);
    }
    let Some(username) = claimed.map(str::trim).filter(|name| !name.is_empty()) else {
        return Err(Error::unauthorized(format!(
            "login required or {field} must be provided"
        )));
    };
    let credentials = Credentials::try_from_parts(username, secret_header(request)?)
        .map_err(|err| map_identity_validation_error(err, field, ACTOR_SECRET_HEADER))?;
    authenticate(resolver, &credentials).await
}
