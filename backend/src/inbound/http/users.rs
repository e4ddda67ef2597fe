//! Session login and logout.
//!
//! ```text
//! POST /api/v1/login {"username":"alice","password":"wonderland"}
//! POST /api/v1/logout
//! ```
//!
//! A successful login stores the resolved identity in the session cookie;
//! later mutations use it instead of a username named in the request.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Credentials;
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::{authenticate, map_identity_validation_error};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
///
/// `password` may be omitted when the server trusts bare usernames.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Authenticate the caller and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = Credentials::try_from_parts(&username, password.as_deref())
        .map_err(|err| map_identity_validation_error(err, "username", "password"))?;
    let identity = authenticate(state.identity.as_ref(), &credentials).await?;
    session.persist_identity(&identity)?;
    tracing::info!(actor = %identity, "session established");
    Ok(HttpResponse::Ok().json(json!({ "success": true, "username": identity.as_ref() })))
}

/// Forget the session identity.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(json!({ "success": true }))
}
