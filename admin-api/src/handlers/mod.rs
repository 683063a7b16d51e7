use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

use ecom_models::auth::Claims;
use ecom_models::ApiResponse;

use crate::services::{AuthError, CredentialFailure};

pub mod auth;
pub mod cart;
pub mod order;
pub mod route_role;
pub mod user;

/// Map a service-layer failure onto the response envelope. Credential
/// failures share one body regardless of cause so the endpoint cannot be
/// used to enumerate accounts.
pub(crate) fn auth_error_response(err: AuthError) -> HttpResponse {
    match err {
        AuthError::MissingParameters(_) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::bad_request(&err.to_string()))
        }
        AuthError::DuplicateEntity => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::bad_request(&err.to_string()))
        }
        AuthError::InvalidCredentials(CredentialFailure::Locked) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::bad_request(
                "Account is locked, please retry after some time",
            ))
        }
        AuthError::InvalidCredentials(_) => HttpResponse::BadRequest()
            .json(ApiResponse::<()>::bad_request("Invalid username or password")),
        AuthError::InvalidOtp => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::bad_request("Invalid OTP"))
        }
        AuthError::InvalidCode => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::bad_request("Invalid Code"))
        }
        AuthError::Store(e) => {
            tracing::error!("store failure: {e:#}");
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::server_error("Internal server error"))
        }
    }
}

pub(crate) fn validation_response(errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::UnprocessableEntity()
        .json(ApiResponse::<()>::validation_error(&errors.to_string()))
}

pub(crate) fn store_error_response(e: anyhow::Error) -> HttpResponse {
    tracing::error!("store failure: {e:#}");
    HttpResponse::InternalServerError()
        .json(ApiResponse::<()>::server_error("Internal server error"))
}

/// Request body for the bulk-insert endpoints: `{ "data": [ ... ] }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct BulkBody<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

/// Response body for the bulk-insert endpoints.
#[derive(Debug, Serialize)]
pub struct BulkCount {
    pub count: u64,
}

/// Id of the authenticated caller, taken from the claims placed in request
/// extensions by the bearer-auth middleware.
pub(crate) fn actor_id(req: &HttpRequest) -> Option<Uuid> {
    req.extensions()
        .get::<Claims>()
        .and_then(|claims| Uuid::parse_str(&claims.sub).ok())
}
