use serde::{Deserialize, Serialize};

pub mod auth;
pub mod cart;
pub mod order;
pub mod route_role;

/// Status tags carried by every API response body. The HTTP status code and
/// this tag together form the external contract: `RecordNotFound` rides on a
/// 200 because it is a benign "nothing to do" outcome, not a failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    RecordNotFound,
    BadRequest,
    ValidationError,
    Unauthorized,
    ServerError,
}

/// Uniform response envelope: `{ status, message, data }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some("Your request is successfully executed".to_string()),
            data: Some(data),
        }
    }

    pub fn record_not_found() -> Self {
        Self {
            status: ResponseStatus::RecordNotFound,
            message: Some("Record not found with specified criteria.".to_string()),
            data: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::BadRequest,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::ValidationError,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Unauthorized,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::ServerError,
            message: Some(message.into()),
            data: None,
        }
    }
}
