use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Numeric user-type classification carried on the wire and inside JWT claims.
pub mod user_types {
    pub const ADMIN: i32 = 1;
    pub const USER: i32 = 2;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_no: Option<i64>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: String,
}

/// Per-user record of an issued OTP and its expiry. At most one of these is
/// active per user; issuing a new code overwrites the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordLink {
    pub code: String,
    pub expire_time: DateTime<Utc>,
}

impl ResetPasswordLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_time < now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// bcrypt hash, never the plain password.
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub user_type: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub shipping_address: Vec<Address>,
    #[serde(default)]
    pub wishlist: Vec<WishlistItem>,
    pub login_retry_limit: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_reactive_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_link: Option<ResetPasswordLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user record from validated register input. Only the fields
    /// present in the request are carried over; bookkeeping fields get their
    /// creation defaults.
    pub fn from_register(request: &RegisterRequest, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: request.username.clone().unwrap_or_default(),
            password: password_hash,
            email: request.email.clone().unwrap_or_default(),
            name: request.name.clone(),
            user_type: request.user_type.unwrap_or(user_types::USER),
            mobile_no: request.mobile_no.clone(),
            shipping_address: request.shipping_address.clone().unwrap_or_default(),
            wishlist: request.wishlist.clone().unwrap_or_default(),
            login_retry_limit: 0,
            login_reactive_time: None,
            reset_password_link: None,
            added_by: request.added_by,
            updated_by: request.updated_by,
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == user_types::ADMIN
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        required(message = "username is required"),
        length(min = 1, message = "username must not be empty")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "password is required"),
        length(min = 1, message = "password must not be empty")
    )]
    pub password: Option<String>,
    #[validate(
        required(message = "email is required"),
        email(message = "invalid email format")
    )]
    pub email: Option<String>,
    pub name: Option<String>,
    pub user_type: Option<i32>,
    pub mobile_no: Option<String>,
    pub shipping_address: Option<Vec<Address>>,
    pub wishlist: Option<Vec<WishlistItem>>,
    pub added_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOtpRequest {
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub code: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: Uuid,
    pub token: String,
}

/// JWT claims shared by the token issuer and the bearer-auth middleware.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub user_type: i32,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
}
