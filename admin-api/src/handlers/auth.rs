use actix_web::{web, HttpResponse};
use validator::Validate;

use ecom_models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    ResetPasswordRequest, ValidateOtpRequest,
};
use ecom_models::ApiResponse;

use super::{auth_error_response, validation_response};
use crate::services::{AuthService, ForgotPasswordOutcome};

pub async fn register(
    auth: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return validation_response(&errors);
    }
    match auth.register(&body).await {
        Ok(id) => HttpResponse::Ok().json(ApiResponse::success(RegisterResponse { id })),
        Err(e) => auth_error_response(e),
    }
}

pub async fn login(auth: web::Data<AuthService>, body: web::Json<LoginRequest>) -> HttpResponse {
    match auth
        .login(body.username.as_deref(), body.password.as_deref())
        .await
    {
        Ok((user, token)) => HttpResponse::Ok().json(ApiResponse::success(LoginResponse {
            id: user.id,
            token,
        })),
        Err(e) => auth_error_response(e),
    }
}

pub async fn forgot_password(
    auth: web::Data<AuthService>,
    body: web::Json<ForgotPasswordRequest>,
) -> HttpResponse {
    let email = match body.email.as_deref().filter(|v| !v.is_empty()) {
        Some(email) => email,
        None => {
            return HttpResponse::UnprocessableEntity()
                .json(ApiResponse::<()>::validation_error("email is required"))
        }
    };
    match auth.forgot_password(email).await {
        Ok(ForgotPasswordOutcome::Sent) => {
            HttpResponse::Ok().json(ApiResponse::<()>::success(()))
        }
        Ok(ForgotPasswordOutcome::NotFound) => {
            HttpResponse::Ok().json(ApiResponse::<()>::record_not_found())
        }
        Err(e) => auth_error_response(e),
    }
}

pub async fn validate_otp(
    auth: web::Data<AuthService>,
    body: web::Json<ValidateOtpRequest>,
) -> HttpResponse {
    let otp = match body.otp.as_deref().filter(|v| !v.is_empty()) {
        Some(otp) => otp,
        None => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::bad_request(
                "Insufficient parameters: otp is required",
            ))
        }
    };
    match auth.validate_otp(otp).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()>::success(())),
        Err(e) => auth_error_response(e),
    }
}

pub async fn reset_password(
    auth: web::Data<AuthService>,
    body: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    let code = body.code.as_deref().filter(|v| !v.is_empty());
    let new_password = body.new_password.as_deref().filter(|v| !v.is_empty());
    let (code, new_password) = match (code, new_password) {
        (Some(code), Some(new_password)) => (code, new_password),
        _ => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::bad_request(
                "Insufficient parameters: code and newPassword are required",
            ))
        }
    };
    match auth.reset_password(code, new_password).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()>::success(())),
        Err(e) => auth_error_response(e),
    }
}
