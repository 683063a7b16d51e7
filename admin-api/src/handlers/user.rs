use actix_web::{web, HttpResponse};
use uuid::Uuid;

use ecom_database::UserStore;
use ecom_models::ApiResponse;

use super::store_error_response;

/// Fetch a single user by id. The password hash never appears in the body;
/// everything else, reset-code bookkeeping included, is returned as stored.
pub async fn get_user(users: web::Data<dyn UserStore>, id: web::Path<Uuid>) -> HttpResponse {
    match users.find_by_id(*id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(ApiResponse::success(user)),
        Ok(None) => HttpResponse::Ok().json(ApiResponse::<()>::record_not_found()),
        Err(e) => store_error_response(e),
    }
}
