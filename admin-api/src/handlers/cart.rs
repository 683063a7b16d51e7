use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use ecom_database::CartStore;
use ecom_models::cart::{Cart, CartInput};
use ecom_models::ApiResponse;

use super::{actor_id, store_error_response, validation_response, BulkBody, BulkCount};

/// Insert a batch of carts in one shot. `addedBy` defaults to the caller
/// when the input leaves it unset.
pub async fn add_bulk(
    req: HttpRequest,
    carts: web::Data<dyn CartStore>,
    body: web::Json<BulkBody<CartInput>>,
) -> HttpResponse {
    if body.data.is_empty() {
        return HttpResponse::UnprocessableEntity()
            .json(ApiResponse::<()>::validation_error("data must not be empty"));
    }
    for input in &body.data {
        if let Err(errors) = input.validate() {
            return validation_response(&errors);
        }
    }

    let actor = actor_id(&req);
    let records: Vec<Cart> = body
        .into_inner()
        .data
        .into_iter()
        .map(|mut input| {
            input.added_by = input.added_by.or(actor);
            Cart::from_input(input)
        })
        .collect();

    match carts.insert_many(&records).await {
        Ok(count) => HttpResponse::Ok().json(ApiResponse::success(BulkCount { count })),
        Err(e) => store_error_response(e),
    }
}

pub async fn get_cart(carts: web::Data<dyn CartStore>, id: web::Path<Uuid>) -> HttpResponse {
    match carts.find_by_id(*id).await {
        Ok(Some(cart)) => HttpResponse::Ok().json(ApiResponse::success(cart)),
        Ok(None) => HttpResponse::Ok().json(ApiResponse::<()>::record_not_found()),
        Err(e) => store_error_response(e),
    }
}
