use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use ecom_database::OrderStore;
use ecom_models::order::{Order, OrderInput};
use ecom_models::ApiResponse;

use super::{actor_id, store_error_response, validation_response, BulkBody, BulkCount};

pub async fn add_bulk(
    req: HttpRequest,
    orders: web::Data<dyn OrderStore>,
    body: web::Json<BulkBody<OrderInput>>,
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
    let records: Vec<Order> = body
        .into_inner()
        .data
        .into_iter()
        .map(|mut input| {
            input.added_by = input.added_by.or(actor);
            Order::from_input(input)
        })
        .collect();

    match orders.insert_many(&records).await {
        Ok(count) => HttpResponse::Ok().json(ApiResponse::success(BulkCount { count })),
        Err(e) => store_error_response(e),
    }
}

pub async fn get_order(orders: web::Data<dyn OrderStore>, id: web::Path<Uuid>) -> HttpResponse {
    match orders.find_by_id(*id).await {
        Ok(Some(order)) => HttpResponse::Ok().json(ApiResponse::success(order)),
        Ok(None) => HttpResponse::Ok().json(ApiResponse::<()>::record_not_found()),
        Err(e) => store_error_response(e),
    }
}
