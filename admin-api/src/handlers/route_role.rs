use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use ecom_database::RouteRoleStore;
use ecom_models::route_role::{RouteRole, RouteRoleInput};
use ecom_models::ApiResponse;

use super::{actor_id, store_error_response, BulkBody, BulkCount};

/// Admin-only: bulk-insert route/role mappings.
pub async fn add_bulk(
    req: HttpRequest,
    route_roles: web::Data<dyn RouteRoleStore>,
    body: web::Json<BulkBody<RouteRoleInput>>,
) -> HttpResponse {
    if body.data.is_empty() {
        return HttpResponse::UnprocessableEntity()
            .json(ApiResponse::<()>::validation_error("data must not be empty"));
    }

    let actor = actor_id(&req);
    let records: Vec<RouteRole> = body
        .into_inner()
        .data
        .into_iter()
        .map(|mut input| {
            input.added_by = input.added_by.or(actor);
            RouteRole::from_input(input)
        })
        .collect();

    match route_roles.insert_many(&records).await {
        Ok(count) => HttpResponse::Ok().json(ApiResponse::success(BulkCount { count })),
        Err(e) => store_error_response(e),
    }
}

pub async fn get_route_role(
    route_roles: web::Data<dyn RouteRoleStore>,
    id: web::Path<Uuid>,
) -> HttpResponse {
    match route_roles.find_by_id(*id).await {
        Ok(Some(route_role)) => HttpResponse::Ok().json(ApiResponse::success(route_role)),
        Ok(None) => HttpResponse::Ok().json(ApiResponse::<()>::record_not_found()),
        Err(e) => store_error_response(e),
    }
}
