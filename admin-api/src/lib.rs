use std::sync::Arc;

use actix_web::web;

use ecom_database::{CartStore, OrderStore, RouteRoleStore, UserStore};
use ecom_middleware::{AuthMiddlewareFactory, RequireUserType};
use ecom_models::auth::user_types;

pub mod handlers;
pub mod services;

use services::AuthService;

/// Shared store handles injected into the actix app. Constructed once at
/// startup (or per-test) and cloned into each worker.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub carts: Arc<dyn CartStore>,
    pub orders: Arc<dyn OrderStore>,
    pub route_roles: Arc<dyn RouteRoleStore>,
}

/// Mount the full route tree:
///
/// * `/admin/auth/*` is public.
/// * everything else under `/admin` requires a bearer token.
/// * `/admin/routeRole/*` additionally requires an admin user type.
pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    auth: AuthService,
    stores: Stores,
    jwt_secret: &str,
) {
    cfg.app_data(web::Data::new(auth))
        .app_data(web::Data::from(stores.users.clone()))
        .app_data(web::Data::from(stores.carts.clone()))
        .app_data(web::Data::from(stores.orders.clone()))
        .app_data(web::Data::from(stores.route_roles.clone()))
        .service(
            web::scope("/admin")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(handlers::auth::register))
                        .route("/login", web::post().to(handlers::auth::login))
                        .route(
                            "/forgot-password",
                            web::post().to(handlers::auth::forgot_password),
                        )
                        .route(
                            "/validate-otp",
                            web::post().to(handlers::auth::validate_otp),
                        )
                        .route(
                            "/reset-password",
                            web::put().to(handlers::auth::reset_password),
                        ),
                )
                .service(
                    web::scope("")
                        .wrap(AuthMiddlewareFactory::new(jwt_secret.to_string()))
                        .route("/user/{id}", web::get().to(handlers::user::get_user))
                        .route("/cart/addBulk", web::post().to(handlers::cart::add_bulk))
                        .route("/cart/{id}", web::get().to(handlers::cart::get_cart))
                        .route("/order/addBulk", web::post().to(handlers::order::add_bulk))
                        .route("/order/{id}", web::get().to(handlers::order::get_order))
                        .service(
                            web::scope("/routeRole")
                                .wrap(RequireUserType::new(vec![user_types::ADMIN]))
                                .route(
                                    "/addBulk",
                                    web::post().to(handlers::route_role::add_bulk),
                                )
                                .route(
                                    "/{id}",
                                    web::get().to(handlers::route_role::get_route_role),
                                ),
                        ),
                ),
        );
}
