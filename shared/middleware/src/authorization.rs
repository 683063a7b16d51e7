use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error as ActixError, HttpMessage, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use ecom_models::auth::Claims;
use ecom_models::ApiResponse;

/// Restricts a scope to the given numeric user types. Runs after
/// `AuthMiddleware`, which put the verified claims into request extensions.
#[derive(Clone)]
pub struct RequireUserType {
    allowed: Rc<Vec<i32>>,
}

impl RequireUserType {
    pub fn new(allowed: Vec<i32>) -> Self {
        Self {
            allowed: Rc::new(allowed),
        }
    }
}

pub struct UserTypeMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<i32>>,
}

impl<S, B> Service<ServiceRequest> for UserTypeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = Rc::clone(&self.allowed);

        Box::pin(async move {
            let user_type = req.extensions().get::<Claims>().map(|c| c.user_type);

            match user_type {
                Some(user_type) if allowed.contains(&user_type) => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Some(_) => Ok(req
                    .into_response(HttpResponse::Unauthorized().json(
                        ApiResponse::<()>::unauthorized("You are not authorized to access this route"),
                    ))
                    .map_into_right_body()),
                None => Ok(req
                    .into_response(HttpResponse::Unauthorized().json(
                        ApiResponse::<()>::unauthorized("Authentication required"),
                    ))
                    .map_into_right_body()),
            }
        })
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireUserType
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Transform = UserTypeMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserTypeMiddleware {
            service: Rc::new(service),
            allowed: Rc::clone(&self.allowed),
        }))
    }
}
