use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error as ActixError, HttpMessage, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::future::{ready, Ready};
use std::rc::Rc;

use ecom_models::auth::Claims;
use ecom_models::ApiResponse;

pub const TOKEN_ISSUER: &str = "ecom-admin";

pub struct AuthMiddleware<S> {
    service: Rc<S>,
    jwt_secret: String,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
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
        let jwt_secret = self.jwt_secret.clone();

        Box::pin(async move {
            if let Some(auth_header) = req.headers().get("Authorization") {
                if let Ok(auth_str) = auth_header.to_str() {
                    if let Some(token) = auth_str.strip_prefix("Bearer ") {
                        match verify_bearer_token(token, &jwt_secret) {
                            Ok(claims) => {
                                // Make claims available to handlers downstream.
                                req.extensions_mut().insert(claims);
                                let res = service.call(req).await?;
                                return Ok(res.map_into_left_body());
                            }
                            Err(e) => {
                                tracing::warn!("bearer token verification failed: {}", e);
                                return Ok(req
                                    .into_response(HttpResponse::Unauthorized().json(
                                        ApiResponse::<()>::unauthorized(
                                            "Invalid or expired token",
                                        ),
                                    ))
                                    .map_into_right_body());
                            }
                        }
                    }
                }
            }

            Ok(req
                .into_response(HttpResponse::Unauthorized().json(
                    ApiResponse::<()>::unauthorized("Authentication required"),
                ))
                .map_into_right_body())
        })
    }
}

#[derive(Clone)]
pub struct AuthMiddlewareFactory {
    jwt_secret: String,
}

impl AuthMiddlewareFactory {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
            jwt_secret: self.jwt_secret.clone(),
        }))
    }
}

fn verify_bearer_token(token: &str, jwt_secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use chrono::Utc;
    use ecom_models::auth::user_types;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test_secret";

    fn token_with_expiry(exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "Daija_Schuppe".to_string(),
            user_type: user_types::ADMIN,
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
            iss: TOKEN_ISSUER.to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn protected() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddlewareFactory::new(SECRET.to_string()))
                    .route("/ping", web::get().to(protected)),
            ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert_eq!(res.status(), 401);
    }

    #[actix_web::test]
    async fn valid_token_passes_through() {
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddlewareFactory::new(SECRET.to_string()))
                    .route("/ping", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("Authorization", format!("Bearer {}", token_with_expiry(3600))))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());
    }

    #[actix_web::test]
    async fn expired_token_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddlewareFactory::new(SECRET.to_string()))
                    .route("/ping", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("Authorization", format!("Bearer {}", token_with_expiry(-3600))))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);
    }
}
