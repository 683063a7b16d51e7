use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use sqlx::PgPool;

use ecom_admin::services::{
    AuthPolicy, AuthService, LogNotifier, Notifier, OtpGenerator, SmtpNotifier, TokenIssuer,
};
use ecom_admin::{configure_routes, Stores};
use ecom_config::AppConfig;
use ecom_database::{Database, PgCartStore, PgOrderStore, PgRouteRoleStore, PgUserStore};
use ecom_models::ApiResponse;

async fn health(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
            "status": "healthy"
        }))),
        Err(e) => {
            tracing::error!("health check failed: {e}");
            HttpResponse::ServiceUnavailable()
                .json(ApiResponse::<()>::server_error("database unreachable"))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env();

    let database = Database::connect(&config.database_url, 10)
        .await
        .expect("failed to connect to database");
    database.migrate().await.expect("failed to run migrations");
    let pool = database.pool().clone();

    let stores = Stores {
        users: Arc::new(PgUserStore::new(pool.clone())),
        carts: Arc::new(PgCartStore::new(pool.clone())),
        orders: Arc::new(PgOrderStore::new(pool.clone())),
        route_roles: Arc::new(PgRouteRoleStore::new(pool.clone())),
    };

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => match SmtpNotifier::new(smtp) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                tracing::warn!("SMTP transport unavailable, logging reset codes instead: {e:#}");
                Arc::new(LogNotifier)
            }
        },
        None => {
            tracing::info!("no SMTP configured, reset codes will be logged");
            Arc::new(LogNotifier)
        }
    };

    let auth = AuthService::new(
        stores.users.clone(),
        notifier,
        Arc::new(TokenIssuer::new(&config.jwt_secret, config.token_ttl_hours)),
        Arc::new(OtpGenerator::new(config.otp_length)),
        AuthPolicy {
            otp_ttl_minutes: config.otp_ttl_minutes,
            max_login_retry: config.max_login_retry,
            login_lockout_minutes: config.login_lockout_minutes,
        },
    );

    let port = config.port;
    let jwt_secret = config.jwt_secret.clone();
    tracing::info!("starting admin API on 0.0.0.0:{port}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(pool.clone()))
            .route("/health", web::get().to(health))
            .configure(|cfg| {
                configure_routes(cfg, auth.clone(), stores.clone(), &jwt_secret)
            })
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
