use std::sync::Arc;

use actix_web::{test, App};
use serde_json::{json, Value};

use ecom_admin::services::{AuthPolicy, AuthService, LogNotifier, OtpGenerator, TokenIssuer};
use ecom_admin::{configure_routes, Stores};
use ecom_database::{MemoryCartStore, MemoryOrderStore, MemoryRouteRoleStore, MemoryUserStore};

const JWT_SECRET: &str = "integration_test_secret";

struct TestState {
    auth: AuthService,
    stores: Stores,
    carts: Arc<MemoryCartStore>,
    orders: Arc<MemoryOrderStore>,
}

fn test_state() -> TestState {
    let users = Arc::new(MemoryUserStore::new());
    let carts = Arc::new(MemoryCartStore::new());
    let orders = Arc::new(MemoryOrderStore::new());
    let stores = Stores {
        users: users.clone(),
        carts: carts.clone(),
        orders: orders.clone(),
        route_roles: Arc::new(MemoryRouteRoleStore::new()),
    };
    let auth = AuthService::new(
        users,
        Arc::new(LogNotifier),
        Arc::new(TokenIssuer::new(JWT_SECRET, 24)),
        Arc::new(OtpGenerator::new(6)),
        AuthPolicy {
            otp_ttl_minutes: 20,
            max_login_retry: 3,
            login_lockout_minutes: 20,
        },
    );
    TestState {
        auth,
        stores,
        carts,
        orders,
    }
}

macro_rules! test_app {
    ($state:expr) => {{
        let auth = $state.auth.clone();
        let stores = $state.stores.clone();
        test::init_service(
            App::new()
                .configure(move |cfg| configure_routes(cfg, auth, stores, JWT_SECRET)),
        )
        .await
    }};
}

/// Register a user and log in, returning `(id, token)`.
macro_rules! register_and_login {
    ($app:expr, $username:expr, $password:expr, $email:expr, $user_type:expr) => {{
        let resp = test::call_service(
            $app,
            test::TestRequest::post()
                .uri("/admin/auth/register")
                .set_json(register_body($username, $password, $email, $user_type))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "SUCCESS");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let resp = test::call_service(
            $app,
            test::TestRequest::post()
                .uri("/admin/auth/login")
                .set_json(json!({ "username": $username, "password": $password }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "SUCCESS");
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["id"].as_str().unwrap(), id);

        (id, token)
    }};
}

fn register_body(username: &str, password: &str, email: &str, user_type: i32) -> Value {
    json!({
        "username": username,
        "password": password,
        "email": email,
        "name": "Test User",
        "userType": user_type,
    })
}

#[actix_web::test]
async fn register_rejects_duplicates_and_bad_input() {
    let state = test_state();
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/register")
            .set_json(register_body("alice", "secret123", "alice@example.com", 2))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // Same username again.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/register")
            .set_json(register_body("alice", "other", "alice2@example.com", 2))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "BAD_REQUEST");

    // Malformed email.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/register")
            .set_json(register_body("bob", "secret123", "not-an-email", 2))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "VALIDATION_ERROR");

    // Missing password.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/register")
            .set_json(json!({ "username": "carol", "email": "carol@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn login_locks_out_after_repeated_failures() {
    let state = test_state();
    let app = test_app!(state);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/register")
            .set_json(register_body("dave", "secret123", "dave@example.com", 2))
            .to_request(),
    )
    .await;

    for _ in 0..3 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/admin/auth/login")
                .set_json(json!({ "username": "dave", "password": "wrong" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid username or password");
    }

    // Correct credentials are refused while the account is locked.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/login")
            .set_json(json!({ "username": "dave", "password": "secret123" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Account is locked, please retry after some time"
    );
}

#[actix_web::test]
async fn unknown_user_login_is_indistinguishable_from_wrong_password() {
    let state = test_state();
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/login")
            .set_json(json!({ "username": "ghost", "password": "whatever" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "BAD_REQUEST");
    assert_eq!(body["message"], "Invalid username or password");
}

#[actix_web::test]
async fn full_password_reset_flow() {
    let state = test_state();
    let app = test_app!(state);

    let (id, token) =
        register_and_login!(&app, "erin", "oldPassword1", "erin@example.com", 2);

    // Request a reset code.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/forgot-password")
            .set_json(json!({ "email": "erin@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "SUCCESS");

    // The issued code is visible on the user record.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/admin/user/{id}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let code = body["data"]["resetPasswordLink"]["code"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(body["data"].get("password").is_none());

    // Validation does not consume the code.
    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/admin/auth/validate-otp")
                .set_json(json!({ "otp": code }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "SUCCESS");
    }

    // Actually reset.
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/admin/auth/reset-password")
            .set_json(json!({ "code": code, "newPassword": "newPassword1" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // Old password no longer works, new one does.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/login")
            .set_json(json!({ "username": "erin", "password": "oldPassword1" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/login")
            .set_json(json!({ "username": "erin", "password": "newPassword1" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // The consumed code is dead.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/validate-otp")
            .set_json(json!({ "otp": code }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid OTP");
}

#[actix_web::test]
async fn forgot_password_with_unknown_email_reports_not_found() {
    let state = test_state();
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/auth/forgot-password")
            .set_json(json!({ "email": "nobody@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "RECORD_NOT_FOUND");
}

#[actix_web::test]
async fn protected_routes_require_a_bearer_token() {
    let state = test_state();
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/admin/user/{}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "UNAUTHORIZED");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/cart/addBulk")
            .insert_header(("Authorization", "Bearer not-a-real-token"))
            .set_json(json!({ "data": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn cart_bulk_insert_and_lookup() {
    let state = test_state();
    let app = test_app!(state);

    let (id, token) =
        register_and_login!(&app, "frank", "secret123", "frank@example.com", 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/cart/addBulk")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "data": [
                    { "items": [ { "productId": "p1", "qty": 2 } ] },
                    { "items": [ { "productId": "p2", "qty": 1 } ] },
                ]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["count"], 2);

    // addedBy defaulted to the caller.
    let cart = state.carts.all().remove(0);
    assert_eq!(cart.added_by.unwrap().to_string(), id);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/admin/cart/{}", cart.id))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["data"]["items"][0]["productId"], cart.items[0].product_id);

    // Unknown id is a benign not-found on a 200.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/admin/cart/{}", uuid::Uuid::new_v4()))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "RECORD_NOT_FOUND");

    // Empty batch is a validation failure.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/cart/addBulk")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({ "data": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 422);
}

#[actix_web::test]
async fn order_bulk_insert_computes_totals() {
    let state = test_state();
    let app = test_app!(state);

    let (_, token) =
        register_and_login!(&app, "grace", "secret123", "grace@example.com", 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/order/addBulk")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "data": [
                    {
                        "orderId": "ORD-1",
                        "items": [
                            { "productId": "p1", "qty": 2, "price": 9.5 },
                            { "productId": "p2", "qty": 1, "price": 10.0 },
                        ]
                    }
                ]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let order = state.orders.all().remove(0);
    assert_eq!(order.total, 29.0);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/admin/order/{}", order.id))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 29.0);
}

#[actix_web::test]
async fn route_role_endpoints_are_admin_only() {
    let state = test_state();
    let app = test_app!(state);

    let (_, user_token) =
        register_and_login!(&app, "henry", "secret123", "henry@example.com", 2);
    let (_, admin_token) =
        register_and_login!(&app, "root", "secret123", "root@example.com", 1);

    let batch = json!({
        "data": [
            { "routeId": uuid::Uuid::new_v4(), "roleId": uuid::Uuid::new_v4() }
        ]
    });

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/routeRole/addBulk")
            .insert_header(("Authorization", format!("Bearer {user_token}")))
            .set_json(batch.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/routeRole/addBulk")
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .set_json(batch)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["count"], 1);
}
