use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use lumina_crmservice::{app_state::AppState, routes};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new();
    let routes = routes::auth::routes_with_openapi()
        .merge(routes::customers::routes_with_openapi())
        .merge(routes::orders::routes_with_openapi())
        .merge(routes::otp::routes_with_openapi())
        .merge(routes::catalog::routes_with_openapi())
        .merge(routes::staff::routes_with_openapi());
    let (router, _openapi) = routes.split_for_parts();
    Router::new().nest("/api", router).with_state(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_token(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

#[tokio::test]
async fn login_returns_token_and_session_user() {
    let (status, body) = send(
        app(),
        post("/api/auth/login", json!({"username": "staff", "password": "password"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().unwrap().starts_with("mock_token_staff_001_"));
    assert_eq!(body["data"]["user"]["username"], "staff");
    assert_eq!(body["data"]["user"]["role"], "staff");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (status, body) = send(
        app(),
        post("/api/auth/login", json!({"username": "staff", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn me_resolves_staff_from_token() {
    let (status, body) = send(
        app(),
        with_token(get("/api/auth/me"), "mock_token_staff_002_1700000000000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "staff_002");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn me_rejects_missing_token() {
    let (status, body) = send(app(), get("/api/auth/me")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn customer_search_is_case_insensitive() {
    let (status, body) = send(app(), get("/api/customer/search?q=NARA")).await;

    assert_eq!(status, StatusCode::OK);
    let matches = body["data"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["id"], "cust_001");
}

#[tokio::test]
async fn customer_search_requires_query() {
    let (status, _) = send(app(), get("/api/customer/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_fetch_unknown_id_is_404() {
    let (status, body) = send(app(), get("/api/customer/cust_missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn create_customer_rejects_duplicate_phone() {
    let app = app();

    let (status, body) = send(
        app.clone(),
        post(
            "/api/customer/create",
            json!({"first_name": "New", "last_name": "Customer", "phone": "0812345678"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Phone number already registered");

    // The registry must not have been mutated.
    let (_, body) = send(app, get("/api/customer/search?q=0812345678")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_then_update_customer_roundtrip() {
    let app = app();

    let (status, body) = send(
        app.clone(),
        post(
            "/api/customer/create",
            json!({
                "first_name": "Mali",
                "last_name": "Prasert",
                "phone": "0866666666",
                "email": "mali@example.com",
                "phone_verified": true
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["tier"], "silver");
    assert!(body["data"]["member_no"].as_str().unwrap().starts_with("LUM-"));

    let patch = Request::builder()
        .method("PATCH")
        .uri(format!("/api/customer/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"first_name": "X"}).to_string()))
        .unwrap();
    let (status, body) = send(app.clone(), patch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "X");

    let (_, body) = send(app, get(&format!("/api/customer/{id}"))).await;
    assert_eq!(body["data"]["first_name"], "X");
    assert_eq!(body["data"]["last_name"], "Prasert");
}

#[tokio::test]
async fn update_rejects_phone_of_another_customer() {
    let app = app();

    // cust_002 tries to take cust_001's phone.
    let patch = Request::builder()
        .method("PATCH")
        .uri("/api/customer/cust_002")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"phone": "0812345678"}).to_string()))
        .unwrap();
    let (status, body) = send(app.clone(), patch).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Phone number already registered");

    let (_, body) = send(app, get("/api/customer/cust_002")).await;
    assert_eq!(body["data"]["phone"], "0823456789");
}

#[tokio::test]
async fn register_finalizes_pending_customer() {
    let (status, body) = send(
        app(),
        post(
            "/api/customer/register",
            json!({"customer_id": "cust_001", "marketing_consent": true}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customer"]["status"], "active");
    assert_eq!(body["data"]["customer"]["marketing_consent"], true);
    assert!(body["data"]["registered_at"].is_string());
    assert_eq!(body["message"], "Registration completed successfully");
}

#[tokio::test]
async fn points_summary_folds_seeded_history() {
    let (status, body) = send(app(), get("/api/customer/cust_001/points")).await;

    assert_eq!(status, StatusCode::OK);
    // Seeded: +120 (1y expiry), +50 promo (335d expiry), -30 used.
    assert_eq!(body["data"]["available_points"], 140);
    assert_eq!(body["data"]["points_expiring_soon"], 0);
    assert_eq!(body["data"]["total_earned"], 170);
    assert_eq!(body["data"]["total_used"], 30);
}

#[tokio::test]
async fn points_history_is_newest_first() {
    let (status, body) = send(app(), get("/api/customer/cust_001/points/history")).await;

    assert_eq!(status, StatusCode::OK);
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["type"], "earned");
}

#[tokio::test]
async fn order_create_computes_totals() {
    let (status, body) = send(
        app(),
        post(
            "/api/order/create",
            json!({
                "customer_id": "cust_001",
                "store_id": "store_001",
                "discount": 100,
                "items": [
                    {
                        "product_id": "prod_001",
                        "product_code": "LUM-HL-200",
                        "product_name": "Lumina Hydra Lotion",
                        "quantity": 2,
                        "unit_price": 1200
                    },
                    {
                        "product_id": "prod_003",
                        "product_code": "LUM-HW-150",
                        "product_name": "Lumina Hydra Foaming Wash",
                        "quantity": 1,
                        "unit_price": 850
                    }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subtotal"], 3250.0);
    assert_eq!(body["data"]["total"], 3150.0);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["items"][0]["total_price"], 2400.0);
}

#[tokio::test]
async fn order_totals_keep_full_precision() {
    // 2^24 + 1 is not representable in single precision.
    let (status, body) = send(
        app(),
        post(
            "/api/order/create",
            json!({
                "customer_id": "cust_001",
                "store_id": "store_001",
                "items": [
                    {
                        "product_id": "prod_004",
                        "product_code": "VEL-RC-30",
                        "product_name": "Velours Riche Cream",
                        "quantity": 1,
                        "unit_price": 16777217.0
                    }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subtotal"], 16777217.0);
    assert_eq!(body["data"]["total"], 16777217.0);
}

#[tokio::test]
async fn order_create_requires_items() {
    let (status, _) = send(
        app(),
        post(
            "/api/order/create",
            json!({"customer_id": "cust_001", "store_id": "store_001", "items": []}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_orders_endpoint_lists_seeded_orders() {
    let (status, body) = send(app(), get("/api/order/customer/cust_001")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn otp_send_returns_ref_code_and_bypass() {
    let (status, body) = send(
        app(),
        post("/api/otp/send", json!({"type": "phone", "phone": "0812345678"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["otp_sent"], true);
    assert_eq!(body["data"]["mock_otp"], "123456");
    assert_eq!(body["data"]["ref_code"].as_str().unwrap().len(), 6);
    assert_eq!(body["message"], "OTP sent to 5678");
}

#[tokio::test]
async fn otp_send_handles_non_ascii_phone() {
    let (status, body) = send(
        app(),
        post("/api/otp/send", json!({"type": "phone", "phone": "โทรศัพท์"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["otp_sent"], true);
    assert!(body["message"].as_str().unwrap().starts_with("OTP sent to "));
}

#[tokio::test]
async fn otp_verify_rejects_bad_format() {
    let (status, body) = send(
        app(),
        post(
            "/api/otp/verify",
            json!({"type": "phone", "otp": "12a456", "phone": "0812345678"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid OTP format");
}

#[tokio::test]
async fn otp_verify_accepts_any_six_digit_code() {
    let (status, body) = send(
        app(),
        post(
            "/api/otp/verify",
            json!({"type": "email", "otp": "987654", "email": "a@b.example"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], true);
}

#[tokio::test]
async fn product_list_supports_search() {
    let app = app();

    let (_, body) = send(app.clone(), get("/api/product/list")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let (_, body) = send(app, get("/api/product/list?q=velours")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn store_list_supports_search() {
    let (_, body) = send(app(), get("/api/store/list?q=counter")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn staff_profile_requires_token() {
    let (status, _) = send(app(), get("/api/staff/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_flow() {
    let app = app();
    let token = "mock_token_staff_001_1700000000000";

    // Wrong current password.
    let (status, body) = send(
        app.clone(),
        with_token(
            post(
                "/api/staff/change-password",
                json!({"currentPassword": "wrong", "newPassword": "newpass1"}),
            ),
            token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Current password is incorrect");

    // Too-short replacement.
    let (status, _) = send(
        app.clone(),
        with_token(
            post(
                "/api/staff/change-password",
                json!({"currentPassword": "password", "newPassword": "abc"}),
            ),
            token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Success, then the new password works for login.
    let (status, _) = send(
        app.clone(),
        with_token(
            post(
                "/api/staff/change-password",
                json!({"currentPassword": "password", "newPassword": "newpass1"}),
            ),
            token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app,
        post("/api/auth/login", json!({"username": "staff", "password": "newpass1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn staff_profile_update_keeps_username() {
    let (status, body) = send(
        app(),
        with_token(
            Request::builder()
                .method("PATCH")
                .uri("/api/staff/profile")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"name": "Renamed"}).to_string()))
                .unwrap(),
            "mock_token_staff_001_1700000000000",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["username"], "staff");
}
