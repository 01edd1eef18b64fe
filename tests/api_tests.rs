use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use banking_ledger::application::services::{AccountService, TransactionService, UserService};
use banking_ledger::infrastructure::auth::AuthService;
use banking_ledger::web::{create_router, AppState};
use banking_ledger::InMemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_router() -> Router {
    std::env::set_var("JWT_SECRET", "test-secret");
    let store = Arc::new(InMemoryStore::new());
    let state = AppState {
        account_service: Arc::new(AccountService::new(store.clone())),
        transaction_service: Arc::new(TransactionService::new(store.clone(), store.clone())),
        user_service: Arc::new(UserService::new(store.clone(), store.clone())),
        auth_service: Arc::new(AuthService::new(store, 3600)),
    };
    create_router(state)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register_and_login(router: &Router, email: &str) -> String {
    let (status, _) = send(
        router,
        json_request(
            "POST",
            "/v1/users",
            None,
            json!({
                "email": email,
                "password": "longenough",
                "name": "Test User",
                "address": {"line1": "1 High Street", "town": "London", "postcode": "E1 6AN"},
                "phoneNumber": "07700900000"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            json!({"email": email, "password": "longenough"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_is_open() {
    let router = test_router();
    let (status, body) = send(&router, get_request("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn account_routes_require_a_bearer_token() {
    let router = test_router();
    let (status, _) = send(&router, get_request("/v1/accounts", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, get_request("/v1/accounts", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_account_and_transaction_flow_over_http() {
    let router = test_router();
    let token = register_and_login(&router, "alice@example.com").await;

    let (status, account) = send(
        &router,
        json_request(
            "POST",
            "/v1/accounts",
            Some(&token),
            json!({"name": "Checking", "accountType": "PERSONAL"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account["sortCode"], "10-10-10");
    assert_eq!(account["currency"], "GBP");
    let number = account["accountNumber"].as_str().unwrap().to_string();

    let (status, transaction) = send(
        &router,
        json_request(
            "POST",
            &format!("/v1/accounts/{}/transactions", number),
            Some(&token),
            json!({"amount": "100.50", "currency": "GBP", "type": "DEPOSIT", "reference": "payday"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(transaction["type"], "DEPOSIT");
    assert_eq!(transaction["reference"], "payday");
    let transaction_id = transaction["id"].as_i64().unwrap();

    let (status, fetched) = send(
        &router,
        get_request(&format!("/v1/accounts/{}", number), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["balance"], "100.50");

    let (status, fetched) = send(
        &router,
        get_request(
            &format!("/v1/accounts/{}/transactions/{}", number, transaction_id),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"].as_i64().unwrap(), transaction_id);

    // Overdraft surfaces as 422.
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            &format!("/v1/accounts/{}/transactions", number),
            Some(&token),
            json!({"amount": "500.00", "currency": "GBP", "type": "WITHDRAWAL"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Insufficient funds"));

    // Non-zero balance blocks deletion with 409.
    let (status, _) = send(
        &router,
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/accounts/{}", number))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn foreign_accounts_return_403_and_missing_ones_404() {
    let router = test_router();
    let alice = register_and_login(&router, "alice@example.com").await;
    let bob = register_and_login(&router, "bob@example.com").await;

    let (_, account) = send(
        &router,
        json_request(
            "POST",
            "/v1/accounts",
            Some(&alice),
            json!({"name": "Checking", "accountType": "PERSONAL"}),
        ),
    )
    .await;
    let number = account["accountNumber"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        get_request(&format!("/v1/accounts/{}", number), Some(&bob)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &router,
        get_request("/v1/accounts/99999999", Some(&bob)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_bodies_are_rejected_with_400() {
    let router = test_router();
    let token = register_and_login(&router, "carol@example.com").await;

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/v1/accounts",
            Some(&token),
            json!({"name": "", "accountType": "PERSONAL"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, account) = send(
        &router,
        json_request(
            "POST",
            "/v1/accounts",
            Some(&token),
            json!({"name": "Checking", "accountType": "PERSONAL"}),
        ),
    )
    .await;
    let number = account["accountNumber"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            &format!("/v1/accounts/{}/transactions", number),
            Some(&token),
            json!({"amount": "10.123", "currency": "GBP", "type": "DEPOSIT"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Currency mismatch is a 400 as well.
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            &format!("/v1/accounts/{}/transactions", number),
            Some(&token),
            json!({"amount": "10.00", "currency": "USD", "type": "DEPOSIT"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
