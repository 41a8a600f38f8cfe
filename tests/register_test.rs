mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{test_email, test_password, TestContext};
use nutritrack::store::AccountStore;

#[tokio::test]
async fn register_creates_inactive_account_with_pending_token() {
    let ctx = TestContext::new().await;
    let email = test_email();

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["is_active"], false);
    assert_eq!(body["user"]["email"], email);

    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(!account.is_active);
    let token = account.verification_token.expect("token should be issued");
    assert_eq!(token.len(), 64);
    assert!(account.verification_expires.is_some());
}

#[tokio::test]
async fn register_response_never_exposes_secrets() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": test_email(),
            "password": test_password()
        }))
        .await;

    let body: serde_json::Value = response.json();
    let user = body["user"].as_object().unwrap();
    assert!(!user.contains_key("password_hash"));
    assert!(!user.contains_key("verification_token"));
    assert!(!user.contains_key("verification_expires"));
    assert!(!user.contains_key("password_reset_token"));
}

#[tokio::test]
async fn register_normalizes_email() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": "MiXeD.Case@Example.COM",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["email"], "mixed.case@example.com");
}

#[tokio::test]
async fn register_with_duplicate_email_returns_conflict() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Other User",
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn register_with_invalid_email_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": "not-an-email",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_weak_password_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": test_email(),
            "password": "abc"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PASSWORD_POLICY");
}

#[tokio::test]
async fn register_with_short_name_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "A",
            "email": test_email(),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_out_of_range_age_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": test_email(),
            "password": test_password(),
            "age": 200
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_missing_field_is_rejected() {
    let ctx = TestContext::new().await;

    // Malformed shape is rejected before it reaches the handler.
    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({ "name": "Test User" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_with_unknown_field_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": test_email(),
            "password": test_password(),
            "is_active": true
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_with_measurements_reports_bmi() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": test_email(),
            "password": test_password(),
            "weight_kg": 70.0,
            "height_cm": 175.0
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["bmi"], 22.86);
    assert_eq!(body["user"]["weight_status"], "normal weight");
}
