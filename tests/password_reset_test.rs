mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::{test_email, test_password, TestContext};
use nutritrack::store::AccountStore;

#[tokio::test]
async fn request_for_unknown_email_returns_generic_success() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_activated(&email).await;

    let existing = ctx
        .server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;

    let unknown = ctx
        .server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;

    existing.assert_status(StatusCode::OK);
    unknown.assert_status(StatusCode::OK);

    // Same response shape whether or not the address is registered.
    let a: serde_json::Value = existing.json();
    let b: serde_json::Value = unknown.json();
    assert_eq!(a, b);
}

#[tokio::test]
async fn request_for_unverified_account_returns_forbidden() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let response = ctx
        .server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "ACCOUNT_NOT_ACTIVATED");

    // No reset window was opened.
    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(account.password_reset_token.is_none());
}

#[tokio::test]
async fn request_opens_one_hour_reset_window() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_activated(&email).await;

    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await
        .assert_status(StatusCode::OK);

    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    let token = account.password_reset_token.expect("reset token issued");
    assert_eq!(token.len(), 64);

    let expires = account.password_reset_expires.unwrap();
    let window = expires - Utc::now();
    assert!(window > Duration::minutes(59));
    assert!(window <= Duration::hours(1));
}

#[tokio::test]
async fn new_request_invalidates_previous_token() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_activated(&email).await;

    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let first = ctx.reset_token(&email).await;

    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let second = ctx.reset_token(&email).await;

    assert_ne!(first, second);

    ctx.server
        .get(&format!("/auth/password-reset/verify/{first}"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .get(&format!("/auth/password-reset/verify/{second}"))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn verify_returns_identity_without_consuming() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_activated(&email).await;
    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let token = ctx.reset_token(&email).await;

    let response = ctx
        .server
        .get(&format!("/auth/password-reset/verify/{token}"))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], email);
    assert_eq!(body["name"], "Test User");

    // Read-only: the same token still verifies.
    ctx.server
        .get(&format!("/auth/password-reset/verify/{token}"))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn verify_unknown_token_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/auth/password-reset/verify/0000000000000000000000000000000000000000000000000000000000000000")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn verify_expired_token_reads_as_unknown() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let id = ctx.register_activated(&email).await;
    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let token = ctx.reset_token(&email).await;

    ctx.store
        .set_reset_token(&id, &token, Utc::now() - Duration::minutes(1), Utc::now())
        .await
        .unwrap();

    let response = ctx
        .server
        .get(&format!("/auth/password-reset/verify/{token}"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn mismatched_confirmation_leaves_token_valid() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_activated(&email).await;
    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let token = ctx.reset_token(&email).await;

    let response = ctx
        .server
        .post(&format!("/auth/password-reset/reset/{token}"))
        .json(&json!({
            "password": "NewPassword123!",
            "password_confirm": "Different123!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PASSWORD_MISMATCH");

    ctx.server
        .get(&format!("/auth/password-reset/verify/{token}"))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn weak_password_leaves_token_valid() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_activated(&email).await;
    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let token = ctx.reset_token(&email).await;

    let response = ctx
        .server
        .post(&format!("/auth/password-reset/reset/{token}"))
        .json(&json!({
            "password": "abc",
            "password_confirm": "abc"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PASSWORD_POLICY");

    ctx.server
        .get(&format!("/auth/password-reset/verify/{token}"))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn successful_reset_rotates_password_and_consumes_token() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_activated(&email).await;
    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let token = ctx.reset_token(&email).await;

    let response = ctx
        .server
        .post(&format!("/auth/password-reset/reset/{token}"))
        .json(&json!({
            "password": "NewPassword123!",
            "password_confirm": "NewPassword123!"
        }))
        .await;

    response.assert_status(StatusCode::OK);

    // New password works, old one does not.
    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": "NewPassword123!" }))
        .await
        .assert_status(StatusCode::OK);

    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Token is gone; replay fails.
    let replay = ctx
        .server
        .post(&format!("/auth/password-reset/reset/{token}"))
        .json(&json!({
            "password": "AnotherPass123!",
            "password_confirm": "AnotherPass123!"
        }))
        .await;

    replay.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = replay.json();
    assert_eq!(body["code"], "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn expired_token_cannot_reset() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let id = ctx.register_activated(&email).await;
    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let token = ctx.reset_token(&email).await;

    ctx.store
        .set_reset_token(&id, &token, Utc::now() - Duration::minutes(1), Utc::now())
        .await
        .unwrap();

    let response = ctx
        .server
        .post(&format!("/auth/password-reset/reset/{token}"))
        .json(&json!({
            "password": "NewPassword123!",
            "password_confirm": "NewPassword123!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "TOKEN_EXPIRED");

    // The old password still works after a failed reset.
    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn deleted_account_token_cannot_reset() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let id = ctx.register_activated(&email).await;
    ctx.server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": &email }))
        .await;
    let token = ctx.reset_token(&email).await;

    ctx.server
        .delete(&format!("/api/users/{id}"))
        .await
        .assert_status(StatusCode::OK);

    let response = ctx
        .server
        .post(&format!("/auth/password-reset/reset/{token}"))
        .json(&json!({
            "password": "NewPassword123!",
            "password_confirm": "NewPassword123!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn request_with_invalid_email_format_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/password-reset/request")
        .json(&json!({ "email": "not-an-email" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
