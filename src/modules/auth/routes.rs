use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(controller::login))
        .route("/logout", post(controller::logout))
        .route("/password-reset/request", post(controller::request_password_reset))
        .route("/password-reset/verify/{token}", get(controller::verify_reset_token))
        .route("/password-reset/reset/{token}", post(controller::reset_password))
}

pub fn verification_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/resend", post(controller::resend_verification))
        .route("/{token}", get(controller::verify_account))
}
