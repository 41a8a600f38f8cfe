use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(controller::list_users).post(controller::create_user),
        )
        .route("/email/{email}", get(controller::get_user_by_email))
        .route(
            "/{id}",
            get(controller::get_user)
                .put(controller::update_user)
                .delete(controller::delete_user),
        )
        .route(
            "/{id}/verify-password",
            post(controller::verify_user_password),
        )
        .route("/{id}/stats", get(controller::get_user_stats))
}
