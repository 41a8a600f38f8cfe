pub mod config;
pub mod modules;
pub mod services;
pub mod store;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use modules::auth::{auth_routes, verification_routes};
use modules::users::user_routes;
use services::mailer::Notifier;
use services::security::security_headers;
use store::AccountStore;

pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub notifier: Arc<dyn Notifier>,
}

pub async fn create_app(store: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Router {
    let state = Arc::new(AppState { store, notifier });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", auth_routes())
        .nest("/verify", verification_routes())
        .nest("/api/users", user_routes())
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "NutriTrack API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
