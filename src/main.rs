use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nutritrack::config::{environment::Config, init_db};
use nutritrack::services::mailer::{NoopMailer, Notifier, ResendMailer};
use nutritrack::store::{AccountStore, MySqlAccountStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutritrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url).await;
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Connected to MySQL");

    let store: Arc<dyn AccountStore> = Arc::new(MySqlAccountStore::new(db));

    let notifier: Arc<dyn Notifier> = match &config.resend_api_key {
        Some(key) => Arc::new(ResendMailer::new(
            key.clone(),
            config.from_email.clone(),
            config.app_url.clone(),
        )),
        None => {
            tracing::warn!("RESEND_API_KEY not set, email delivery disabled");
            Arc::new(NoopMailer)
        }
    };

    let app = nutritrack::create_app(store, notifier).await;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();
    tracing::info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}
