use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use nutritrack::services::mailer::NoopMailer;
use nutritrack::store::{AccountStore, MemoryAccountStore};

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<MemoryAccountStore>,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryAccountStore::new());
        let app = nutritrack::create_app(store.clone(), Arc::new(NoopMailer)).await;
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, store }
    }

    /// Register an account and return its id.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .server
            .post("/api/users")
            .json(&json!({
                "name": "Test User",
                "email": email,
                "password": test_password()
            }))
            .await;

        let body: serde_json::Value = response.json();
        body["user"]["id"].as_str().expect("registration failed").to_string()
    }

    /// Pull the pending verification token straight from the store.
    pub async fn verification_token(&self, email: &str) -> String {
        self.store
            .find_by_email(email)
            .await
            .unwrap()
            .expect("account not found")
            .verification_token
            .expect("no verification token")
    }

    /// Pull the open reset token straight from the store.
    pub async fn reset_token(&self, email: &str) -> String {
        self.store
            .find_by_email(email)
            .await
            .unwrap()
            .expect("account not found")
            .password_reset_token
            .expect("no reset token")
    }

    /// Register and activate an account, returning its id.
    pub async fn register_activated(&self, email: &str) -> String {
        let id = self.register(email).await;
        let token = self.verification_token(email).await;
        self.server.get(&format!("/verify/{token}")).await;
        id
    }
}

// Helper to generate unique test email
#[allow(dead_code)]
pub fn test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

// Helper to generate test password
#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "TestPassword123!"
}
