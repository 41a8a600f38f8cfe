use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::services::tokens;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Email API returned status: {0}")]
    Api(String),
}

/// Outbound notifications. Every send is best-effort from the caller's
/// point of view: a failed email never rolls back a persisted transition.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_welcome(&self, email: &str, name: &str, token: &str) -> Result<(), MailerError>;
    async fn send_account_activated(&self, email: &str, name: &str) -> Result<(), MailerError>;
    async fn send_password_reset(&self, email: &str, name: &str, token: &str)
        -> Result<(), MailerError>;
    async fn send_reset_confirmed(&self, email: &str, name: &str) -> Result<(), MailerError>;
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Resend API client
/// Handles transactional email delivery over the Resend HTTP API.
pub struct ResendMailer {
    client: Client,
    api_key: String,
    from_email: String,
    app_url: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from_email: String, app_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            from_email,
            app_url,
            base_url: "https://api.resend.com".to_string(),
        }
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        let url = format!("{}/emails", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&SendEmailRequest {
                from: &self.from_email,
                to: [to],
                subject,
                html,
            })
            .send()
            .await
            .map_err(|e| MailerError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailerError::Api(response.status().to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for ResendMailer {
    async fn send_welcome(&self, email: &str, name: &str, token: &str) -> Result<(), MailerError> {
        let verify_url = format!("{}/verify/{}", self.app_url, token);
        let html = format!(
            "<h2>Welcome, {name}!</h2>\
             <p>Thanks for signing up. Click the link below to activate your account:</p>\
             <p><a href=\"{verify_url}\">Verify my account</a></p>\
             <p>This verification link expires in 24 hours.</p>\
             <p>If you did not create this account, you can ignore this email.</p>"
        );
        self.send(email, "Welcome! Please verify your account", &html).await
    }

    async fn send_account_activated(&self, email: &str, name: &str) -> Result<(), MailerError> {
        let html = format!(
            "<h2>Congratulations, {name}!</h2>\
             <p>Your account has been activated. You can now sign in and use all features.</p>"
        );
        self.send(email, "Your account is activated", &html).await
    }

    async fn send_password_reset(
        &self,
        email: &str,
        name: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        let reset_url = format!("{}/auth/password-reset/verify/{}", self.app_url, token);
        let html = format!(
            "<h2>Hello, {name}!</h2>\
             <p>We received a request to reset the password for your account.</p>\
             <p><a href=\"{reset_url}\">Reset my password</a></p>\
             <p>This link expires in 1 hour. If you did not request a reset, ignore this \
             email; your current password stays unchanged.</p>"
        );
        self.send(email, "Reset your password", &html).await
    }

    async fn send_reset_confirmed(&self, email: &str, name: &str) -> Result<(), MailerError> {
        let html = format!(
            "<h2>Hello, {name}!</h2>\
             <p>Your password was changed successfully. All previous reset links are now \
             invalid.</p>\
             <p>If you did not make this change, contact support immediately.</p>"
        );
        self.send(email, "Your password was changed", &html).await
    }
}

/// Stand-in used when no email API key is configured (local runs, tests).
/// Logs the would-be delivery instead of sending anything.
pub struct NoopMailer;

#[async_trait]
impl Notifier for NoopMailer {
    async fn send_welcome(&self, email: &str, _name: &str, token: &str) -> Result<(), MailerError> {
        tracing::debug!(%email, token_prefix = tokens::log_prefix(token), "email delivery disabled, skipping welcome email");
        Ok(())
    }

    async fn send_account_activated(&self, email: &str, _name: &str) -> Result<(), MailerError> {
        tracing::debug!(%email, "email delivery disabled, skipping activation email");
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        _name: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        tracing::debug!(%email, token_prefix = tokens::log_prefix(token), "email delivery disabled, skipping reset email");
        Ok(())
    }

    async fn send_reset_confirmed(&self, email: &str, _name: &str) -> Result<(), MailerError> {
        tracing::debug!(%email, "email delivery disabled, skipping reset confirmation");
        Ok(())
    }
}
