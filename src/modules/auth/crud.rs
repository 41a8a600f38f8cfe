use axum::{http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::schema::ErrorResponse;
use crate::modules::users::model::Account;
use crate::services::mailer::Notifier;
use crate::services::tokens::{self, TokenKind};
use crate::services::{hashing, validation};
use crate::store::{AccountStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account not activated. Please verify your email to activate your account.")]
    AccountNotActivated,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid or unknown token")]
    TokenNotFound,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Account is already activated")]
    AlreadyActive,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountNotActivated => StatusCode::FORBIDDEN,
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
            Self::TokenNotFound => StatusCode::BAD_REQUEST,
            Self::TokenExpired => StatusCode::BAD_REQUEST,
            Self::AlreadyActive => StatusCode::BAD_REQUEST,
            Self::WeakPassword(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountNotActivated => "ACCOUNT_NOT_ACTIVATED",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::AlreadyActive => "ALREADY_ACTIVE",
            Self::WeakPassword(_) => "PASSWORD_POLICY",
            Self::Validation(_) => "VALIDATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Handler-boundary mapping. Internal details go to the log, never to
    /// the client.
    pub fn into_reply(self) -> (StatusCode, Json<ErrorResponse>) {
        if let Self::Internal(detail) = &self {
            tracing::error!(%detail, "request failed with internal error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_code("Internal server error", self.code())),
            );
        }
        (
            self.status_code(),
            Json(ErrorResponse::with_code(self.to_string(), self.code())),
        )
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::EmailAlreadyExists,
            StoreError::Database(detail) => AuthError::Internal(detail),
        }
    }
}

/// Input for account creation, already shape-validated by the schema layer.
#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_image_url: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
}

/// Minimal identity returned by the read-only reset-token check.
#[derive(Debug)]
pub struct ResetIdentity {
    pub email: String,
    pub name: String,
}

/// The account lifecycle state machine: registration, verification-token
/// and reset-token issuance/consumption, and credential checks.
///
/// Collaborators are injected; persistence atomicity lives in the store,
/// email delivery is best-effort and never rolls a transition back.
pub struct AccountLifecycle {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
}

impl AccountLifecycle {
    pub fn new(store: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Create an inactive account holding a fresh 24h verification token
    /// and send the welcome/verify email. Email failure is non-fatal: the
    /// account exists either way, just unverified.
    pub async fn register(&self, input: NewAccount) -> Result<Account, AuthError> {
        if let Err(rules) = validation::validate_password(&input.password) {
            return Err(AuthError::WeakPassword(rules.join(", ")));
        }

        let password_hash = hashing::hash_password(&input.password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let now = Utc::now();
        let token = tokens::generate_token();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: validation::normalize_email(&input.email),
            password_hash,
            profile_image_url: input.profile_image_url,
            age: input.age,
            weight_kg: input.weight_kg,
            height_cm: input.height_cm,
            is_active: false,
            verification_token: Some(token.clone()),
            verification_expires: Some(tokens::expires_at(TokenKind::Verification)),
            password_reset_token: None,
            password_reset_expires: None,
            verified_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&account).await?;
        tracing::debug!(
            email = %account.email,
            token_prefix = tokens::log_prefix(&token),
            "issued verification token"
        );

        if let Err(e) = self
            .notifier
            .send_welcome(&account.email, &account.name, &token)
            .await
        {
            tracing::warn!(error = %e, email = %account.email, "welcome email failed, account stands unverified");
        }

        Ok(account)
    }

    /// Credential check. Unknown email and wrong password produce the same
    /// error so responses do not reveal which addresses are registered.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = validation::normalize_email(email);
        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.is_active {
            return Err(AuthError::AccountNotActivated);
        }

        let valid = hashing::verify_password(password, &account.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Consume a verification token and activate the account. Absence is
    /// checked before expiry; activation itself is a single conditional
    /// mutation, so a concurrent consumer of the same token loses with
    /// `TokenNotFound`.
    pub async fn consume_verification(&self, token: &str) -> Result<Account, AuthError> {
        let now = Utc::now();
        let account = self
            .store
            .find_by_verification_token_unrestricted(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if !account.verification_expires.is_some_and(|e| now <= e) {
            return Err(AuthError::TokenExpired);
        }
        if account.is_active {
            return Err(AuthError::AlreadyActive);
        }

        let activated = self
            .store
            .activate_by_token(token, now)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        tracing::info!(email = %activated.email, "account activated");

        if let Err(e) = self
            .notifier
            .send_account_activated(&activated.email, &activated.name)
            .await
        {
            tracing::warn!(error = %e, "activation confirmation email failed");
        }

        Ok(activated)
    }

    /// Reissue a verification token, invalidating the previous one. Unknown
    /// addresses get a generic success so the endpoint cannot be used to
    /// probe for accounts.
    pub async fn resend_verification(&self, email: &str) -> Result<(), AuthError> {
        let email = validation::normalize_email(email);
        let Some(account) = self.store.find_by_email(&email).await? else {
            return Ok(());
        };

        if account.is_active {
            return Err(AuthError::AlreadyActive);
        }

        let token = tokens::generate_token();
        self.store
            .set_verification_token(
                &account.id,
                &token,
                tokens::expires_at(TokenKind::Verification),
                Utc::now(),
            )
            .await?;

        if let Err(e) = self
            .notifier
            .send_welcome(&account.email, &account.name, &token)
            .await
        {
            tracing::warn!(error = %e, "verification email failed");
        }

        Ok(())
    }

    /// Open (or replace) a 1h password-reset window. Unknown addresses get
    /// the same generic success; the one documented exception is an
    /// existing-but-unverified account, which is told to activate first.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = validation::normalize_email(email);
        let Some(account) = self.store.find_by_email(&email).await? else {
            return Ok(());
        };

        if !account.is_active {
            return Err(AuthError::AccountNotActivated);
        }

        let token = tokens::generate_token();
        self.store
            .set_reset_token(
                &account.id,
                &token,
                tokens::expires_at(TokenKind::PasswordReset),
                Utc::now(),
            )
            .await?;

        tracing::debug!(
            email = %account.email,
            token_prefix = tokens::log_prefix(&token),
            "issued password reset token"
        );

        if let Err(e) = self
            .notifier
            .send_password_reset(&account.email, &account.name, &token)
            .await
        {
            tracing::warn!(error = %e, "password reset email failed");
        }

        Ok(())
    }

    /// Read-only check of a reset token, for the reset form. An absent or
    /// expired token both answer `TokenNotFound`; the token is not consumed.
    pub async fn verify_reset_token(&self, token: &str) -> Result<ResetIdentity, AuthError> {
        let now = Utc::now();
        let account = self
            .store
            .find_by_reset_token_unrestricted(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if !account.password_reset_expires.is_some_and(|e| now <= e) {
            return Err(AuthError::TokenNotFound);
        }

        Ok(ResetIdentity {
            email: account.email,
            name: account.name,
        })
    }

    /// Consume a reset token and rotate the password. Policy failures leave
    /// the token live; the rotation itself is a single conditional mutation.
    pub async fn consume_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let now = Utc::now();
        let account = self
            .store
            .find_by_reset_token_unrestricted(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if !account.password_reset_expires.is_some_and(|e| now <= e) {
            return Err(AuthError::TokenExpired);
        }

        if let Err(rules) = validation::validate_password(new_password) {
            return Err(AuthError::WeakPassword(rules.join(", ")));
        }

        let hash = hashing::hash_password(new_password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let updated = self
            .store
            .consume_reset_token(token, &hash, now)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        tracing::info!(email = %updated.email, "password rotated via reset token");

        if let Err(e) = self
            .notifier
            .send_reset_confirmed(&updated.email, &updated.name)
            .await
        {
            tracing::warn!(error = %e, "reset confirmation email failed");
        }

        Ok(())
    }
}
