use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::modules::users::model::Account;

pub mod memory;
pub mod mysql;

pub use memory::MemoryAccountStore;
pub use mysql::MySqlAccountStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::DuplicateEmail;
            }
        }
        StoreError::Database(e.to_string())
    }
}

/// Partial profile update. `None` leaves the column untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub profile_image_url: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub password_hash: Option<String>,
}

/// Account persistence. Each call is atomic; the token-consumption methods
/// are guarded conditional mutations so two requests racing on the same
/// token cannot both win.
///
/// Regular lookups see only non-deleted accounts. Methods suffixed
/// `_unrestricted` bypass that visibility scope for token resolution; the
/// wider capability is spelled out in the name rather than hidden in which
/// client handle was used.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;

    /// Lookup by already-normalized (lowercased, trimmed) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Newest-first page of accounts plus the total count.
    async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Account>, u64), StoreError>;

    /// Apply a partial update and return the fresh row, or None if absent.
    async fn update_profile(
        &self,
        id: &str,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError>;

    /// Mark the account deleted. Returns false if it was absent or already
    /// deleted.
    async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Overwrite the verification token, invalidating any prior one.
    async fn set_verification_token(
        &self,
        id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Overwrite the password-reset token, invalidating any prior one.
    async fn set_reset_token(
        &self,
        id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn find_by_verification_token_unrestricted(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn find_by_reset_token_unrestricted(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Activate the account holding this token, in one conditional mutation:
    /// only if it is still inactive, not deleted, and the token has not
    /// expired (valid through the expiry instant itself). Clears both
    /// verification fields and stamps `verified_at`. Returns the updated
    /// account, or None when the guard fails.
    async fn activate_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError>;

    /// Rotate the password for the account holding this reset token, in one
    /// conditional mutation: only if the account is not deleted and the
    /// token has not expired (valid through the expiry instant itself).
    /// Clears both reset fields. Returns the updated account, or None when
    /// the guard fails.
    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError>;
}
