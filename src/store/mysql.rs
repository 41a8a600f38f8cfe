use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use super::{AccountStore, ProfileChanges, StoreError};
use crate::modules::users::model::Account;

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, profile_image_url, age, \
     weight_kg, height_cm, is_active, verification_token, verification_expires, \
     password_reset_token, password_reset_expires, verified_at, deleted_at, \
     created_at, updated_at";

pub struct MySqlAccountStore {
    pool: Pool<MySql>,
}

impl MySqlAccountStore {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    async fn fetch_by_id_unrestricted(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}

#[async_trait]
impl AccountStore for MySqlAccountStore {
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, profile_image_url, age,
                weight_kg, height_cm, is_active, verification_token, verification_expires,
                password_reset_token, password_reset_expires, verified_at, deleted_at,
                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.profile_image_url)
        .bind(account.age)
        .bind(account.weight_kg)
        .bind(account.height_cm)
        .bind(account.is_active)
        .bind(&account.verification_token)
        .bind(account.verification_expires)
        .bind(&account.password_reset_token)
        .bind(account.password_reset_expires)
        .bind(account.verified_at)
        .bind(account.deleted_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ? AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = ? AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Account>, u64), StoreError> {
        let offset = (page.saturating_sub(1) as u64) * limit as u64;

        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok((accounts, total as u64))
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE(?, name),
                profile_image_url = COALESCE(?, profile_image_url),
                age = COALESCE(?, age),
                weight_kg = COALESCE(?, weight_kg),
                height_cm = COALESCE(?, height_cm),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.profile_image_url)
        .bind(changes.age)
        .bind(changes.weight_kg)
        .bind(changes.height_cm)
        .bind(&changes.password_hash)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_verification_token(
        &self,
        id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET verification_token = ?, verification_expires = ?, updated_at = ? \
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(token)
        .bind(expires_at)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET password_reset_token = ?, password_reset_expires = ?, \
             updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(token)
        .bind(expires_at)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_verification_token_unrestricted(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE verification_token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_reset_token_unrestricted(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE password_reset_token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn activate_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        // The UPDATE guard decides; the id pre-read only lets us return the
        // row after the token column is cleared.
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE verification_token = ?")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        let Some(id) = id else {
            return Ok(None);
        };

        let result = sqlx::query(
            r#"
            UPDATE users SET
                is_active = TRUE,
                verified_at = ?,
                verification_token = NULL,
                verification_expires = NULL,
                updated_at = ?
            WHERE id = ? AND verification_token = ? AND is_active = FALSE
                AND verification_expires >= ? AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(&id)
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_by_id_unrestricted(&id).await
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE password_reset_token = ?")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        let Some(id) = id else {
            return Ok(None);
        };

        let result = sqlx::query(
            r#"
            UPDATE users SET
                password_hash = ?,
                password_reset_token = NULL,
                password_reset_expires = NULL,
                updated_at = ?
            WHERE id = ? AND password_reset_token = ? AND password_reset_expires >= ?
                AND deleted_at IS NULL
            "#,
        )
        .bind(new_password_hash)
        .bind(now)
        .bind(&id)
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_by_id_unrestricted(&id).await
    }
}
