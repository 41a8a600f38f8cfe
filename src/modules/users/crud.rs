use chrono::Utc;
use std::sync::Arc;

use crate::modules::auth::crud::AuthError;
use crate::modules::users::model::Account;
use crate::modules::users::schema::UpdateUserRequest;
use crate::services::{hashing, validation};
use crate::store::{AccountStore, ProfileChanges};

/// Maximum page size for listings.
pub const MAX_PAGE_LIMIT: u32 = 100;

pub struct UserCrud {
    store: Arc<dyn AccountStore>,
}

impl UserCrud {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &str) -> Result<Account, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Account, AuthError> {
        let email = validation::normalize_email(email);
        self.store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Account>, u64), AuthError> {
        Ok(self.store.list(page, limit).await?)
    }

    /// Partial profile update. A new password goes through the policy and
    /// argon2 before it replaces the stored hash.
    pub async fn update(&self, id: &str, req: UpdateUserRequest) -> Result<Account, AuthError> {
        if req.is_empty() {
            return Err(AuthError::Validation(
                "At least one field must be provided for update".to_string(),
            ));
        }

        let password_hash = match req.password.as_deref() {
            Some(password) => {
                if let Err(rules) = validation::validate_password(password) {
                    return Err(AuthError::WeakPassword(rules.join(", ")));
                }
                Some(
                    hashing::hash_password(password)
                        .map_err(|e| AuthError::Internal(e.to_string()))?,
                )
            }
            None => None,
        };

        let changes = ProfileChanges {
            name: req.name.map(|n| n.trim().to_string()),
            profile_image_url: req.profile_image_url,
            age: req.age,
            weight_kg: req.weight_kg,
            height_cm: req.height_cm,
            password_hash,
        };

        self.store
            .update_profile(id, changes, Utc::now())
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Re-check an account's password without authenticating. Goes through
    /// the same constant-time PHC verifier as login.
    pub async fn verify_password(&self, id: &str, password: &str) -> Result<bool, AuthError> {
        let account = self.get(id).await?;
        hashing::verify_password(password, &account.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub async fn deactivate(&self, id: &str) -> Result<(), AuthError> {
        let deleted = self.store.soft_delete(id, Utc::now()).await?;
        if !deleted {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}
