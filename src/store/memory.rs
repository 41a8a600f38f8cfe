use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{AccountStore, ProfileChanges, StoreError};
use crate::modules::users::model::Account;

/// In-memory store for tests and keyless local runs. A single mutex guards
/// the map, so every trait call is atomic, including the conditional
/// token-consumption mutations.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn visible(account: &Account) -> bool {
    account.deleted_at.is_none()
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        // Matches the unique index in MySQL, which also covers deleted rows.
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(id).filter(|a| visible(a)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.email == email && visible(a))
            .cloned())
    }

    async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Account>, u64), StoreError> {
        let accounts = self.accounts.lock().unwrap();
        let mut all: Vec<Account> = accounts.values().filter(|a| visible(a)).cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = all.len() as u64;
        let offset = (page.saturating_sub(1) as usize) * limit as usize;
        let slice = all.into_iter().skip(offset).take(limit as usize).collect();

        Ok((slice, total))
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let Some(account) = accounts.get_mut(id).filter(|a| visible(a)) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            account.name = name;
        }
        if let Some(url) = changes.profile_image_url {
            account.profile_image_url = Some(url);
        }
        if let Some(age) = changes.age {
            account.age = Some(age);
        }
        if let Some(weight) = changes.weight_kg {
            account.weight_kg = Some(weight);
        }
        if let Some(height) = changes.height_cm {
            account.height_cm = Some(height);
        }
        if let Some(hash) = changes.password_hash {
            account.password_hash = hash;
        }
        account.updated_at = now;

        Ok(Some(account.clone()))
    }

    async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(id).filter(|a| visible(a)) {
            Some(account) => {
                account.deleted_at = Some(now);
                account.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_verification_token(
        &self,
        id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.get_mut(id).filter(|a| visible(a)) {
            account.verification_token = Some(token.to_string());
            account.verification_expires = Some(expires_at);
            account.updated_at = now;
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.get_mut(id).filter(|a| visible(a)) {
            account.password_reset_token = Some(token.to_string());
            account.password_reset_expires = Some(expires_at);
            account.updated_at = now;
        }
        Ok(())
    }

    async fn find_by_verification_token_unrestricted(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_by_reset_token_unrestricted(
        &self,
        token: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.password_reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn activate_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|a| a.verification_token.as_deref() == Some(token));

        let Some(account) = account else {
            return Ok(None);
        };

        let live = !account.is_active
            && account.deleted_at.is_none()
            && account.verification_expires.is_some_and(|e| e >= now);
        if !live {
            return Ok(None);
        }

        account.is_active = true;
        account.verified_at = Some(now);
        account.verification_token = None;
        account.verification_expires = None;
        account.updated_at = now;

        Ok(Some(account.clone()))
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|a| a.password_reset_token.as_deref() == Some(token));

        let Some(account) = account else {
            return Ok(None);
        };

        if account.deleted_at.is_some()
            || !account.password_reset_expires.is_some_and(|e| e >= now)
        {
            return Ok(None);
        }

        account.password_hash = new_password_hash.to_string();
        account.password_reset_token = None;
        account.password_reset_expires = None;
        account.updated_at = now;

        Ok(Some(account.clone()))
    }
}
