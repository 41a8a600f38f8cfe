use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::Account;

// =============================================================================
// CREATE (registration)
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2 to 255 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
    #[validate(url(message = "Invalid profile image URL"))]
    pub profile_image_url: Option<String>,
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,
    #[validate(range(min = 0.1, max = 1000.0, message = "Weight must be between 0.1 and 1000 kg"))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 0.1, max = 300.0, message = "Height must be between 0.1 and 300 cm"))]
    pub height_cm: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

// =============================================================================
// UPDATE
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2 to 255 characters"))]
    pub name: Option<String>,
    pub password: Option<String>,
    #[validate(url(message = "Invalid profile image URL"))]
    pub profile_image_url: Option<String>,
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,
    #[validate(range(min = 0.1, max = 1000.0, message = "Weight must be between 0.1 and 1000 kg"))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 0.1, max = 300.0, message = "Height must be between 0.1 and 300 cm"))]
    pub height_cm: Option<f64>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.password.is_none()
            && self.profile_image_url.is_none()
            && self.age.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

// =============================================================================
// READ / LIST
// =============================================================================

#[derive(Debug, Serialize)]
pub struct GetUserResponse {
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: &'static str,
}

// =============================================================================
// PASSWORD CHECK
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyPasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPasswordResponse {
    pub valid: bool,
    pub message: &'static str,
}

// =============================================================================
// STATS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct UserStats {
    pub bmi: Option<f64>,
    pub weight_status: Option<&'static str>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub user_id: String,
    pub stats: UserStats,
}

// =============================================================================
// PUBLIC USER SHAPE
// =============================================================================

/// Outward representation of an account. Never carries the password hash
/// or any token/expiry field.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub bmi: Option<f64>,
    pub weight_status: Option<&'static str>,
}

impl UserResponse {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            profile_image_url: account.profile_image_url.clone(),
            age: account.age,
            weight_kg: account.weight_kg,
            height_cm: account.height_cm,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
            bmi: account.bmi(),
            weight_status: account.weight_status(),
        }
    }
}
