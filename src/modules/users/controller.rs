use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::modules::auth::crud::{AccountLifecycle, NewAccount};
use crate::modules::auth::schema::ErrorResponse;
use crate::modules::users::{
    crud::{UserCrud, MAX_PAGE_LIMIT},
    schema::{
        CreateUserRequest, CreateUserResponse, DeleteUserResponse, GetUserResponse, ListQuery,
        ListUsersResponse, Pagination, UpdateUserRequest, UpdateUserResponse, UserResponse,
        UserStats, UserStatsResponse, VerifyPasswordRequest, VerifyPasswordResponse,
    },
};
use crate::AppState;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ErrorReply {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ErrorReply> {
    if let Err(e) = req.validate() {
        return Err(bad_request(e.to_string()));
    }

    let lifecycle = AccountLifecycle::new(state.store.clone(), state.notifier.clone());
    let account = lifecycle
        .register(NewAccount {
            name: req.name,
            email: req.email,
            password: req.password,
            profile_image_url: req.profile_image_url,
            age: req.age,
            weight_kg: req.weight_kg,
            height_cm: req.height_cm,
        })
        .await
        .map_err(|e| e.into_reply())?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully. Check your email to verify the account.",
            user: UserResponse::from_account(&account),
        }),
    ))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GetUserResponse>, ErrorReply> {
    let account = UserCrud::new(state.store.clone())
        .get(&id)
        .await
        .map_err(|e| e.into_reply())?;

    Ok(Json(GetUserResponse {
        user: UserResponse::from_account(&account),
    }))
}

pub async fn get_user_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<GetUserResponse>, ErrorReply> {
    let account = UserCrud::new(state.store.clone())
        .get_by_email(&email)
        .await
        .map_err(|e| e.into_reply())?;

    Ok(Json(GetUserResponse {
        user: UserResponse::from_account(&account),
    }))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListUsersResponse>, ErrorReply> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    if page < 1 || limit < 1 || limit > MAX_PAGE_LIMIT {
        return Err(bad_request(
            "Invalid pagination: page must be >= 1 and limit between 1 and 100",
        ));
    }

    let (accounts, total) = UserCrud::new(state.store.clone())
        .list(page, limit)
        .await
        .map_err(|e| e.into_reply())?;

    Ok(Json(ListUsersResponse {
        users: accounts.iter().map(UserResponse::from_account).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit as u64),
        },
    }))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, ErrorReply> {
    if let Err(e) = req.validate() {
        return Err(bad_request(e.to_string()));
    }

    let account = UserCrud::new(state.store.clone())
        .update(&id, req)
        .await
        .map_err(|e| e.into_reply())?;

    Ok(Json(UpdateUserResponse {
        message: "User updated successfully",
        user: UserResponse::from_account(&account),
    }))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, ErrorReply> {
    UserCrud::new(state.store.clone())
        .deactivate(&id)
        .await
        .map_err(|e| e.into_reply())?;

    Ok(Json(DeleteUserResponse {
        message: "User deactivated successfully",
    }))
}

pub async fn verify_user_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<VerifyPasswordRequest>,
) -> Result<Json<VerifyPasswordResponse>, ErrorReply> {
    let valid = UserCrud::new(state.store.clone())
        .verify_password(&id, &req.password)
        .await
        .map_err(|e| e.into_reply())?;

    Ok(Json(VerifyPasswordResponse {
        valid,
        message: if valid {
            "Password is correct"
        } else {
            "Password is incorrect"
        },
    }))
}

pub async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserStatsResponse>, ErrorReply> {
    let account = UserCrud::new(state.store.clone())
        .get(&id)
        .await
        .map_err(|e| e.into_reply())?;

    Ok(Json(UserStatsResponse {
        user_id: account.id.clone(),
        stats: UserStats {
            bmi: account.bmi(),
            weight_status: account.weight_status(),
            age: account.age,
            weight_kg: account.weight_kg,
            height_cm: account.height_cm,
        },
    }))
}
