use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::modules::auth::{
    crud::AccountLifecycle,
    schema::{
        ErrorResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, LogoutResponse,
        MessageResponse, ResendVerificationRequest, ResetPasswordRequest,
        VerifyAccountResponse, VerifyResetTokenResponse,
    },
};
use crate::modules::users::schema::UserResponse;
use crate::AppState;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn lifecycle(state: &AppState) -> AccountLifecycle {
    AccountLifecycle::new(state.store.clone(), state.notifier.clone())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ErrorReply> {
    let account = lifecycle(&state)
        .authenticate(&req.email, &req.password)
        .await
        .map_err(|e| e.into_reply())?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful",
            user: UserResponse::from_account(&account),
        }),
    ))
}

pub async fn logout() -> (StatusCode, Json<LogoutResponse>) {
    // No server-side session state to invalidate yet.
    (
        StatusCode::OK,
        Json(LogoutResponse {
            message: "Logout successful",
        }),
    )
}

pub async fn verify_account(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<VerifyAccountResponse>), ErrorReply> {
    let account = lifecycle(&state)
        .consume_verification(&token)
        .await
        .map_err(|e| e.into_reply())?;

    Ok((
        StatusCode::OK,
        Json(VerifyAccountResponse {
            message: "Account verified successfully",
            user: UserResponse::from_account(&account),
        }),
    ))
}

pub async fn resend_verification(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResendVerificationRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ErrorReply> {
    if let Err(e) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        ));
    }

    lifecycle(&state)
        .resend_verification(&req.email)
        .await
        .map_err(|e| e.into_reply())?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "If an account exists for this address, a verification email has been sent",
        }),
    ))
}

pub async fn request_password_reset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ErrorReply> {
    if let Err(e) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        ));
    }

    lifecycle(&state)
        .request_password_reset(&req.email)
        .await
        .map_err(|e| e.into_reply())?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "If an account exists for this address, a password reset email has been sent",
        }),
    ))
}

pub async fn verify_reset_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<VerifyResetTokenResponse>), ErrorReply> {
    let identity = lifecycle(&state)
        .verify_reset_token(&token)
        .await
        .map_err(|e| e.into_reply())?;

    Ok((
        StatusCode::OK,
        Json(VerifyResetTokenResponse {
            email: identity.email,
            name: identity.name,
        }),
    ))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ErrorReply> {
    if req.password != req.password_confirm {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(
                "Passwords do not match",
                "PASSWORD_MISMATCH",
            )),
        ));
    }

    lifecycle(&state)
        .consume_password_reset(&token, &req.password)
        .await
        .map_err(|e| e.into_reply())?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Password has been reset successfully",
        }),
    ))
}
