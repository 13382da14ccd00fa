//! Privileged account handlers and the upload URL handler, served under the
//! platform's function paths (`/functions/v1/...`) so existing clients keep working.

use crate::api::authorization;
use crate::error::ApiError;
use crate::state::AppState;
use application::accounts::CreateUserRequest;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use domain::media::UploadRequest;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    #[serde(default)]
    pub user_id: String,
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = state.auth.authorize_admin(authorization(&headers)).await?;
    let Json(request) = payload?;

    let created = state.accounts.create_user(&caller, &request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User created successfully",
        "userId": created.user_id,
        "email": created.email,
        "password": created.password,
        "loginId": created.login_id,
    })))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<UserIdRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = state.auth.authorize_admin(authorization(&headers)).await?;
    let Json(request) = payload?;

    let new_password = state
        .accounts
        .reset_password(&caller, &request.user_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password reset successfully",
        "newPassword": new_password,
    })))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<UserIdRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = state.auth.authorize_admin(authorization(&headers)).await?;
    let Json(request) = payload?;

    let deleted = state.accounts.delete_user(&caller, &request.user_id).await?;

    let mut body = json!({
        "success": true,
        "email": deleted.email,
    });
    match deleted.warning {
        Some(warning) => body["warning"] = json!(warning),
        None => body["message"] = json!("User deleted successfully from both auth and database"),
    }
    Ok(Json(body))
}

/// Storage configuration is checked before the caller is, so a misconfigured
/// deployment reports 500 regardless of the token.
pub async fn upload_url(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    state.uploads.ensure_configured()?;
    let account = state.auth.resolve_account(authorization(&headers)).await?;
    let Json(request) = payload?;

    let upload = state.uploads.presign(&account, &request)?;
    info!(key = %upload.key, "[UPLOAD] ✅ Presigned URL generated");

    Ok(Json(json!({
        "success": true,
        "uploadUrl": upload.upload_url,
        "fileUrl": upload.file_url,
        "key": upload.key,
    })))
}
