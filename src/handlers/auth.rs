use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::database::models::user::{RegisterUser, UpdateDetails, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::auth_service::{ForgotPassword, LoginRequest, ResetPassword, UpdatePassword};
use crate::state::AppState;

/// Token envelope: `{success, token}`
fn token_response(status: StatusCode, token: String) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": true, "token": token })))
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (_user, token) = state.auth.register(payload).await?;
    Ok(token_response(StatusCode::CREATED, token))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (_user, token) = state.auth.login(payload).await?;
    Ok(token_response(StatusCode::OK, token))
}

/// GET /api/v1/auth/logout - bearer tokens are discarded client-side
pub async fn logout(_auth: AuthUser) -> ApiResult<Value> {
    Ok(ApiResponse::success(Value::Object(Default::default())))
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<User> {
    let user = state.auth.me(&auth).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/auth/updatedetails - own name and email only
pub async fn update_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateDetails>,
) -> ApiResult<User> {
    let user = state.auth.update_details(&auth, payload).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/auth/updatepassword
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdatePassword>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let token = state.auth.update_password(&auth, payload).await?;
    Ok(token_response(StatusCode::OK, token))
}

/// POST /api/v1/auth/forgotpassword
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPassword>,
) -> ApiResult<Value> {
    state.auth.forgot_password(payload).await?;
    Ok(ApiResponse::success(json!("Email sent")))
}

/// PUT /api/v1/auth/resetpassword/:token
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPassword>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (_user, token) = state.auth.reset_password(&token, payload).await?;
    Ok(token_response(StatusCode::OK, token))
}
