use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use super::parse_id;
use crate::database::models::user::{CreateUser, Role, UpdateUser, User};
use crate::middleware::{require_role, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/v1/users - admin only, full query translation
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    require_role(&auth, &[Role::Admin])?;
    let result = state.users.list(&raw).await?;
    Ok(ApiResponse::list(result))
}

/// GET /api/v1/users/:id - admin only
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<User> {
    require_role(&auth, &[Role::Admin])?;
    let user = state.users.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(user))
}

/// POST /api/v1/users - admin only
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUser>,
) -> ApiResult<User> {
    require_role(&auth, &[Role::Admin])?;
    let user = state.users.create(payload).await?;
    Ok(ApiResponse::created(user))
}

/// PUT /api/v1/users/:id - admin only
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<User> {
    require_role(&auth, &[Role::Admin])?;
    let user = state.users.update(parse_id(&id)?, payload).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/v1/users/:id - admin only
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<Value> {
    require_role(&auth, &[Role::Admin])?;
    state.users.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::success(Value::Object(Default::default())))
}
