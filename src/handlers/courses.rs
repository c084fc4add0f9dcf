use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use super::parse_id;
use crate::database::models::course::{Course, CreateCourse, UpdateCourse};
use crate::database::models::user::Role;
use crate::middleware::{require_role, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/v1/courses - list with filter/sort/select/pagination
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    let result = state.courses.list(&raw).await?;
    Ok(ApiResponse::list(result))
}

/// GET /api/v1/bootcamps/:id/courses
pub async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
) -> ApiResult<Vec<Course>> {
    let courses = state
        .courses
        .list_for_bootcamp(parse_id(&bootcamp_id)?)
        .await?;
    let count = courses.len();
    Ok(ApiResponse::counted(courses, count))
}

/// GET /api/v1/courses/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Course> {
    let course = state.courses.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(course))
}

/// POST /api/v1/bootcamps/:id/courses - bootcamp owner or admin
pub async fn create_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
    auth: AuthUser,
    Json(payload): Json<CreateCourse>,
) -> ApiResult<Course> {
    require_role(&auth, &[Role::Publisher, Role::Admin])?;
    let course = state
        .courses
        .create(&auth, parse_id(&bootcamp_id)?, payload)
        .await?;
    Ok(ApiResponse::created(course))
}

/// PUT /api/v1/courses/:id - owner or admin
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
    Json(payload): Json<UpdateCourse>,
) -> ApiResult<Course> {
    require_role(&auth, &[Role::Publisher, Role::Admin])?;
    let course = state.courses.update(&auth, parse_id(&id)?, payload).await?;
    Ok(ApiResponse::success(course))
}

/// DELETE /api/v1/courses/:id - owner or admin
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<Value> {
    require_role(&auth, &[Role::Publisher, Role::Admin])?;
    state.courses.delete(&auth, parse_id(&id)?).await?;
    Ok(ApiResponse::success(Value::Object(Default::default())))
}
