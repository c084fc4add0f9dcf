use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use super::parse_id;
use crate::database::models::bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use crate::database::models::user::Role;
use crate::error::ApiError;
use crate::middleware::{require_role, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/v1/bootcamps - list with filter/sort/select/pagination
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    let result = state.bootcamps.list(&raw).await?;
    Ok(ApiResponse::list(result))
}

/// GET /api/v1/bootcamps/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Bootcamp> {
    let bootcamp = state.bootcamps.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(bootcamp))
}

/// POST /api/v1/bootcamps - publishers and admins only
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBootcamp>,
) -> ApiResult<Bootcamp> {
    require_role(&auth, &[Role::Publisher, Role::Admin])?;
    let bootcamp = state.bootcamps.create(&auth, payload).await?;
    Ok(ApiResponse::created(bootcamp))
}

/// PUT /api/v1/bootcamps/:id - owner or admin
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
    Json(payload): Json<UpdateBootcamp>,
) -> ApiResult<Bootcamp> {
    require_role(&auth, &[Role::Publisher, Role::Admin])?;
    let bootcamp = state.bootcamps.update(&auth, parse_id(&id)?, payload).await?;
    Ok(ApiResponse::success(bootcamp))
}

/// DELETE /api/v1/bootcamps/:id - owner or admin; cascades to courses and
/// reviews
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<Value> {
    require_role(&auth, &[Role::Publisher, Role::Admin])?;
    state.bootcamps.delete(&auth, parse_id(&id)?).await?;
    Ok(ApiResponse::success(Value::Object(Default::default())))
}

/// GET /api/v1/bootcamps/radius/:zipcode/:distance - distance in miles
pub async fn within_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> ApiResult<Vec<Bootcamp>> {
    let distance: f64 = distance
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid distance: {}", distance)))?;
    let bootcamps = state.bootcamps.within_radius(&zipcode, distance).await?;
    let count = bootcamps.len();
    Ok(ApiResponse::counted(bootcamps, count))
}
