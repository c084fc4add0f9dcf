use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use super::parse_id;
use crate::database::models::review::{CreateReview, Review, UpdateReview};
use crate::database::models::user::Role;
use crate::middleware::{require_role, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/v1/reviews - list with filter/sort/select/pagination
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    let result = state.reviews.list(&raw).await?;
    Ok(ApiResponse::list(result))
}

/// GET /api/v1/bootcamps/:id/reviews
pub async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
) -> ApiResult<Vec<Review>> {
    let reviews = state
        .reviews
        .list_for_bootcamp(parse_id(&bootcamp_id)?)
        .await?;
    let count = reviews.len();
    Ok(ApiResponse::counted(reviews, count))
}

/// GET /api/v1/reviews/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Review> {
    let review = state.reviews.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(review))
}

/// POST /api/v1/bootcamps/:id/reviews - users and admins; one review per
/// user per bootcamp
pub async fn create_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
    auth: AuthUser,
    Json(payload): Json<CreateReview>,
) -> ApiResult<Review> {
    require_role(&auth, &[Role::User, Role::Admin])?;
    let review = state
        .reviews
        .create(&auth, parse_id(&bootcamp_id)?, payload)
        .await?;
    Ok(ApiResponse::created(review))
}

/// PUT /api/v1/reviews/:id - owner or admin
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
    Json(payload): Json<UpdateReview>,
) -> ApiResult<Review> {
    require_role(&auth, &[Role::User, Role::Admin])?;
    let review = state.reviews.update(&auth, parse_id(&id)?, payload).await?;
    Ok(ApiResponse::success(review))
}

/// DELETE /api/v1/reviews/:id - owner or admin
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<Value> {
    require_role(&auth, &[Role::User, Role::Admin])?;
    state.reviews.delete(&auth, parse_id(&id)?).await?;
    Ok(ApiResponse::success(Value::Object(Default::default())))
}
