use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth;
use crate::database::models::user::{Role, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated requester context, loaded from the bearer token's identity.
/// Handlers that take this extractor reject unauthenticated requests with
/// 401 before any other work happens.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;

        let user_id = auth::verify_token(&token, &state.config.security)
            .map_err(|_| ApiError::unauthorized("Not authorized to access this route"))?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;

        Ok(AuthUser::from(user))
    }
}

/// Grant access only to the given roles; rejected requesters get 403
pub fn require_role(user: &AuthUser, roles: &[Role]) -> Result<(), ApiError> {
    if roles.contains(&user.role) {
        return Ok(());
    }
    Err(ApiError::forbidden(format!(
        "User role {} is not authorized to access this route",
        user.role
    )))
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user_with(role: Role) -> AuthUser {
        AuthUser {
            id: uuid::Uuid::new_v4(),
            name: "John".to_string(),
            email: "john@gmail.com".to_string(),
            role,
        }
    }

    #[test]
    fn role_gate_admits_listed_roles() {
        assert!(require_role(&user_with(Role::Publisher), &[Role::Publisher, Role::Admin]).is_ok());
        assert!(require_role(&user_with(Role::Admin), &[Role::Publisher, Role::Admin]).is_ok());
    }

    #[test]
    fn role_gate_rejects_other_roles() {
        let err = require_role(&user_with(Role::User), &[Role::Publisher, Role::Admin])
            .expect_err("plain users may not publish");
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer(&headers), Some("abc123".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Token abc123"));
        assert_eq!(extract_bearer(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }
}
