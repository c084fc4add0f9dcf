use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{self, password};
use crate::config::AppConfig;
use crate::database::models::user::{RegisterUser, UpdateDetails, User};
use crate::database::models::violation;
use crate::error::ApiError;
use crate::external::Mailer;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePassword {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPassword {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPassword {
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    config: Arc<AppConfig>,
    mailer: Arc<dyn Mailer>,
}

impl AuthService {
    pub fn new(pool: PgPool, config: Arc<AppConfig>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            pool,
            config,
            mailer,
        }
    }

    pub async fn register(&self, payload: RegisterUser) -> Result<(User, String), ApiError> {
        let attrs = payload.validate().map_err(|field_errors| {
            ApiError::validation_failed("Invalid registration payload", field_errors)
        })?;
        let hashed = password::hash_password(&attrs.password)?;

        // Duplicate email surfaces as 409 through the unique constraint
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, role, password)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&attrs.name)
        .bind(&attrs.email)
        .bind(attrs.role)
        .bind(&hashed)
        .fetch_one(&self.pool)
        .await?;

        let token = auth::issue_token(user.id, &self.config.security)?;
        Ok((user, token))
    }

    pub async fn login(&self, payload: LoginRequest) -> Result<(User, String), ApiError> {
        let email = payload.email.unwrap_or_default();
        let plain = payload.password.unwrap_or_default();
        if email.is_empty() || plain.is_empty() {
            return Err(ApiError::bad_request("Please provide an email and password"));
        }

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

        if !password::verify_password(&plain, &user.password) {
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        let token = auth::issue_token(user.id, &self.config.security)?;
        Ok((user, token))
    }

    pub async fn me(&self, requester: &AuthUser) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(requester.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                ApiError::not_found(format!("User not found with id of {}", requester.id))
            })
    }

    pub async fn update_details(
        &self,
        requester: &AuthUser,
        payload: UpdateDetails,
    ) -> Result<User, ApiError> {
        let field_errors = payload.validate();
        if !field_errors.is_empty() {
            return Err(ApiError::validation_failed(
                "Invalid details payload",
                field_errors,
            ));
        }

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(requester.id)
        .bind(&payload.name)
        .bind(&payload.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found with id of {}", requester.id)))
    }

    pub async fn update_password(
        &self,
        requester: &AuthUser,
        payload: UpdatePassword,
    ) -> Result<String, ApiError> {
        let current = payload.current_password.unwrap_or_default();
        let new_password = payload.new_password.unwrap_or_default();
        if new_password.len() < 6 {
            let mut field_errors = HashMap::new();
            violation(
                &mut field_errors,
                "newPassword",
                "Password must be at least 6 characters",
            );
            return Err(ApiError::validation_failed(
                "Invalid password payload",
                field_errors,
            ));
        }

        let user = self.me(requester).await?;
        if !password::verify_password(&current, &user.password) {
            return Err(ApiError::unauthorized("Password is invalid"));
        }

        let hashed = password::hash_password(&new_password)?;
        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(&hashed)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        let token = auth::issue_token(user.id, &self.config.security)?;
        Ok(token)
    }

    /// Set a reset token and mail its plain form. On send failure the
    /// half-set token is cleared best-effort; that cleanup never raises.
    pub async fn forgot_password(&self, payload: ForgotPassword) -> Result<(), ApiError> {
        let email = payload.email.unwrap_or_default();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("There is no user with that email"))?;

        let reset = password::new_reset_token(self.config.security.reset_token_expiry_minutes);
        sqlx::query(
            "UPDATE users SET reset_password_token = $1, reset_password_expire = $2 WHERE id = $3",
        )
        .bind(&reset.hashed)
        .bind(reset.expires_at)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        let message = format!(
            "You are receiving this email because you (or someone else) has requested \
             the reset of a password. Your reset token is:\n\n{}",
            reset.plain
        );
        if let Err(e) = self
            .mailer
            .send(&user.email, "Password reset token", &message)
            .await
        {
            tracing::error!("reset email failed: {}", e);
            if let Err(cleanup) = sqlx::query(
                "UPDATE users SET reset_password_token = NULL, reset_password_expire = NULL WHERE id = $1",
            )
            .bind(user.id)
            .execute(&self.pool)
            .await
            {
                tracing::error!("failed to clear reset token: {}", cleanup);
            }
            return Err(ApiError::upstream_failure("Email could not be sent"));
        }

        Ok(())
    }

    /// Match the hashed token within its expiry window, set the new
    /// password, clear the token fields
    pub async fn reset_password(
        &self,
        token_plain: &str,
        payload: ResetPassword,
    ) -> Result<(User, String), ApiError> {
        let hashed_token = password::hash_reset_token(token_plain);
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE reset_password_token = $1 AND reset_password_expire > now()",
        )
        .bind(&hashed_token)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid token"))?;

        let new_password = payload.password.unwrap_or_default();
        if new_password.len() < 6 {
            let mut field_errors = HashMap::new();
            violation(
                &mut field_errors,
                "password",
                "Password must be at least 6 characters",
            );
            return Err(ApiError::validation_failed(
                "Invalid password payload",
                field_errors,
            ));
        }

        let hashed = password::hash_password(&new_password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                password = $1,
                reset_password_token = NULL,
                reset_password_expire = NULL
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(&hashed)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        let token = auth::issue_token(user.id, &self.config.security)?;
        Ok((user, token))
    }
}
