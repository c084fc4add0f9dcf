use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;
use crate::config::AppConfig;
use crate::database::models::user::{self, CreateUser, UpdateUser, User};
use crate::database::Repository;
use crate::error::ApiError;
use crate::query::{ListParams, ListResult};

/// Admin-only user administration
#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(pool: PgPool, config: Arc<AppConfig>) -> Self {
        Self { pool, config }
    }

    fn repository(&self) -> Repository<User> {
        Repository::new(user::TABLE, user::COLUMNS, &[], self.pool.clone())
    }

    pub async fn list(&self, raw: &HashMap<String, String>) -> Result<ListResult, ApiError> {
        let params = ListParams::from_query(raw, &self.config.query);
        self.repository().list_page(&params).await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("User not found with id of {}", id)))
    }

    pub async fn create(&self, payload: CreateUser) -> Result<User, ApiError> {
        let attrs = payload.validate().map_err(|field_errors| {
            ApiError::validation_failed("Invalid user payload", field_errors)
        })?;
        let hashed = password::hash_password(&attrs.password)?;

        let created = sqlx::query_as::<_, User>(
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

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateUser) -> Result<User, ApiError> {
        let role = payload.validate().map_err(|field_errors| {
            ApiError::validation_failed("Invalid user payload", field_errors)
        })?;
        let hashed = match &payload.password {
            Some(plain) => Some(password::hash_password(plain)?),
            None => None,
        };

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                password = COALESCE($5, password)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(role)
        .bind(&hashed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found with id of {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!(
                "User not found with id of {}",
                id
            )));
        }
        Ok(())
    }
}
