use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::review::{self, CreateReview, Review, UpdateReview};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::query::{ListParams, ListResult};
use crate::services::{aggregates, ownership};

#[derive(Clone)]
pub struct ReviewService {
    pool: PgPool,
    config: Arc<AppConfig>,
}

impl ReviewService {
    pub fn new(pool: PgPool, config: Arc<AppConfig>) -> Self {
        Self { pool, config }
    }

    fn repository(&self) -> Repository<Review> {
        Repository::new(review::TABLE, review::COLUMNS, &[], self.pool.clone())
    }

    pub async fn list(&self, raw: &HashMap<String, String>) -> Result<ListResult, ApiError> {
        let params = ListParams::from_query(raw, &self.config.query);
        self.repository().list_page(&params).await
    }

    pub async fn list_for_bootcamp(&self, bootcamp_id: Uuid) -> Result<Vec<Review>, ApiError> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE bootcamp_id = $1 ORDER BY created_at DESC",
        )
        .bind(bootcamp_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Review, ApiError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No review found with the id of {}", id)))
    }

    /// At most one review per (bootcamp, user) pair
    pub async fn create(
        &self,
        requester: &AuthUser,
        bootcamp_id: Uuid,
        payload: CreateReview,
    ) -> Result<Review, ApiError> {
        let bootcamp_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bootcamps WHERE id = $1")
                .bind(bootcamp_id)
                .fetch_one(&self.pool)
                .await?;
        if bootcamp_exists == 0 {
            return Err(ApiError::not_found(format!(
                "No bootcamp with the id of {}",
                bootcamp_id
            )));
        }

        let already_reviewed = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reviews WHERE bootcamp_id = $1 AND user_id = $2",
        )
        .bind(bootcamp_id)
        .bind(requester.id)
        .fetch_one(&self.pool)
        .await?;
        if already_reviewed > 0 {
            return Err(ApiError::conflict(
                "User has already submitted a review for this bootcamp",
            ));
        }

        let attrs = payload.validate().map_err(|field_errors| {
            ApiError::validation_failed("Invalid review payload", field_errors)
        })?;

        // The unique (bootcamp_id, user_id) constraint backstops the check
        // above under concurrent submissions
        let created = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (title, text, rating, bootcamp_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&attrs.title)
        .bind(&attrs.text)
        .bind(attrs.rating)
        .bind(bootcamp_id)
        .bind(requester.id)
        .fetch_one(&self.pool)
        .await?;

        // Derived aggregate follows every child create
        aggregates::recompute_average_rating(&self.pool, bootcamp_id).await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        requester: &AuthUser,
        id: Uuid,
        payload: UpdateReview,
    ) -> Result<Review, ApiError> {
        let existing = self.get(id).await?;
        ownership::ensure_can_mutate(existing.user_id, requester, "review")?;

        let field_errors = payload.validate();
        if !field_errors.is_empty() {
            return Err(ApiError::validation_failed(
                "Invalid review payload",
                field_errors,
            ));
        }

        let updated = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews SET
                title = COALESCE($2, title),
                text = COALESCE($3, text),
                rating = COALESCE($4, rating)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.text)
        .bind(payload.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, requester: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let existing = self.get(id).await?;
        ownership::ensure_can_mutate(existing.user_id, requester, "review")?;

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        // Derived aggregate follows every child delete
        aggregates::recompute_average_rating(&self.pool, existing.bootcamp_id).await?;

        Ok(())
    }
}
