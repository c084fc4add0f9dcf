use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::bootcamp::Bootcamp;
use crate::database::models::course::{self, Course, CreateCourse, UpdateCourse};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::query::{ListParams, ListResult};
use crate::services::{aggregates, ownership};

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
    config: Arc<AppConfig>,
}

impl CourseService {
    pub fn new(pool: PgPool, config: Arc<AppConfig>) -> Self {
        Self { pool, config }
    }

    fn repository(&self) -> Repository<Course> {
        Repository::new(course::TABLE, course::COLUMNS, &[], self.pool.clone())
    }

    pub async fn list(&self, raw: &HashMap<String, String>) -> Result<ListResult, ApiError> {
        let params = ListParams::from_query(raw, &self.config.query);
        self.repository().list_page(&params).await
    }

    /// Courses attached to one bootcamp; the nested route takes no query
    /// translation
    pub async fn list_for_bootcamp(&self, bootcamp_id: Uuid) -> Result<Vec<Course>, ApiError> {
        let rows = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE bootcamp_id = $1 ORDER BY created_at DESC",
        )
        .bind(bootcamp_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Course, ApiError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No course with the id of {}", id)))
    }

    /// Only the bootcamp owner (or an admin) may attach courses to it
    pub async fn create(
        &self,
        requester: &AuthUser,
        bootcamp_id: Uuid,
        payload: CreateCourse,
    ) -> Result<Course, ApiError> {
        let bootcamp = sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamps WHERE id = $1")
            .bind(bootcamp_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                ApiError::not_found(format!("No bootcamp with the id of {}", bootcamp_id))
            })?;
        ownership::ensure_can_mutate(bootcamp.user_id, requester, "bootcamp")?;

        let attrs = payload.validate().map_err(|field_errors| {
            ApiError::validation_failed("Invalid course payload", field_errors)
        })?;

        let created = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (
                title, description, weeks, tuition, minimum_skill,
                scholarship_available, bootcamp_id, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&attrs.title)
        .bind(&attrs.description)
        .bind(&attrs.weeks)
        .bind(attrs.tuition)
        .bind(attrs.minimum_skill)
        .bind(attrs.scholarship_available)
        .bind(bootcamp_id)
        .bind(requester.id)
        .fetch_one(&self.pool)
        .await?;

        // Derived aggregate follows every child create
        aggregates::recompute_average_cost(&self.pool, bootcamp_id).await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        requester: &AuthUser,
        id: Uuid,
        payload: UpdateCourse,
    ) -> Result<Course, ApiError> {
        let existing = self.get(id).await?;
        ownership::ensure_can_mutate(existing.user_id, requester, "course")?;

        let minimum_skill = payload.validate().map_err(|field_errors| {
            ApiError::validation_failed("Invalid course payload", field_errors)
        })?;

        let updated = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                weeks = COALESCE($4, weeks),
                tuition = COALESCE($5, tuition),
                minimum_skill = COALESCE($6, minimum_skill),
                scholarship_available = COALESCE($7, scholarship_available)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.weeks)
        .bind(payload.tuition)
        .bind(minimum_skill)
        .bind(payload.scholarship_available)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, requester: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let existing = self.get(id).await?;
        ownership::ensure_can_mutate(existing.user_id, requester, "course")?;

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        // Derived aggregate follows every child delete
        aggregates::recompute_average_cost(&self.pool, existing.bootcamp_id).await?;

        Ok(())
    }
}
