use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::bootcamp::{
    self, Bootcamp, CreateBootcamp, UpdateBootcamp,
};
use crate::database::models::user::Role;
use crate::database::Repository;
use crate::error::ApiError;
use crate::external::Geocoder;
use crate::middleware::AuthUser;
use crate::query::{ListParams, ListResult};
use crate::services::ownership;

/// Miles; used to translate radius searches into great-circle distance
const EARTH_RADIUS_MILES: f64 = 3963.0;

#[derive(Clone)]
pub struct BootcampService {
    pool: PgPool,
    config: Arc<AppConfig>,
    geocoder: Arc<dyn Geocoder>,
}

impl BootcampService {
    pub fn new(pool: PgPool, config: Arc<AppConfig>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            pool,
            config,
            geocoder,
        }
    }

    fn repository(&self) -> Repository<Bootcamp> {
        Repository::new(
            bootcamp::TABLE,
            bootcamp::COLUMNS,
            bootcamp::ARRAY_COLUMNS,
            self.pool.clone(),
        )
    }

    pub async fn list(&self, raw: &HashMap<String, String>) -> Result<ListResult, ApiError> {
        let params = ListParams::from_query(raw, &self.config.query);
        self.repository().list_page(&params).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Bootcamp, ApiError> {
        sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))
    }

    /// Create a bootcamp owned by the requester. A non-admin may publish at
    /// most one.
    pub async fn create(
        &self,
        requester: &AuthUser,
        payload: CreateBootcamp,
    ) -> Result<Bootcamp, ApiError> {
        let attrs = payload.validate().map_err(|field_errors| {
            ApiError::validation_failed("Invalid bootcamp payload", field_errors)
        })?;

        if requester.role != Role::Admin {
            let published = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM bootcamps WHERE user_id = $1",
            )
            .bind(requester.id)
            .fetch_one(&self.pool)
            .await?;
            if published > 0 {
                return Err(ApiError::conflict(format!(
                    "The user with ID {} has already published a bootcamp",
                    requester.id
                )));
            }
        }

        // Derived fields: location comes from the geocoder, slug from the
        // name; the raw address is not persisted
        let location = self.geocoder.geocode(&attrs.address).await?;
        let slug = bootcamp::slugify(&attrs.name);

        let created = sqlx::query_as::<_, Bootcamp>(
            r#"
            INSERT INTO bootcamps (
                name, slug, description, website, phone, email,
                latitude, longitude, formatted_address, street, city, state, zipcode, country,
                careers, housing, job_assistance, job_guarantee, accept_gi, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
        )
        .bind(&attrs.name)
        .bind(&slug)
        .bind(&attrs.description)
        .bind(&attrs.website)
        .bind(&attrs.phone)
        .bind(&attrs.email)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.formatted_address)
        .bind(&location.street)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.zipcode)
        .bind(&location.country)
        .bind(&attrs.careers)
        .bind(attrs.housing)
        .bind(attrs.job_assistance)
        .bind(attrs.job_guarantee)
        .bind(attrs.accept_gi)
        .bind(requester.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        requester: &AuthUser,
        id: Uuid,
        payload: UpdateBootcamp,
    ) -> Result<Bootcamp, ApiError> {
        let existing = self.get(id).await?;
        ownership::ensure_can_mutate(existing.user_id, requester, "bootcamp")?;

        let field_errors = payload.validate();
        if !field_errors.is_empty() {
            return Err(ApiError::validation_failed(
                "Invalid bootcamp payload",
                field_errors,
            ));
        }

        // Derived fields follow their sources: a new name re-slugs, a new
        // address re-geocodes
        let slug = payload.name.as_deref().map(bootcamp::slugify);
        let location = match &payload.address {
            Some(address) => self.geocoder.geocode(address).await?,
            None => Default::default(),
        };

        let updated = sqlx::query_as::<_, Bootcamp>(
            r#"
            UPDATE bootcamps SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                website = COALESCE($5, website),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                careers = COALESCE($8, careers),
                housing = COALESCE($9, housing),
                job_assistance = COALESCE($10, job_assistance),
                job_guarantee = COALESCE($11, job_guarantee),
                accept_gi = COALESCE($12, accept_gi),
                latitude = COALESCE($13, latitude),
                longitude = COALESCE($14, longitude),
                formatted_address = COALESCE($15, formatted_address),
                street = COALESCE($16, street),
                city = COALESCE($17, city),
                state = COALESCE($18, state),
                zipcode = COALESCE($19, zipcode),
                country = COALESCE($20, country)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&slug)
        .bind(&payload.description)
        .bind(&payload.website)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.careers)
        .bind(payload.housing)
        .bind(payload.job_assistance)
        .bind(payload.job_guarantee)
        .bind(payload.accept_gi)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.formatted_address)
        .bind(&location.street)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.zipcode)
        .bind(&location.country)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// The storage-level cascade removes the bootcamp's courses and reviews
    /// with it.
    pub async fn delete(&self, requester: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let existing = self.get(id).await?;
        ownership::ensure_can_mutate(existing.user_id, requester, "bootcamp")?;

        sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Bootcamps within `distance` miles of the zipcode's location
    pub async fn within_radius(
        &self,
        zipcode: &str,
        distance: f64,
    ) -> Result<Vec<Bootcamp>, ApiError> {
        let origin = self.geocoder.geocode(zipcode).await?;
        let (Some(lat), Some(lng)) = (origin.latitude, origin.longitude) else {
            return Err(ApiError::upstream_failure(
                "Unable to geocode the given address",
            ));
        };

        let rows = sqlx::query_as::<_, Bootcamp>(
            r#"
            SELECT * FROM bootcamps
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
              AND $3 * ACOS(LEAST(1.0,
                    SIN(RADIANS($1)) * SIN(RADIANS(latitude))
                  + COS(RADIANS($1)) * COS(RADIANS(latitude)) * COS(RADIANS(longitude - $2))
                  )) <= $4
            ORDER BY created_at DESC
            "#,
        )
        .bind(lat)
        .bind(lng)
        .bind(EARTH_RADIUS_MILES)
        .bind(distance)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
