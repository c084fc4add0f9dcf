use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Rounding applied to a recomputed mean before write-back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    None,
    /// Round up to the nearest multiple of ten
    CeilToTen,
}

impl Rounding {
    pub fn apply(&self, mean: f64) -> f64 {
        match self {
            Rounding::None => mean,
            Rounding::CeilToTen => (mean / 10.0).ceil() * 10.0,
        }
    }
}

/// Recompute a denormalized average on a parent bootcamp from one of its
/// child tables and write it back. When the last child is gone the
/// aggregation yields no mean and the stored value is left untouched.
///
/// This is a read-then-write against storage: concurrent child mutations on
/// the same parent may interleave, and the aggregate settles with whichever
/// recompute lands last.
pub async fn recompute(
    pool: &PgPool,
    child_table: &str,
    source_column: &str,
    target_column: &str,
    bootcamp_id: Uuid,
    rounding: Rounding,
) -> Result<(), sqlx::Error> {
    let select = format!(
        "SELECT AVG(\"{}\") AS mean FROM \"{}\" WHERE bootcamp_id = $1",
        source_column, child_table
    );
    let row = sqlx::query(&select)
        .bind(bootcamp_id)
        .fetch_one(pool)
        .await?;
    let mean: Option<f64> = row.try_get("mean")?;

    let Some(mean) = mean else {
        return Ok(());
    };

    let update = format!(
        "UPDATE bootcamps SET \"{}\" = $1 WHERE id = $2",
        target_column
    );
    sqlx::query(&update)
        .bind(rounding.apply(mean))
        .bind(bootcamp_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Average tuition across a bootcamp's courses, rounded up to the nearest 10
pub async fn recompute_average_cost(pool: &PgPool, bootcamp_id: Uuid) -> Result<(), sqlx::Error> {
    recompute(
        pool,
        "courses",
        "tuition",
        "average_cost",
        bootcamp_id,
        Rounding::CeilToTen,
    )
    .await
}

/// Raw mean rating across a bootcamp's reviews
pub async fn recompute_average_rating(pool: &PgPool, bootcamp_id: Uuid) -> Result<(), sqlx::Error> {
    recompute(
        pool,
        "reviews",
        "rating",
        "average_rating",
        bootcamp_id,
        Rounding::None,
    )
    .await
}
