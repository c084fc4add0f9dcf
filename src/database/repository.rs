use serde::Serialize;
use serde_json::Value;
use sqlx::{
    postgres::{PgArguments, PgRow},
    FromRow, PgPool, Row,
};

use crate::error::ApiError;
use crate::query::{project, ListParams, ListResult, Pagination, SelectQuery};

/// Executes translated list queries for one resource table. Constructed per
/// call with the resource's table name and column set.
pub struct Repository<T> {
    table: &'static str,
    columns: &'static [&'static str],
    array_columns: &'static [&'static str],
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    pub fn new(
        table: &'static str,
        columns: &'static [&'static str],
        array_columns: &'static [&'static str],
        pool: PgPool,
    ) -> Self {
        Self {
            table,
            columns,
            array_columns,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Rows for the page window plus the count of all records matching the
    /// filter predicate (the count ignores the window).
    pub async fn select_page(&self, params: &ListParams) -> Result<(Vec<T>, i64), ApiError> {
        let select = SelectQuery::new(self.table, self.columns, self.array_columns, params)?;

        let sql = select.to_sql();
        let mut rows_query = sqlx::query_as::<_, T>(&sql.query);
        for value in sql.params.iter() {
            rows_query = bind_value_query_as(rows_query, value);
        }
        let rows = rows_query.fetch_all(&self.pool).await?;

        let count_sql = select.to_count_sql();
        let mut count_query = sqlx::query(&count_sql.query);
        for value in count_sql.params.iter() {
            count_query = bind_value_query(count_query, value);
        }
        let row = count_query.fetch_one(&self.pool).await?;
        let total: i64 = row.try_get("count")?;

        Ok((rows, total))
    }

    /// Full list pipeline: rows, field projection, pagination metadata
    pub async fn list_page(&self, params: &ListParams) -> Result<ListResult, ApiError> {
        let (rows, total) = self.select_page(params).await?;
        let pagination = Pagination::compute(params.page, params.limit, total);

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            let value = serde_json::to_value(row).map_err(|e| {
                tracing::error!("failed to serialize record: {}", e);
                ApiError::internal("Failed to format response")
            })?;
            data.push(project(value, &params.select));
        }

        Ok(ListResult {
            count: data.len(),
            data,
            pagination,
        })
    }
}

fn bind_value_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Arrays are expanded into member placeholders before binding
        Value::Array(_) | Value::Object(_) => q,
    }
}

fn bind_value_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q,
    }
}
