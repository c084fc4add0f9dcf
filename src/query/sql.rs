use serde_json::Value;

use super::error::QueryError;
use super::params::{to_snake_case, FieldFilter, FilterOp, ListParams};

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Translates parsed list parameters into a parameterized SELECT against a
/// single table. Filter, sort and select fields are resolved against the
/// table's column set; a filter on an unknown field matches no records (no
/// row carries the field), unknown sort fields are dropped.
pub struct SelectQuery<'a> {
    table: &'a str,
    columns: &'a [&'a str],
    array_columns: &'a [&'a str],
    params: &'a ListParams,
}

impl<'a> SelectQuery<'a> {
    pub fn new(
        table: &'a str,
        columns: &'a [&'a str],
        array_columns: &'a [&'a str],
        params: &'a ListParams,
    ) -> Result<Self, QueryError> {
        validate_identifier(table)
            .map_err(|()| QueryError::InvalidTableName(table.to_string()))?;
        for column in columns {
            validate_identifier(column)
                .map_err(|()| QueryError::InvalidColumn(column.to_string()))?;
        }
        Ok(Self {
            table,
            columns,
            array_columns,
            params,
        })
    }

    /// Full row query: filter predicate, sort order and page window
    pub fn to_sql(&self) -> SqlResult {
        let mut values = Vec::new();
        let where_clause = self.where_clause(&mut values);
        let query = [
            format!("SELECT * FROM \"{}\"", self.table),
            if where_clause.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", where_clause)
            },
            self.order_clause(),
            format!(
                "LIMIT {} OFFSET {}",
                self.params.limit,
                self.params.offset()
            ),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult {
            query,
            params: values,
        }
    }

    /// Count of records matching the filter predicate, independent of the
    /// page window
    pub fn to_count_sql(&self) -> SqlResult {
        let mut values = Vec::new();
        let where_clause = self.where_clause(&mut values);
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table)
        } else {
            format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                self.table, where_clause
            )
        };
        SqlResult {
            query,
            params: values,
        }
    }

    fn where_clause(&self, values: &mut Vec<Value>) -> String {
        self.params
            .filters
            .iter()
            .map(|filter| self.condition(filter, values))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn condition(&self, filter: &FieldFilter, values: &mut Vec<Value>) -> String {
        let Some(column) = self.resolve_column(&filter.field) else {
            return "1=0".to_string();
        };
        let is_array = self.array_columns.contains(&column);
        match (filter.op, is_array) {
            (FilterOp::In, _) => {
                let members: Vec<&str> = filter
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                if members.is_empty() {
                    return "1=0".to_string();
                }
                let placeholders: Vec<String> = members
                    .iter()
                    .map(|m| param(values, coerce_literal(m)))
                    .collect();
                if is_array {
                    // Membership against an array column is overlap: any
                    // requested member present in the stored set
                    format!("\"{}\" && ARRAY[{}]", column, placeholders.join(", "))
                } else {
                    format!("\"{}\" IN ({})", column, placeholders.join(", "))
                }
            }
            (FilterOp::Eq, true) => format!(
                "{} = ANY(\"{}\")",
                param(values, coerce_literal(&filter.value)),
                column
            ),
            // Ordering comparisons do not apply to array columns
            (_, true) => "1=0".to_string(),
            (op, false) => format!(
                "\"{}\" {} {}",
                column,
                op.sql_operator(),
                param(values, coerce_literal(&filter.value))
            ),
        }
    }

    fn order_clause(&self) -> String {
        let parts: Vec<String> = self
            .params
            .sort
            .iter()
            .filter_map(|key| {
                self.resolve_column(&key.field)
                    .map(|column| format!("\"{}\" {}", column, key.direction.to_sql()))
            })
            .collect();
        if parts.is_empty() {
            // creation-time descending when the client gives no usable sort
            return "ORDER BY \"created_at\" DESC".to_string();
        }
        format!("ORDER BY {}", parts.join(", "))
    }

    fn resolve_column(&self, field: &str) -> Option<&'a str> {
        let snake = to_snake_case(field);
        self.columns.iter().copied().find(|c| *c == snake)
    }
}

fn param(values: &mut Vec<Value>, value: Value) -> String {
    values.push(value);
    format!("${}", values.len())
}

/// Query parameters arrive as strings; infer the bound type from the
/// literal: integer, float, boolean, else string.
pub fn coerce_literal(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn validate_identifier(name: &str) -> Result<(), ()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(());
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::query::params::ListParams;
    use std::collections::HashMap;

    const COLUMNS: &[&str] =
        &["id", "name", "tuition", "housing", "careers", "average_cost", "created_at"];
    const ARRAY_COLUMNS: &[&str] = &["careers"];

    fn params_for(pairs: &[(&str, &str)]) -> ListParams {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListParams::from_query(
            &raw,
            &QueryConfig {
                default_limit: 25,
                max_limit: 100,
            },
        )
    }

    #[test]
    fn comparison_filter_generates_placeholder() {
        let params = params_for(&[("tuition[gt]", "100")]);
        let sql = SelectQuery::new("courses", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"courses\" WHERE \"tuition\" > $1 ORDER BY \"created_at\" DESC LIMIT 25 OFFSET 0"
        );
        assert_eq!(sql.params, vec![Value::from(100)]);
    }

    #[test]
    fn in_filter_expands_members() {
        let params = params_for(&[("name[in]", "alpha,beta")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert!(sql.query.contains("\"name\" IN ($1, $2)"));
        assert_eq!(
            sql.params,
            vec![
                Value::String("alpha".to_string()),
                Value::String("beta".to_string())
            ]
        );
    }

    #[test]
    fn array_membership_uses_overlap() {
        let params = params_for(&[("careers[in]", "Business,Other")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params)
            .unwrap()
            .to_sql();
        assert!(sql.query.contains("\"careers\" && ARRAY[$1, $2]"));
    }

    #[test]
    fn array_equality_matches_stored_members() {
        let params = params_for(&[("careers", "Business")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params)
            .unwrap()
            .to_sql();
        assert!(sql.query.contains("$1 = ANY(\"careers\")"));
        assert_eq!(sql.params, vec![Value::String("Business".to_string())]);
    }

    #[test]
    fn unknown_field_matches_nothing() {
        let params = params_for(&[("tuition[bogus]", "100")]);
        let sql = SelectQuery::new("courses", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert!(sql.query.contains("WHERE 1=0"));
        assert!(sql.params.is_empty());
    }

    #[test]
    fn camel_case_fields_resolve_to_columns() {
        let params = params_for(&[("averageCost[lte]", "10000")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert!(sql.query.contains("\"average_cost\" <= $1"));
    }

    #[test]
    fn default_sort_is_created_at_desc() {
        let params = params_for(&[]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert!(sql.query.contains("ORDER BY \"created_at\" DESC"));
    }

    #[test]
    fn explicit_sort_overrides_default() {
        let params = params_for(&[("sort", "-averageCost,name")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert!(sql
            .query
            .contains("ORDER BY \"average_cost\" DESC, \"name\" ASC"));
    }

    #[test]
    fn unknown_sort_fields_are_dropped() {
        let params = params_for(&[("sort", "bogusField")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert!(sql.query.contains("ORDER BY \"created_at\" DESC"));
    }

    #[test]
    fn page_window_appears_in_sql() {
        let params = params_for(&[("page", "2"), ("limit", "10")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params).unwrap().to_sql();
        assert!(sql.query.ends_with("LIMIT 10 OFFSET 10"));
    }

    #[test]
    fn count_ignores_page_window_but_keeps_filter() {
        let params = params_for(&[("housing", "true"), ("page", "3"), ("limit", "5")]);
        let sql = SelectQuery::new("bootcamps", COLUMNS, ARRAY_COLUMNS, &params)
            .unwrap()
            .to_count_sql();
        assert_eq!(
            sql.query,
            "SELECT COUNT(*) AS count FROM \"bootcamps\" WHERE \"housing\" = $1"
        );
        assert_eq!(sql.params, vec![Value::Bool(true)]);
    }

    #[test]
    fn literal_coercion() {
        assert_eq!(coerce_literal("42"), Value::from(42));
        assert_eq!(coerce_literal("3.5"), Value::from(3.5));
        assert_eq!(coerce_literal("true"), Value::Bool(true));
        assert_eq!(
            coerce_literal("Boston"),
            Value::String("Boston".to_string())
        );
    }

    #[test]
    fn rejects_invalid_table_names() {
        let params = params_for(&[]);
        assert!(SelectQuery::new("boot camps", COLUMNS, ARRAY_COLUMNS, &params).is_err());
        assert!(SelectQuery::new("", COLUMNS, ARRAY_COLUMNS, &params).is_err());
    }
}
