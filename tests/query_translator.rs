// End-to-end checks of the list-query translation surface: raw query-string
// pairs in, parameterized SQL + pagination metadata out. No database needed.

use std::collections::HashMap;

use serde_json::{json, Value};

use bootcamp_api::config::QueryConfig;
use bootcamp_api::database::models::bootcamp;
use bootcamp_api::query::{project, ListParams, PageRef, Pagination, SelectQuery};

fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn config() -> QueryConfig {
    QueryConfig {
        default_limit: 25,
        max_limit: 100,
    }
}

#[test]
fn filter_sort_select_and_window_compose() {
    let params = ListParams::from_query(
        &raw(&[
            ("averageCost[lte]", "10000"),
            ("housing", "true"),
            ("select", "name,averageCost"),
            ("sort", "-averageCost"),
            ("page", "2"),
            ("limit", "10"),
        ]),
        &config(),
    );

    let sql = SelectQuery::new(
        bootcamp::TABLE,
        bootcamp::COLUMNS,
        bootcamp::ARRAY_COLUMNS,
        &params,
    )
        .expect("valid table")
        .to_sql();

    assert_eq!(
        sql.query,
        "SELECT * FROM \"bootcamps\" WHERE \"average_cost\" <= $1 AND \"housing\" = $2 \
         ORDER BY \"average_cost\" DESC LIMIT 10 OFFSET 10"
    );
    assert_eq!(sql.params, vec![json!(10000), json!(true)]);
    assert_eq!(
        params.select,
        Some(vec!["name".to_string(), "averageCost".to_string()])
    );
}

#[test]
fn bogus_operator_token_keeps_raw_key_as_equality() {
    // `price[bogus]` is passthrough: a literal equality filter on the raw
    // key, which no column carries, so the predicate matches nothing
    let params = ListParams::from_query(&raw(&[("tuition[bogus]", "100")]), &config());
    let sql = SelectQuery::new(
        bootcamp::TABLE,
        bootcamp::COLUMNS,
        bootcamp::ARRAY_COLUMNS,
        &params,
    )
        .expect("valid table")
        .to_sql();
    assert!(sql.query.contains("WHERE 1=0"));
}

#[test]
fn in_operator_builds_set_membership() {
    let params = ListParams::from_query(&raw(&[("careers[in]", "Business,Other")]), &config());
    let sql = SelectQuery::new(
        bootcamp::TABLE,
        bootcamp::COLUMNS,
        bootcamp::ARRAY_COLUMNS,
        &params,
    )
        .expect("valid table")
        .to_sql();
    assert!(sql.query.contains("\"careers\" && ARRAY[$1, $2]"));
    assert_eq!(sql.params, vec![json!("Business"), json!("Other")]);
}

#[test]
fn pagination_metadata_at_each_boundary() {
    // total=30, limit=10
    let middle = Pagination::compute(2, 10, 30);
    assert_eq!(middle.next, Some(PageRef { page: 3, limit: 10 }));
    assert_eq!(middle.prev, Some(PageRef { page: 1, limit: 10 }));

    let first = Pagination::compute(1, 10, 30);
    assert_eq!(first.prev, None);
    assert_eq!(first.next, Some(PageRef { page: 2, limit: 10 }));

    let last = Pagination::compute(3, 10, 30);
    assert_eq!(last.next, None);
    assert_eq!(last.prev, Some(PageRef { page: 2, limit: 10 }));
}

#[test]
fn malformed_pagination_never_errors() {
    let params = ListParams::from_query(
        &raw(&[("page", "two"), ("limit", "many")]),
        &config(),
    );
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 25);

    let sql = SelectQuery::new(
        bootcamp::TABLE,
        bootcamp::COLUMNS,
        bootcamp::ARRAY_COLUMNS,
        &params,
    )
        .expect("valid table")
        .to_sql();
    assert!(sql.query.ends_with("LIMIT 25 OFFSET 0"));
}

#[test]
fn projection_restricts_fields_and_keeps_id() {
    let record = json!({
        "id": "2a9b1a40-0000-4000-8000-000000000001",
        "name": "Devworks Bootcamp",
        "description": "Full stack development",
        "averageCost": 10000.0
    });
    let select = Some(vec!["name".to_string()]);
    let projected = project(record, &select);
    assert_eq!(
        projected,
        json!({
            "id": "2a9b1a40-0000-4000-8000-000000000001",
            "name": "Devworks Bootcamp"
        })
    );
}

#[test]
fn count_query_matches_filter_predicate_only() {
    let params = ListParams::from_query(
        &raw(&[("housing", "true"), ("page", "4"), ("limit", "5")]),
        &config(),
    );
    let count_sql = SelectQuery::new(
        bootcamp::TABLE,
        bootcamp::COLUMNS,
        bootcamp::ARRAY_COLUMNS,
        &params,
    )
        .expect("valid table")
        .to_count_sql();
    assert_eq!(
        count_sql.query,
        "SELECT COUNT(*) AS count FROM \"bootcamps\" WHERE \"housing\" = $1"
    );
    assert_eq!(count_sql.params, vec![Value::Bool(true)]);
}

#[test]
fn deterministic_sql_for_equal_inputs() {
    let pairs = raw(&[
        ("city", "Boston"),
        ("averageRating[gte]", "8"),
        ("housing", "true"),
    ]);
    let a = ListParams::from_query(&pairs, &config());
    let b = ListParams::from_query(&pairs, &config());
    let sql_a = SelectQuery::new(bootcamp::TABLE, bootcamp::COLUMNS, bootcamp::ARRAY_COLUMNS, &a)
        .expect("valid table")
        .to_sql();
    let sql_b = SelectQuery::new(bootcamp::TABLE, bootcamp::COLUMNS, bootcamp::ARRAY_COLUMNS, &b)
        .expect("valid table")
        .to_sql();
    assert_eq!(sql_a.query, sql_b.query);
    assert_eq!(sql_a.params, sql_b.params);
}
