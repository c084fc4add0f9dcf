use std::collections::HashMap;

use crate::config::QueryConfig;

/// Parameter names that never become filter conditions
pub const RESERVED_PARAMS: &[&str] = &["select", "sort", "page", "limit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    /// Whole-word, case-sensitive operator tokens; anything else is not an
    /// operator and the raw key stays a literal equality filter.
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "in" => Some(FilterOp::In),
            _ => None,
        }
    }

    pub fn sql_operator(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::In => "IN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Parsed list-endpoint parameters: filter conditions plus projection,
/// sort order and page window.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub filters: Vec<FieldFilter>,
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub page: i64,
    pub limit: i64,
}

impl ListParams {
    /// Translate raw query-string pairs. Reserved parameters control the
    /// query shape; every other parameter becomes a filter condition.
    /// Malformed `page`/`limit` values fall back to defaults, never error.
    pub fn from_query(raw: &HashMap<String, String>, config: &QueryConfig) -> Self {
        let page = raw
            .get("page")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let limit = raw
            .get("limit")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(config.default_limit)
            .min(config.max_limit);

        let select = raw.get("select").map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        let select = select.filter(|fields| !fields.is_empty());

        let sort = raw
            .get("sort")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| match s.strip_prefix('-') {
                        Some(field) => SortKey {
                            field: field.to_string(),
                            direction: SortDirection::Desc,
                        },
                        None => SortKey {
                            field: s.to_string(),
                            direction: SortDirection::Asc,
                        },
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        // Sort remaining keys so the generated SQL is deterministic
        let mut filter_keys: Vec<&String> = raw
            .keys()
            .filter(|k| !RESERVED_PARAMS.contains(&k.as_str()))
            .collect();
        filter_keys.sort();

        let filters = filter_keys
            .into_iter()
            .map(|key| {
                let (field, op) = split_operator(key);
                FieldFilter {
                    field: field.to_string(),
                    op,
                    value: raw[key].clone(),
                }
            })
            .collect();

        Self {
            filters,
            select,
            sort,
            page,
            limit,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Split `field[op]` keys. An unrecognized bracketed token is passthrough:
/// the whole raw key stays an equality filter.
fn split_operator(key: &str) -> (&str, FilterOp) {
    if let Some(open) = key.find('[') {
        if key.ends_with(']') {
            if let Some(op) = FilterOp::from_token(&key[open + 1..key.len() - 1]) {
                return (&key[..open], op);
            }
        }
    }
    (key, FilterOp::Eq)
}

/// Map wire field names (`averageCost`) onto storage columns (`average_cost`)
pub fn to_snake_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> QueryConfig {
        QueryConfig {
            default_limit: 25,
            max_limit: 100,
        }
    }

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reserved_params_are_not_filters() {
        let params = ListParams::from_query(
            &raw(&[
                ("select", "name"),
                ("sort", "name"),
                ("page", "2"),
                ("limit", "10"),
                ("housing", "true"),
            ]),
            &config(),
        );
        assert_eq!(params.filters.len(), 1);
        assert_eq!(params.filters[0].field, "housing");
        assert_eq!(params.filters[0].op, FilterOp::Eq);
    }

    #[test]
    fn operator_suffixes_translate() {
        let params = ListParams::from_query(
            &raw(&[
                ("tuition[gt]", "100"),
                ("tuition[lte]", "5000"),
                ("careers[in]", "Business,UI/UX"),
            ]),
            &config(),
        );
        let ops: Vec<FilterOp> = params.filters.iter().map(|f| f.op).collect();
        assert!(ops.contains(&FilterOp::Gt));
        assert!(ops.contains(&FilterOp::Lte));
        assert!(ops.contains(&FilterOp::In));
    }

    #[test]
    fn unknown_operator_token_is_literal_equality() {
        let params = ListParams::from_query(&raw(&[("tuition[bogus]", "100")]), &config());
        assert_eq!(params.filters.len(), 1);
        assert_eq!(params.filters[0].field, "tuition[bogus]");
        assert_eq!(params.filters[0].op, FilterOp::Eq);
    }

    #[test]
    fn operator_tokens_are_case_sensitive() {
        let params = ListParams::from_query(&raw(&[("tuition[GT]", "100")]), &config());
        assert_eq!(params.filters[0].field, "tuition[GT]");
        assert_eq!(params.filters[0].op, FilterOp::Eq);
    }

    #[test]
    fn malformed_pagination_falls_back_to_defaults() {
        let params =
            ListParams::from_query(&raw(&[("page", "abc"), ("limit", "-3")]), &config());
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 25);
    }

    #[test]
    fn limit_is_capped() {
        let params = ListParams::from_query(&raw(&[("limit", "5000")]), &config());
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn sort_parses_descending_prefix() {
        let params = ListParams::from_query(&raw(&[("sort", "-averageCost,name")]), &config());
        assert_eq!(
            params.sort,
            vec![
                SortKey {
                    field: "averageCost".to_string(),
                    direction: SortDirection::Desc
                },
                SortKey {
                    field: "name".to_string(),
                    direction: SortDirection::Asc
                },
            ]
        );
    }

    #[test]
    fn select_splits_on_commas() {
        let params = ListParams::from_query(&raw(&[("select", "name, description")]), &config());
        assert_eq!(
            params.select,
            Some(vec!["name".to_string(), "description".to_string()])
        );
    }

    #[test]
    fn page_window_offset() {
        let params = ListParams::from_query(&raw(&[("page", "3"), ("limit", "10")]), &config());
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn snake_case_mapping() {
        assert_eq!(to_snake_case("averageCost"), "average_cost");
        assert_eq!(to_snake_case("jobAssistance"), "job_assistance");
        assert_eq!(to_snake_case("name"), "name");
    }
}
