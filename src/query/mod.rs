pub mod error;
pub mod pagination;
pub mod params;
pub mod projection;
pub mod sql;

pub use pagination::{PageRef, Pagination};
pub use params::{FieldFilter, FilterOp, ListParams, SortDirection, SortKey};
pub use projection::project;
pub use sql::{SelectQuery, SqlResult};

/// One page of list results, ready for the response envelope
#[derive(Debug, Clone)]
pub struct ListResult {
    pub data: Vec<serde_json::Value>,
    pub count: usize,
    pub pagination: Pagination,
}
