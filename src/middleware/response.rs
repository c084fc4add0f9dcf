use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::query::{ListResult, Pagination};

/// Wrapper for API responses that adds the `{success, data, ...}` envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    pub count: Option<usize>,
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
            count: None,
            pagination: None,
        }
    }

    /// 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            data,
            status_code: Some(StatusCode::CREATED),
            count: None,
            pagination: None,
        }
    }

    /// Response carrying a record count but no pagination (nested lists)
    pub fn counted(data: T, count: usize) -> Self {
        Self {
            data,
            status_code: None,
            count: Some(count),
            pagination: None,
        }
    }
}

impl ApiResponse<Vec<Value>> {
    /// List response with count and pagination metadata
    pub fn list(result: ListResult) -> Self {
        let pagination = (!result.pagination.is_empty()).then_some(result.pagination);
        Self {
            data: result.data,
            status_code: None,
            count: Some(result.count),
            pagination,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data_value
        });
        if let Some(count) = self.count {
            envelope["count"] = json!(count);
        }
        if let Some(pagination) = &self.pagination {
            match serde_json::to_value(pagination) {
                Ok(value) => envelope["pagination"] = value,
                Err(e) => tracing::error!("failed to serialize pagination: {}", e),
            }
        }

        (status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
