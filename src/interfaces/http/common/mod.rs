//! Response envelope and request helpers shared by every module

pub mod error;
pub mod query;
pub mod trim;
pub mod validated_json;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub use query::ApiQuery;
pub use validated_json::ValidatedJson;

/// Standard API response wrapper.
///
/// Success: `{"status": "success", "data": {...}}`.
/// Failure: `{"status": "fail" | "error", "message": "..."}` where `fail`
/// marks client errors and `error` server faults.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in `data` for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".into(),
            message: None,
            results: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_results(mut self, results: usize) -> Self {
        self.results = Some(results);
        self
    }

    /// Client error (4xx)
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: "fail".into(),
            message: Some(message.into()),
            results: None,
            data: None,
        }
    }

    /// Server error (5xx)
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            message: Some(message.into()),
            results: None,
            data: None,
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    pub page: Option<u64>,
    /// Items per page (1–100). Default: 20
    pub limit: Option<u64>,
}

/// Page metadata returned next to list payloads
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> From<&crate::shared::PaginatedResult<T>> for PageInfo {
    fn from(result: &crate::shared::PaginatedResult<T>) -> Self {
        Self {
            page: result.page,
            limit: result.limit,
            total: result.total,
            total_pages: result.total_pages,
        }
    }
}
