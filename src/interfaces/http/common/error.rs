//! Centralised error formatting
//!
//! Every handler returns `Result<_, DomainError>`; this turns the error into
//! the JSON failure envelope. Infrastructure faults are logged and masked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::shared::errors::DomainError;

pub const MSG_INTERNAL: &str = "Something went very wrong!";

pub fn status_code(err: &DomainError) -> StatusCode {
    match err {
        DomainError::InvalidId { .. }
        | DomainError::Conflict(_)
        | DomainError::Validation(_)
        | DomainError::BadRequest(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) | DomainError::InvalidToken | DomainError::TokenExpired => {
            StatusCode::UNAUTHORIZED
        }
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Infra(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = status_code(&self);

        if !self.is_operational() {
            error!(error = %self, "Unhandled error");
            return (status, Json(ApiResponse::<()>::error(MSG_INTERNAL))).into_response();
        }

        (status, Json(ApiResponse::<()>::fail(self.to_string()))).into_response()
    }
}
