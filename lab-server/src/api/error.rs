//! Mapping from domain errors to HTTP responses
//!
//! Every failure is returned as `{"error": "<message>"}`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lab_common::Error;
use serde_json::json;
use tracing::error;

/// Error type returned by every handler
#[derive(Debug)]
pub enum ApiError {
    /// Failure raised by the lifecycle controller, review engine or stores
    Domain(Error),
    /// Body or query string the extractor could not accept
    Rejected { status: StatusCode, message: String },
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Malformed field types surface as 422 from axum; report them as
        // plain validation failures. Size and content-type errors keep theirs.
        let status = match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        ApiError::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(Error::Validation(_) | Error::Referential(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::Domain(
                Error::Validation(msg) | Error::NotFound(msg) | Error::Referential(msg),
            ) => msg,
            ApiError::Domain(other) => {
                error!("Request failed: {}", other);
                match other {
                    Error::Database(_) => "Database operation failed".to_string(),
                    _ => "Internal server error".to_string(),
                }
            }
            ApiError::Rejected { message, .. } => message,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
