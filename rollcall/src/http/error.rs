//! HTTP error payloads and mapping from service errors.
//!
//! Every failure is rendered as `{"detail": "..."}`. Storage failures are logged here and
//! redacted before they reach the client.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::service::StudentError;

const INTERNAL_ERROR: &str = "Internal server error";

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, detail: detail.into() }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, detail: detail.into() }
    }

    /// An internal failure. The detail is logged but replaced in the response body.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, detail: detail.into() }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<StudentError> for ApiError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::Validation(_) | StudentError::MalformedId(_) => {
                Self::bad_request(err.to_string())
            }
            StudentError::NotFound => Self::not_found(err.to_string()),
            StudentError::Timeout(_) | StudentError::Store(_) => {
                error!(error = %err, "storage failure");
                Self::internal(err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let detail = if self.status.is_server_error() {
            INTERNAL_ERROR.to_string()
        } else {
            self.detail.clone()
        };

        HttpResponse::build(self.status).json(ErrorBody { detail })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
