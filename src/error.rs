use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::providers::EngineError;

/// Request-scoped failures surfaced to HTTP callers.
///
/// Validation and classification misses never appear here: they degrade the
/// result set instead of the response status.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upstream rate limit hit, please wait a moment")]
    RateLimited,

    #[error("internal analysis failure")]
    UpstreamMalformed,

    #[error("analysis engine failure: {0}")]
    Engine(String),
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::RateLimited(_) => ServiceError::RateLimited,
            other => ServiceError::Engine(other.to_string()),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::UpstreamMalformed | ServiceError::Engine(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
