//! API error type and its HTTP mapping
//!
//! Every route funnels failures through [`ApiError`] so no storage error
//! escapes as an unstructured response. Body is always `{"error": msg}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blend_common::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Blend API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload structurally wrong (400)
    #[error("{0}")]
    Validation(String),

    /// Unknown id, or no records at all (404)
    #[error("{0}")]
    NotFound(String),

    /// Persistence layer failure (500)
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<blend_common::Error> for ApiError {
    fn from(err: blend_common::Error) -> Self {
        match err {
            blend_common::Error::InvalidInput(msg) => ApiError::Validation(msg),
            other => {
                error!("Storage error: {}", other);
                ApiError::Storage(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Storage("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_common_error_conversion() {
        let err: ApiError = blend_common::Error::InvalidInput("bad".into()).into();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "bad"));

        let err: ApiError = blend_common::Error::Config("boom".into()).into();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
