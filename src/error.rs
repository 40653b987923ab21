//! Error types for the emissions cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::fetch::FetchError;
use crate::models::ErrorResponse;

// == Service Error Enum ==
/// Error returned by a batch lookup.
///
/// Either variant fails the whole batch; there are no partial results.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed body or a row failing validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The downstream measurement call failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] FetchError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::Upstream(err) => {
                error!("Batch failed on upstream call: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the emissions cache server.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_is_bad_request() {
        let response = ServiceError::InvalidRequest("priority out of range".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_is_server_error() {
        let err = ServiceError::from(FetchError::Decode("unexpected token".into()));
        assert!(err.to_string().contains("unexpected token"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
