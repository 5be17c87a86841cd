//! API error type shared by all HTTP endpoint groups.
//!
//! Maps domain error codes onto HTTP statuses: validation failures to
//! 422, conflicts and invalid-state to 409, failed preconditions to
//! 412, the not-found family to 404, everything else to 500.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error that converts application and domain errors to HTTP
/// responses.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnprocessableEntity(ErrorResponse),
    Conflict(ErrorResponse),
    PreconditionFailed(ErrorResponse),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let response = ErrorResponse {
            code: err.code.to_string(),
            message: err.message.clone(),
            details: if err.details.is_empty() {
                None
            } else {
                serde_json::to_value(&err.details).ok()
            },
        };

        if err.code.is_not_found() {
            return ApiError::NotFound(err.message);
        }
        match err.code {
            ErrorCode::ValidationFailed => ApiError::UnprocessableEntity(response),
            ErrorCode::Conflict | ErrorCode::InvalidState => ApiError::Conflict(response),
            ErrorCode::PreconditionFailed => ApiError::PreconditionFailed(response),
            _ => ApiError::Internal(err.message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    code: "BAD_REQUEST".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    code: "NOT_FOUND".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::UnprocessableEntity(error) => (StatusCode::UNPROCESSABLE_ENTITY, error),
            ApiError::Conflict(error) => (StatusCode::CONFLICT, error),
            ApiError::PreconditionFailed(error) => (StatusCode::PRECONDITION_FAILED, error),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    code: "INTERNAL_ERROR".to_string(),
                    message,
                    details: None,
                },
            ),
        };

        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let err: ApiError = DomainError::validation("year", "must be positive").into();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflict_and_invalid_state_map_to_409() {
        let conflict: ApiError = DomainError::conflict("duplicate").into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let invalid: ApiError = DomainError::invalid_state("judged").into();
        assert_eq!(invalid.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn precondition_maps_to_412() {
        let err: ApiError = DomainError::precondition("pending votings").into();
        assert_eq!(err.into_response().status(), StatusCode::PRECONDITION_FAILED);
    }

    #[test]
    fn not_found_family_maps_to_404() {
        let err: ApiError =
            DomainError::new(ErrorCode::SessionNotFound, "Session not found").into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_maps_to_500() {
        let err: ApiError = DomainError::new(ErrorCode::DatabaseError, "pool exhausted").into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn details_survive_the_mapping() {
        let err: ApiError = DomainError::precondition("pending votings")
            .with_detail("pending_voting_ids", "a,b")
            .into();
        match err {
            ApiError::PreconditionFailed(response) => {
                assert!(response.details.is_some());
            }
            other => panic!("expected PreconditionFailed, got {:?}", other),
        }
    }
}
