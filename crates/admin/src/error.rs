//! Unified error handling for the admin backend.
//!
//! Every error a handler can produce is a typed [`AppError`] variant; the
//! HTTP mapping lives in one `IntoResponse` impl so callers never inspect
//! message text to pick a status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationErrors;

/// Application-level error type for the admin backend.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload failed validation; carries field-level detail.
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// Resource not found (or soft-deleted).
    #[error("not found: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures are captured with full context; the client
        // only ever sees a generic message for them.
        match self {
            Self::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))).into_response()
            }
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response()
            }
            Self::Database(RepositoryError::NotFound) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "not found" })),
            )
                .into_response(),
            Self::Database(RepositoryError::Conflict { field, message }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": [{ "field": field, "message": message }] })),
            )
                .into_response(),
            Self::Database(error) => {
                let event_id = sentry::capture_error(&error);
                tracing::error!(
                    error = %error,
                    sentry_event_id = %event_id,
                    "admin request failed"
                );
                internal_error_response()
            }
            Self::Internal(message) => {
                tracing::error!(error = %message, "admin request failed");
                internal_error_response()
            }
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_validation_maps_to_422() {
        let errors = ValidationErrors::single("email", "must contain an @ symbol");
        assert_eq!(status_of(AppError::Validation(errors)), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(AppError::NotFound("SAAS admin not found".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_maps_to_422() {
        let err = AppError::Database(RepositoryError::conflict("email", "email already exists"));
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unknown_schema_is_internal() {
        // A missing tenant schema must not look like a routine 404; the
        // request failed outright.
        let err = AppError::Database(RepositoryError::UnknownSchema("ghost".to_owned()));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_maps_to_500() {
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
