//! Application error type shared by services and HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::media::MediaError;
use crate::store::StoreError;

/// One offending field in a validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Error type for all service operations and HTTP handlers.
///
/// Implements [`IntoResponse`] so handlers can return `Result<_, ApiError>`
/// and get consistent JSON error bodies. Validation failures carry the full
/// per-field detail; storage failures are logged server-side and surface
/// only a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Please check your form data".to_string(),
                Some(errors),
            ),
            ApiError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, format!("{} not found", entity), None)
            }
            ApiError::UnsupportedMediaType(filename) => {
                tracing::warn!(filename = %filename, "upload rejected by media filter");
                (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "Only image and video files are allowed!".to_string(),
                    None,
                )
            }
            ApiError::Unauthorized(reason) => {
                (StatusCode::UNAUTHORIZED, reason.to_string(), None)
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                    None,
                )
            }
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                    None,
                )
            }
            ApiError::Media(e) => {
                tracing::error!(error = %e, "media store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                    None,
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
                errors,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400_with_field_detail() {
        let err = ApiError::Validation(vec![FieldError::new("message", "too short")]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("Project").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_media_filter_rejection_maps_to_415() {
        let response = ApiError::UnsupportedMediaType("evil.exe".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_storage_failure_maps_to_500() {
        let response =
            ApiError::Storage(StoreError::Backend("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
