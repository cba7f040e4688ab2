//! Error handling
//!
//! Every failure in the service is an `AppError`. Repositories, services and
//! controllers all return `AppResult<T>`; the axum façade turns the error into
//! the JSON envelope `{success: false, message, error}` with the matching
//! HTTP status.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An availability precondition failed while starting an assignment.
    #[error("Unavailable: {message}")]
    Unavailable {
        message: String,
        driver_available: bool,
        vehicle_available: bool,
    },

    #[error("Already ended: {0}")]
    AlreadyEnded(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine readable code sent in the `error` field of the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "STORE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unavailable { .. } => "UNAVAILABLE",
            AppError::AlreadyEnded(_) => "ALREADY_ENDED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Upload(_) => "UPLOAD_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::Unavailable { .. }
            | AppError::AlreadyEnded(_)
            | AppError::BadRequest(_)
            | AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error envelope returned by the API
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    success: bool,
    message: String,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vehicle_available: Option<bool>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!("❌ {} ({}): {}", status, code, self);
        } else {
            tracing::warn!("⚠️ {} ({}): {}", status, code, self);
        }

        let mut body = ErrorResponse {
            success: false,
            message: String::new(),
            error: code,
            details: None,
            driver_available: None,
            vehicle_available: None,
        };

        match self {
            AppError::Database(e) => {
                body.message = "An error occurred while accessing the store".to_string();
                body.details = Some(json!({ "store_error": e.to_string() }));
            }
            AppError::Validation(e) => {
                body.message = "The provided data is invalid".to_string();
                body.details = Some(json!(e));
            }
            AppError::Unavailable {
                message,
                driver_available,
                vehicle_available,
            } => {
                body.message = message;
                body.driver_available = Some(driver_available);
                body.vehicle_available = Some(vehicle_available);
            }
            AppError::Io(e) => {
                body.message = "An unexpected error occurred".to_string();
                body.details = Some(json!({ "io_error": e.to_string() }));
            }
            AppError::Internal(msg) => {
                body.message = "An unexpected error occurred".to_string();
                body.details = Some(json!({ "internal_error": msg }));
            }
            AppError::NotFound(msg)
            | AppError::AlreadyEnded(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Upload(msg) => {
                body.message = msg;
            }
        }

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Upload(err.body_text())
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Helper for single-field validation errors
pub fn validation_error(field: &'static str, message: &str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.to_string().into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Helper for missing resources
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Helper for unique constraint conflicts
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_maps_to_404_envelope() {
        let (status, body) = body_json(not_found_error("Driver", "abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], "Driver with id 'abc' not found");
    }

    #[tokio::test]
    async fn unavailable_carries_both_flags() {
        let err = AppError::Unavailable {
            message: "Driver or Vehicle not available".to_string(),
            driver_available: true,
            vehicle_available: false,
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "UNAVAILABLE");
        assert_eq!(body["driverAvailable"], true);
        assert_eq!(body["vehicleAvailable"], false);
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        let (status, body) = body_json(conflict_error("Vehicle", "vehicleNumber", "CAB-1234")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");
    }

    #[tokio::test]
    async fn internal_errors_hide_details_from_message() {
        let (status, body) = body_json(AppError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An unexpected error occurred");
        assert_eq!(body["details"]["internal_error"], "boom");
    }

    #[test]
    fn validation_error_names_the_field() {
        match validation_error("driver", "invalid id") {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("driver"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
