use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_shortener::ShortenerError;
use tracing::error;

use crate::model::{ErrorResponse, ValidationErrorResponse};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The request body could not be decoded.
    BadRequest(String),
    /// The readiness probe failed.
    NotReady(ShortenerError),
    Shortener(ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        Self::Shortener(value)
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            AppError::NotReady(e) => {
                error!(error = %e, "Readiness check failed");
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service not ready: database unavailable",
                )
            }
            AppError::Shortener(ShortenerError::Validation(details)) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    error: "Validation failed",
                    details,
                }),
            )
                .into_response(),
            AppError::Shortener(ShortenerError::AlreadyExists(_)) => {
                error_response(StatusCode::CONFLICT, "Short code already exists")
            }
            AppError::Shortener(ShortenerError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, "Short URL not found")
            }
            AppError::Shortener(ShortenerError::InvalidInput(message)) => {
                error_response(StatusCode::BAD_REQUEST, message)
            }
            AppError::Shortener(e @ ShortenerError::RepositoryUnavailable(_)) => {
                error!(error = %e, "Request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
