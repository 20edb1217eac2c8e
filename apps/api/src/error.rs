use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hsg_core::AppError;
use tracing::error;

mod types;

pub use types::{ErrorBody, ErrorResponse};

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    malformed_request: bool,
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self {
            error: value,
            malformed_request: false,
        }
    }
}

impl ApiError {
    /// Error for a request body or query that could not be read at all.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: AppError::Validation(message.into()),
            malformed_request: true,
        }
    }

    /// Status code and stable machine-readable code for the wrapped error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        if self.malformed_request {
            return (StatusCode::BAD_REQUEST, "BAD_REQUEST");
        }

        match self.error {
            AppError::Validation(_) | AppError::InvalidFields { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match self.error {
            AppError::Validation(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message)
            | AppError::Unauthorized(message)
            | AppError::RateLimited(message) => ErrorBody::new(code, message, None),
            AppError::InvalidFields { message, fields } => ErrorBody::new(
                code,
                message,
                Some(
                    fields
                        .iter()
                        .map(|(field, message)| (field.to_owned(), message.to_owned()))
                        .collect(),
                ),
            ),
            AppError::Internal(detail) => {
                error!(detail = %detail, "request failed with internal error");
                ErrorBody::new(
                    code,
                    "Something went wrong. Please try again.".to_owned(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse::new(body))).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
