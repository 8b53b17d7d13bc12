use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use jobscout_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub enum ApiError {
    App(AppError),
    /// Request is well-formed JSON but semantically invalid.
    Validation(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, "validation_error", message),
            ApiError::App(err) => {
                let (status, error_type) = match &err {
                    AppError::SiteNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    AppError::ConfigError(_) | AppError::SelectorError { .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
                    }
                    AppError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
                    AppError::HttpError(_) | AppError::NetworkError(_) => {
                        (StatusCode::BAD_GATEWAY, "upstream_error")
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
                };
                (status, error_type, err.to_string())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::SiteNotFound("x".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (AppError::Timeout(3).into(), StatusCode::GATEWAY_TIMEOUT),
            (
                AppError::ConfigError("bad sites file".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::NetworkError("reset".into()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::Cancelled.into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
