use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use compute::error::ComputeError;
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Compute(#[from] ComputeError),

    /// Only one side of a date range was supplied.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Compute(ComputeError::ModelUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Compute(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Compute(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Compute(e) => e.code(),
            AppError::MissingParameter(_) => "MISSING_PARAMETER",
            AppError::Task(_) => "RENDER_ERROR",
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        }
    }
}

impl From<AppError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: AppError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, err);
        } else {
            warn!("Rejected request with {}: {}", status, err);
        }
        (status, Json(err.to_error_response()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        <(StatusCode, Json<ErrorResponse>)>::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(ComputeError::InvalidDateFormat("2024-13-45".into())),
                StatusCode::BAD_REQUEST,
                "INVALID_DATE_FORMAT",
            ),
            (
                AppError::from(ComputeError::InvalidHorizon(0)),
                StatusCode::BAD_REQUEST,
                "INVALID_HORIZON",
            ),
            (
                AppError::from(ComputeError::ModelUnavailable("gone".into())),
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_UNAVAILABLE",
            ),
            (
                AppError::from(ComputeError::Render("backend".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "RENDER_ERROR",
            ),
            (
                AppError::MissingParameter("end_date"),
                StatusCode::BAD_REQUEST,
                "MISSING_PARAMETER",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status(), status, "{}", err);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_error_response_payload() {
        let err = AppError::from(ComputeError::InvalidDateFormat("yesterday".into()));
        let (status, Json(body)) = <(StatusCode, Json<ErrorResponse>)>::from(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.code, "INVALID_DATE_FORMAT");
        assert!(body.error.contains("yesterday"));
    }
}
