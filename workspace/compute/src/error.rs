use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// The fitted model is missing, unreadable or structurally invalid
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Forecast horizon must be a positive number of periods
    #[error("Invalid forecast horizon: {0}")]
    InvalidHorizon(usize),

    /// A caller supplied date that could not be parsed
    #[error("Invalid date format: '{0}'")]
    InvalidDateFormat(String),

    /// Error from the drawing backend
    #[error("Render error: {0}")]
    Render(String),

    /// Error from PNG encoding
    #[error("Image encoding error: {0}")]
    Encoding(#[from] image::ImageError),
}

impl ComputeError {
    /// Stable machine-readable code used in API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ComputeError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            ComputeError::InvalidHorizon(_) => "INVALID_HORIZON",
            ComputeError::InvalidDateFormat(_) => "INVALID_DATE_FORMAT",
            ComputeError::Render(_) => "RENDER_ERROR",
            ComputeError::Encoding(_) => "RENDER_ERROR",
        }
    }

    /// True when the error was caused by caller input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ComputeError::InvalidDateFormat(_) | ComputeError::InvalidHorizon(_)
        )
    }
}

/// Converts any drawing backend error into a `ComputeError::Render`.
pub(crate) fn render_error<E: std::fmt::Display>(e: E) -> ComputeError {
    let err = ComputeError::Render(e.to_string());
    error!(?err, "Drawing backend failed");
    err
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
