use common::{
    ApiResponse, ChartBar, ChartResponse, DateRange, ForecastPointDto, ForecastResponse,
    LegendItem, ModelSummaryDto,
};
use compute::forecast::ForecastProvider;
use compute::render::ReportRenderer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Fitted model, loaded once at startup
    pub forecaster: Arc<dyn ForecastProvider>,
    /// Chart renderer (fonts registered at startup)
    pub renderer: Arc<ReportRenderer>,
    /// Periods forecast per request
    pub horizon: usize,
}

/// Date range query for the chart endpoints
///
/// Both dates are required; they are optional here so that a missing one is
/// reported as `MISSING_PARAMETER` rather than a generic rejection.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    /// First day of the range (e.g. 2024-01-01)
    pub start_date: Option<String>,
    /// Last day of the range, inclusive (e.g. 2024-12-31)
    pub end_date: Option<String>,
}

/// Optional date range for the forecast endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForecastQuery {
    /// First day of the range (e.g. 2024-01-01)
    pub start_date: Option<String>,
    /// Last day of the range, inclusive (e.g. 2024-12-31)
    pub end_date: Option<String>,
}

/// Form submitted by the index page.
///
/// Fields are optional so a partially filled form reaches the handler and can
/// be answered with an error page instead of a bare rejection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartForm {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Name of the loaded model
    pub model: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::chart::get_chart,
        crate::handlers::chart::get_chart_png,
        crate::handlers::forecast::get_forecast,
        crate::handlers::forecast::get_model,
    ),
    components(
        schemas(
            ApiResponse<ChartResponse>,
            ApiResponse<ForecastResponse>,
            ApiResponse<ModelSummaryDto>,
            ErrorResponse,
            HealthResponse,
            ChartQuery,
            ForecastQuery,
            ChartResponse,
            ChartBar,
            LegendItem,
            ForecastResponse,
            ForecastPointDto,
            ModelSummaryDto,
            DateRange,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "chart", description = "Forecast chart rendering endpoints"),
        (name = "forecast", description = "Forecast data and model endpoints"),
    ),
    info(
        title = "Emission Forecast API",
        description = "Renders forecasts of a pre-fitted SARIMAX emission model as bar charts",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
