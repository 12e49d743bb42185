use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::{ApiResponse, ForecastResponse, ModelSummaryDto};
use compute::dates::DateRange;
use compute::forecast::ForecastSequence;
use compute::window::filter_window;
use tracing::{debug, instrument, trace};

use crate::error::AppError;
use crate::handlers::date_pair;
use crate::helpers::converters::{date_range_to_dto, points_to_dtos, summary_to_dto};
use crate::schemas::{AppState, ErrorResponse, ForecastQuery};

/// Run the forecast recursion for the configured horizon on the blocking pool.
pub(crate) async fn forecast_blocking(state: &AppState) -> Result<ForecastSequence, AppError> {
    let forecaster = state.forecaster.clone();
    let horizon = state.horizon;

    trace!("Spawning forecast task");
    let sequence = tokio::task::spawn_blocking(move || forecaster.forecast(horizon)).await??;
    Ok(sequence)
}

/// Get forecast points, optionally restricted to a date range
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "forecast",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Forecast computed successfully", body = ApiResponse<ForecastResponse>),
        (status = 400, description = "Invalid date or only one bound given", body = ErrorResponse),
        (status = 503, description = "Model unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_forecast(
    Query(query): Query<ForecastQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ForecastResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let range = match date_pair(query.start_date.as_deref(), query.end_date.as_deref())? {
        Some((start, end)) => Some(DateRange::parse(start, end).map_err(AppError::from)?),
        None => None,
    };

    let sequence = forecast_blocking(&state).await?;

    let points = match &range {
        Some(range) => filter_window(&sequence, range),
        None => sequence.points.clone(),
    };
    debug!("Returning {} of {} forecast points", points.len(), sequence.len());

    let response = ForecastResponse {
        horizon: state.horizon,
        range: range.as_ref().map(date_range_to_dto),
        points: points_to_dtos(&points),
    };
    Ok(Json(ApiResponse::ok(response, "Forecast computed successfully")))
}

/// Describe the loaded model
#[utoipa::path(
    get,
    path = "/api/v1/model",
    tag = "forecast",
    responses(
        (status = 200, description = "Model summary", body = ApiResponse<ModelSummaryDto>)
    )
)]
#[instrument(skip(state))]
pub async fn get_model(State(state): State<AppState>) -> Json<ApiResponse<ModelSummaryDto>> {
    let summary = state.forecaster.summary();
    Json(ApiResponse::ok(
        summary_to_dto(&summary, state.horizon),
        "Model summary retrieved successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{TEST_HORIZON, setup_test_app_state};

    #[tokio::test]
    async fn test_forecast_blocking_returns_full_horizon() {
        let state = setup_test_app_state();

        let sequence = forecast_blocking(&state).await.unwrap();

        assert_eq!(sequence.len(), TEST_HORIZON);
        assert_eq!(sequence, state.forecaster.forecast(TEST_HORIZON).unwrap());
    }

    #[tokio::test]
    async fn test_forecast_blocking_rejects_zero_horizon() {
        let state = AppState {
            horizon: 0,
            ..setup_test_app_state()
        };

        let err = forecast_blocking(&state).await.unwrap_err();

        assert_eq!(err.code(), "INVALID_HORIZON");
    }
}
