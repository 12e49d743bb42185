use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use common::{ApiResponse, ChartResponse};
use compute::render::RenderedReport;
use tracing::{debug, info, instrument, trace};

use crate::error::AppError;
use crate::handlers::date_pair;
use crate::helpers::converters::{PNG_MIME_TYPE, report_to_chart_response};
use crate::schemas::{AppState, ChartQuery, ErrorResponse};

/// Forecast the configured horizon and render the chart for `[start, end]`.
///
/// Forecasting and rasterization are CPU bound and run on the blocking pool.
pub(crate) async fn build_report(
    state: &AppState,
    start_date: &str,
    end_date: &str,
) -> Result<RenderedReport, AppError> {
    let forecaster = state.forecaster.clone();
    let renderer = state.renderer.clone();
    let horizon = state.horizon;
    let start_date = start_date.to_string();
    let end_date = end_date.to_string();

    trace!("Spawning chart rendering task");
    let report = tokio::task::spawn_blocking(move || {
        let sequence = forecaster.forecast(horizon)?;
        renderer.render(&sequence, &start_date, &end_date)
    })
    .await??;

    info!(
        "Rendered chart for {} to {}: {} bars in {} year groups",
        report.range.start,
        report.range.end,
        report.chart.bars.len(),
        report.chart.group_count()
    );
    Ok(report)
}

async fn report_for_query(state: &AppState, query: &ChartQuery) -> Result<RenderedReport, AppError> {
    match date_pair(query.start_date.as_deref(), query.end_date.as_deref())? {
        Some((start, end)) => build_report(state, start, end).await,
        None => Err(AppError::MissingParameter("start_date")),
    }
}

/// Render the forecast chart for a date range
#[utoipa::path(
    get,
    path = "/api/v1/chart",
    tag = "chart",
    params(ChartQuery),
    responses(
        (status = 200, description = "Chart rendered successfully", body = ApiResponse<ChartResponse>),
        (status = 400, description = "Invalid or missing date", body = ErrorResponse),
        (status = 500, description = "Chart rendering failed", body = ErrorResponse),
        (status = 503, description = "Model unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_chart(
    Query(query): Query<ChartQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let report = report_for_query(&state, &query).await?;
    let chart = report_to_chart_response(&report);
    debug!("Chart payload carries {} bytes of base64", chart.image_base64.len());

    let message = if chart.empty_window {
        "No forecast periods in the requested range"
    } else {
        "Chart rendered successfully"
    };
    Ok(Json(ApiResponse::ok(chart, message)))
}

/// Render the forecast chart as a PNG image
#[utoipa::path(
    get,
    path = "/api/v1/chart.png",
    tag = "chart",
    params(ChartQuery),
    responses(
        (status = 200, description = "PNG image of the chart", content_type = "image/png"),
        (status = 400, description = "Invalid or missing date", body = ErrorResponse),
        (status = 500, description = "Chart rendering failed", body = ErrorResponse),
        (status = 503, description = "Model unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_chart_png(
    Query(query): Query<ChartQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let report = report_for_query(&state, &query).await?;
    Ok(([(header::CONTENT_TYPE, PNG_MIME_TYPE)], report.png))
}
