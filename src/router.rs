use crate::handlers::{
    chart::{get_chart, get_chart_png},
    forecast::{get_forecast, get_model},
    health::health_check,
    index::{index_page, submit_chart},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{routing::get, Router};
use axum_prometheus::PrometheusMetricLayer;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML form
        .route("/", get(index_page).post(submit_chart))
        // Health check
        .route("/health", get(health_check))
        // Chart routes
        .route("/api/v1/chart", get(get_chart))
        .route("/api/v1/chart.png", get(get_chart_png))
        // Forecast routes
        .route("/api/v1/forecast", get(get_forecast))
        .route("/api/v1/model", get(get_model))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Expose Prometheus metrics on `/metrics` and record every request.
///
/// Installs the global metrics recorder, so call it at most once per process.
pub fn with_metrics(router: Router) -> Router {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    router
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer)
}
