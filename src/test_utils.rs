#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use compute::forecast::SarimaxForecaster;
    use compute::model::SarimaxModel;
    use compute::render::ReportRenderer;
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Seasonal naive model: every forecast year repeats the 2023 history.
    ///
    /// The first forecast period is 2024-01-01; the horizon of 72 ends 2029-12-01.
    pub const TEST_MODEL_JSON: &str = r#"{
        "name": "test-seasonal-naive",
        "order": {"p": 0, "d": 0, "q": 0},
        "seasonal_order": {"p": 0, "d": 1, "q": 0, "s": 12},
        "frequency": "month_start",
        "last_timestamp": "2023-12-01",
        "history": [
            30.0, 28.5, 26.0, 23.0, 20.5, 18.0, 17.25, 18.0, 21.0, 25.0, 28.75, 31.0,
            31.2, 29.8, 27.4, 24.1, 21.0, 18.7, 17.9, 18.4, 21.3, 25.6, 29.9, 32.5
        ]
    }"#;

    /// Monthly values of the last history year, repeated by every forecast year.
    pub const TEST_SEASON: [f64; 12] = [
        31.2, 29.8, 27.4, 24.1, 21.0, 18.7, 17.9, 18.4, 21.3, 25.6, 29.9, 32.5,
    ];

    pub const TEST_HORIZON: usize = 72;

    /// Create AppState for testing
    pub fn setup_test_app_state() -> AppState {
        let model = SarimaxModel::from_json(TEST_MODEL_JSON).expect("Test model should be valid");
        let forecaster = SarimaxForecaster::new(model).expect("Test model should build a forecaster");

        AppState {
            forecaster: Arc::new(forecaster),
            // No font in tests: bars are drawn, text is skipped.
            renderer: Arc::new(ReportRenderer::without_text(400, 300)),
            horizon: TEST_HORIZON,
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set. The subscriber is installed globally
    /// once; later calls are no-ops.
    pub fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    }

    /// Create axum app for testing
    pub fn setup_test_app() -> Router {
        init_test_tracing();
        create_router(setup_test_app_state())
    }

    #[test]
    fn test_tracing_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        assert!(tracing::dispatcher::has_been_set());
    }
}
