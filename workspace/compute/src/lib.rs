pub mod dates;
pub mod error;
pub mod forecast;
pub mod model;
pub mod render;
pub mod report;
pub mod sarimax;
pub mod window;

use std::path::Path;

use forecast::SarimaxForecaster;
use render::{ChartOptions, ReportRenderer};

/// Forecast horizon used when none is configured: six years of monthly periods.
pub const DEFAULT_HORIZON: usize = 6 * 12;

/// Returns the pre-configured provider and renderer pair used by the service.
///
/// The model is loaded exactly once here; any failure is reported as
/// `ComputeError::ModelUnavailable` and is meant to stop startup.
pub fn default_compute(
    model_path: &Path,
    chart: &ChartOptions,
) -> error::Result<(SarimaxForecaster, ReportRenderer)> {
    let provider = SarimaxForecaster::from_path(model_path)?;
    let renderer = ReportRenderer::new(chart);
    Ok((provider, renderer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast::ForecastProvider;
    use std::io::Write;

    const SEASONAL_NAIVE: &str = r#"{
        "name": "seasonal-naive",
        "order": {"p": 0, "d": 0, "q": 0},
        "seasonal_order": {"p": 0, "d": 1, "q": 0, "s": 12},
        "frequency": "month_start",
        "last_timestamp": "2023-12-01",
        "history": [31.2, 29.8, 27.4, 24.1, 21.0, 18.7, 17.9, 18.4, 21.3, 25.6, 29.9, 32.5]
    }"#;

    /// End to end through the default compute: first forecast year as 12 bars.
    #[test]
    fn test_default_compute_first_year() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEASONAL_NAIVE.as_bytes()).unwrap();
        let chart = ChartOptions {
            width: 300,
            height: 200,
            font_path: None,
        };

        let (provider, renderer) = default_compute(file.path(), &chart).unwrap();
        let sequence = provider.forecast(DEFAULT_HORIZON).unwrap();
        assert_eq!(sequence.len(), 72);

        let report = renderer.render(&sequence, "2024-01-01", "2024-12-01").unwrap();
        assert_eq!(report.chart.bars.len(), 12);
        assert_eq!(report.chart.bars[0].label, "31.20");
        assert_eq!(report.chart.bars[11].label, "32.50");
    }

    #[test]
    fn test_default_compute_missing_model() {
        let err = default_compute(Path::new("/nonexistent/model.json"), &ChartOptions::default()).unwrap_err();
        assert!(matches!(err, error::ComputeError::ModelUnavailable(_)));
    }
}
