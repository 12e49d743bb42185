use anyhow::{Context, Result};
use compute::forecast::ForecastProvider;
use std::path::Path;
use tracing::{info, warn};

use crate::config::Settings;

/// Renders the chart for `[start_date, end_date]` and writes the PNG to `output`.
pub async fn render(settings: &Settings, start_date: &str, end_date: &str, output: &Path) -> Result<()> {
    let (provider, renderer) = compute::default_compute(
        Path::new(&settings.model.path),
        &settings.chart.options(),
    )?;

    let sequence = provider.forecast(settings.forecast.horizon)?;
    let report = renderer.render(&sequence, start_date, end_date)?;
    if report.is_empty() {
        warn!(
            "No forecast period between {} and {}, writing an empty chart",
            report.range.start, report.range.end
        );
    }

    tokio::fs::write(output, &report.png)
        .await
        .with_context(|| format!("Failed to write chart to {}", output.display()))?;

    info!(
        "Wrote chart with {} bars ({} years) to {}",
        report.chart.bars.len(),
        report.chart.group_count(),
        output.display()
    );
    Ok(())
}
