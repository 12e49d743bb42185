use anyhow::Result;
use common::ForecastResponse;
use compute::forecast::{ForecastProvider, SarimaxForecaster};
use std::path::Path;
use tracing::debug;

use crate::config::Settings;
use crate::helpers::converters::points_to_dtos;

/// Prints the full forecast horizon as JSON on stdout.
pub fn forecast(settings: &Settings) -> Result<()> {
    let provider = SarimaxForecaster::from_path(Path::new(&settings.model.path))?;
    let sequence = provider.forecast(settings.forecast.horizon)?;
    debug!("Forecast produced {} points", sequence.len());

    let response = ForecastResponse {
        horizon: settings.forecast.horizon,
        range: None,
        points: points_to_dtos(&sequence.points),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
