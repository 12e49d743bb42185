use anyhow::{Context, Result, bail};
use compute::forecast::{ForecastProvider, SarimaxForecaster};
use compute::render::{ChartOptions, DEFAULT_FONT_PATH, ReportRenderer};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Optional configuration file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "forecast";
const ENV_PREFIX: &str = "FORECAST";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub forecast: ForecastSettings,
    pub chart: ChartSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub path: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: "data/sarimax_model.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Number of periods forecast per request.
    pub horizon: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon: compute::DEFAULT_HORIZON,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    /// TrueType font for chart text. Empty disables text.
    pub font_path: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1000,
            font_path: DEFAULT_FONT_PATH.to_string(),
        }
    }
}

impl ChartSettings {
    pub fn options(&self) -> ChartOptions {
        let font_path = self.font_path.trim();
        ChartOptions {
            width: self.width,
            height: self.height,
            font_path: (!font_path.is_empty()).then(|| PathBuf::from(font_path)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
}

/// Load settings from defaults, an optional config file and `FORECAST__*` env vars.
///
/// An explicitly passed file must exist; the default `forecast.*` file is optional.
pub fn load_settings(path: Option<&str>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    let file = match path {
        Some(path) => File::with_name(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings: Settings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    if settings.forecast.horizon == 0 {
        bail!("forecast.horizon must be at least 1");
    }
    if settings.chart.width == 0 || settings.chart.height == 0 {
        bail!("chart.width and chart.height must be positive");
    }

    debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}

/// Initialize application state: load the model once and prepare the renderer.
pub fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let model_path = Path::new(&settings.model.path);
    info!("Loading forecast model from {}", model_path.display());

    let forecaster = SarimaxForecaster::from_path(model_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;
    let summary = forecaster.summary();
    info!(
        "Model '{}' loaded: {} observations up to {}",
        summary.name, summary.observations, summary.last_timestamp
    );

    let renderer = ReportRenderer::new(&settings.chart.options());

    Ok(AppState {
        forecaster: Arc::new(forecaster),
        renderer: Arc::new(renderer),
        horizon: settings.forecast.horizon,
    })
}
