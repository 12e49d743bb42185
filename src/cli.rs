use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::config::load_settings;
use commands::{forecast, render, serve};

#[derive(Parser)]
#[command(name = "emission-forecast")]
#[command(about = "Emission forecast service: renders SARIMAX forecasts as bar charts")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    ///
    /// Defaults to an optional `forecast.toml` in the working directory.
    /// Every value can be overridden with FORECAST__<SECTION>__<KEY>
    /// environment variables, e.g. FORECAST__MODEL__PATH.
    #[arg(short, long, global = true, env = "FORECAST_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,

        /// Path of the fitted model artifact (JSON)
        #[arg(short, long, env = "MODEL_PATH")]
        model_path: Option<String>,
    },
    /// Render the forecast chart for a date range into a PNG file
    Render {
        /// First day of the range (e.g. 2024-01-01)
        #[arg(short, long)]
        start_date: String,

        /// Last day of the range, inclusive (e.g. 2024-12-31)
        #[arg(short, long)]
        end_date: String,

        /// Output PNG file
        #[arg(short, long, default_value = "forecast.png")]
        output: PathBuf,

        /// Path of the fitted model artifact (JSON)
        #[arg(short, long, env = "MODEL_PATH")]
        model_path: Option<String>,
    },
    /// Print the forecast points as JSON
    Forecast {
        /// Number of periods to forecast (defaults to the configured horizon)
        #[arg(long)]
        horizon: Option<usize>,

        /// Path of the fitted model artifact (JSON)
        #[arg(short, long, env = "MODEL_PATH")]
        model_path: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut settings = load_settings(self.config.as_deref())?;

        match self.command {
            Commands::Serve { bind_address, model_path } => {
                if let Some(bind_address) = bind_address {
                    settings.server.bind_address = bind_address;
                }
                if let Some(model_path) = model_path {
                    settings.model.path = model_path;
                }
                serve(settings).await?;
            }
            Commands::Render { start_date, end_date, output, model_path } => {
                if let Some(model_path) = model_path {
                    settings.model.path = model_path;
                }
                render(&settings, &start_date, &end_date, &output).await?;
            }
            Commands::Forecast { horizon, model_path } => {
                if let Some(model_path) = model_path {
                    settings.model.path = model_path;
                }
                if let Some(horizon) = horizon {
                    settings.forecast.horizon = horizon;
                }
                forecast(&settings)?;
            }
        }
        Ok(())
    }
}
