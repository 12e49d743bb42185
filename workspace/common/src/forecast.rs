use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DateRange {
    /// First day included (YYYY-MM-DD)
    pub start: NaiveDate,
    /// Last day included (YYYY-MM-DD)
    pub end: NaiveDate,
}

/// One forecasted period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastPointDto {
    pub date: NaiveDate,
    pub predicted_mean: f64,
}

/// Forecast points, optionally restricted to a range.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastResponse {
    /// Number of periods forecast before filtering
    pub horizon: usize,
    /// Range applied, absent when the whole horizon is returned
    pub range: Option<DateRange>,
    pub points: Vec<ForecastPointDto>,
}

/// Description of the loaded forecasting model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ModelSummaryDto {
    pub name: String,
    /// Non-seasonal order (p, d, q)
    pub order: Vec<usize>,
    /// Seasonal order (P, D, Q, s)
    pub seasonal_order: Vec<usize>,
    /// Observation frequency, e.g. `month_start`
    pub frequency: String,
    /// Last training observation (YYYY-MM-DD)
    pub last_timestamp: NaiveDate,
    /// Number of training observations carried by the model
    pub observations: usize,
    /// Horizon used by the service
    pub horizon: usize,
}
