//! Serialized fitted SARIMAX model.
//!
//! The modelling toolchain exports the fitted state of a seasonal ARIMA model
//! as JSON. Loading validates the artifact once so that forecasting never has
//! to deal with a structurally broken model.

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error, info, instrument};

use crate::error::{ComputeError, Result};

/// Non-seasonal `(p, d, q)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

/// Seasonal `(P, D, Q, s)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub s: usize,
}

impl SeasonalOrder {
    pub fn is_seasonal(&self) -> bool {
        self.p > 0 || self.d > 0 || self.q > 0
    }
}

/// Spacing between consecutive observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    MonthStart,
    MonthEnd,
    Weekly,
    Daily,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::MonthStart => "month_start",
            Frequency::MonthEnd => "month_end",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
        }
    }

    /// Returns the timestamp `steps` periods after `origin`.
    pub fn advance(&self, origin: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Frequency::MonthStart => origin
                .with_day(1)?
                .checked_add_months(Months::new(steps)),
            Frequency::MonthEnd => origin
                .with_day(1)?
                .checked_add_months(Months::new(steps + 1))?
                .pred_opt(),
            Frequency::Weekly => origin.checked_add_signed(TimeDelta::weeks(steps as i64)),
            Frequency::Daily => origin.checked_add_signed(TimeDelta::days(steps as i64)),
        }
    }
}

/// Fitted seasonal ARIMA state needed to produce point forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarimaxModel {
    pub name: String,
    pub order: Order,
    #[serde(default)]
    pub seasonal_order: SeasonalOrder,
    #[serde(default)]
    pub ar: Vec<f64>,
    #[serde(default)]
    pub ma: Vec<f64>,
    #[serde(default)]
    pub seasonal_ar: Vec<f64>,
    #[serde(default)]
    pub seasonal_ma: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub frequency: Frequency,
    pub last_timestamp: NaiveDate,
    pub history: Vec<f64>,
    #[serde(default)]
    pub residuals: Vec<f64>,
}

impl SarimaxModel {
    /// Loads and validates a model artifact from disk.
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading forecasting model from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read model file {}: {}", path.display(), e);
            ComputeError::ModelUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let model = Self::from_json(&json)?;
        info!(
            "Loaded model '{}' trained until {}",
            model.name, model.last_timestamp
        );
        Ok(model)
    }

    /// Parses and validates a model artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: SarimaxModel = serde_json::from_str(json).map_err(|e| {
            error!("Failed to parse model artifact: {}", e);
            ComputeError::ModelUnavailable(format!("invalid model artifact: {}", e))
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Checks the structural invariants the forecast recursion relies on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| {
            error!("Model '{}' rejected: {}", self.name, reason);
            Err(ComputeError::ModelUnavailable(reason))
        };

        if self.ar.len() != self.order.p {
            return invalid(format!("expected {} AR coefficients, found {}", self.order.p, self.ar.len()));
        }
        if self.ma.len() != self.order.q {
            return invalid(format!("expected {} MA coefficients, found {}", self.order.q, self.ma.len()));
        }
        if self.seasonal_ar.len() != self.seasonal_order.p {
            return invalid(format!(
                "expected {} seasonal AR coefficients, found {}",
                self.seasonal_order.p,
                self.seasonal_ar.len()
            ));
        }
        if self.seasonal_ma.len() != self.seasonal_order.q {
            return invalid(format!(
                "expected {} seasonal MA coefficients, found {}",
                self.seasonal_order.q,
                self.seasonal_ma.len()
            ));
        }
        if self.seasonal_order.is_seasonal() && self.seasonal_order.s < 2 {
            return invalid(format!("seasonal period must be at least 2, found {}", self.seasonal_order.s));
        }

        let all_finite = self
            .ar
            .iter()
            .chain(&self.ma)
            .chain(&self.seasonal_ar)
            .chain(&self.seasonal_ma)
            .chain(&self.history)
            .chain(&self.residuals)
            .all(|v| v.is_finite());
        if !all_finite || !self.intercept.is_finite() {
            return invalid("model contains non-finite values".to_string());
        }

        let required = self.required_history();
        if self.history.len() < required.max(1) {
            return invalid(format!(
                "history holds {} observations, at least {} required",
                self.history.len(),
                required.max(1)
            ));
        }

        debug!(
            "Model '{}' valid: order={:?} seasonal_order={:?} history={}",
            self.name,
            self.order,
            self.seasonal_order,
            self.history.len()
        );
        Ok(())
    }

    /// Degree of the differencing polynomial `(1 - B)^d (1 - B^s)^D`.
    pub fn differencing_degree(&self) -> usize {
        self.order.d + self.seasonal_order.d * self.seasonal_order.s
    }

    /// Highest lag of the expanded AR polynomial.
    pub fn ar_degree(&self) -> usize {
        self.order.p + self.seasonal_order.p * self.seasonal_order.s
    }

    /// Highest lag of the expanded MA polynomial.
    pub fn ma_degree(&self) -> usize {
        self.order.q + self.seasonal_order.q * self.seasonal_order.s
    }

    /// Minimum number of observations needed to seed the recursion.
    pub fn required_history(&self) -> usize {
        self.differencing_degree() + self.ar_degree()
    }

    /// Timestamp of the first forecasted period.
    pub fn first_forecast_timestamp(&self) -> Option<NaiveDate> {
        self.frequency.advance(self.last_timestamp, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const AIRLINE_JSON: &str = r#"{
        "name": "airline",
        "order": {"p": 0, "d": 1, "q": 1},
        "seasonal_order": {"p": 0, "d": 1, "q": 1, "s": 12},
        "ma": [-0.4],
        "seasonal_ma": [-0.6],
        "last_timestamp": "2023-12-01",
        "history": [1,2,3,4,5,6,7,8,9,10,11,12,13,14],
        "residuals": [0.1, -0.2]
    }"#;

    #[test]
    fn test_from_json_applies_defaults() {
        let model = SarimaxModel::from_json(AIRLINE_JSON).unwrap();
        assert_eq!(model.frequency, Frequency::MonthStart);
        assert_eq!(model.intercept, 0.0);
        assert!(model.ar.is_empty());
        assert_eq!(model.differencing_degree(), 13);
        assert_eq!(model.ma_degree(), 13);
        assert_eq!(model.required_history(), 13);
    }

    #[test]
    fn test_rejects_coefficient_mismatch() {
        let json = AIRLINE_JSON.replace("\"ma\": [-0.4]", "\"ma\": [-0.4, 0.1]");
        let err = SarimaxModel::from_json(&json).unwrap_err();
        assert!(matches!(err, ComputeError::ModelUnavailable(_)));
    }

    #[test]
    fn test_rejects_short_history() {
        let json = AIRLINE_JSON.replace("[1,2,3,4,5,6,7,8,9,10,11,12,13,14]", "[1,2,3]");
        let err = SarimaxModel::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("at least 13 required"));
    }

    #[test]
    fn test_rejects_degenerate_season() {
        let json = AIRLINE_JSON.replace("\"s\": 12", "\"s\": 1");
        assert!(SarimaxModel::from_json(&json).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let err = SarimaxModel::from_json("\u{80}pickle").unwrap_err();
        assert_eq!(err.code(), "MODEL_UNAVAILABLE");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(AIRLINE_JSON.as_bytes()).unwrap();
        let model = SarimaxModel::from_path(file.path()).unwrap();
        assert_eq!(model.name, "airline");
    }

    #[test]
    fn test_from_missing_path() {
        let err = SarimaxModel::from_path(Path::new("/nonexistent/sarimax_model.json")).unwrap_err();
        assert!(matches!(err, ComputeError::ModelUnavailable(_)));
    }

    #[test]
    fn test_month_start_advance() {
        let f = Frequency::MonthStart;
        assert_eq!(f.advance(date(2023, 12, 1), 1), Some(date(2024, 1, 1)));
        assert_eq!(f.advance(date(2023, 12, 1), 14), Some(date(2025, 2, 1)));
    }

    #[test]
    fn test_month_end_advance() {
        let f = Frequency::MonthEnd;
        assert_eq!(f.advance(date(2023, 12, 31), 1), Some(date(2024, 1, 31)));
        assert_eq!(f.advance(date(2023, 12, 31), 2), Some(date(2024, 2, 29)));
        assert_eq!(f.advance(date(2024, 1, 31), 3), Some(date(2024, 4, 30)));
    }

    #[test]
    fn test_daily_and_weekly_advance() {
        assert_eq!(Frequency::Daily.advance(date(2024, 2, 28), 2), Some(date(2024, 3, 1)));
        assert_eq!(Frequency::Weekly.advance(date(2024, 1, 1), 2), Some(date(2024, 1, 15)));
    }
}
