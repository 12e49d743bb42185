use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, error, instrument};

use crate::error::{ComputeError, Result};
use crate::model::{Frequency, SarimaxModel};
use crate::sarimax::forecast_mean;

/// One predicted period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_mean: f64,
}

/// Ordered, gap-free forecast starting right after the training horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSequence {
    pub frequency: Frequency,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSequence {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Descriptive information about the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    pub order: (usize, usize, usize),
    pub seasonal_order: (usize, usize, usize, usize),
    pub frequency: Frequency,
    pub last_timestamp: NaiveDate,
    pub observations: usize,
}

/// Source of forecasts for the request path.
///
/// Implementations hold only immutable fitted state, so a single instance can
/// be shared by every request.
pub trait ForecastProvider: Send + Sync + Debug {
    /// Produces exactly `horizon` points following the training horizon.
    fn forecast(&self, horizon: usize) -> Result<ForecastSequence>;

    /// Describes the underlying model.
    fn summary(&self) -> ModelSummary;
}

/// Forecast provider backed by a fitted SARIMAX model.
#[derive(Debug, Clone)]
pub struct SarimaxForecaster {
    model: SarimaxModel,
}

impl SarimaxForecaster {
    pub fn new(model: SarimaxModel) -> Result<Self> {
        model.validate()?;
        Ok(Self { model })
    }

    /// Loads the model artifact once; failures surface as `ModelUnavailable`.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self {
            model: SarimaxModel::from_path(path)?,
        })
    }

    pub fn model(&self) -> &SarimaxModel {
        &self.model
    }
}

impl ForecastProvider for SarimaxForecaster {
    #[instrument(skip(self), fields(model = %self.model.name))]
    fn forecast(&self, horizon: usize) -> Result<ForecastSequence> {
        if horizon == 0 {
            return Err(ComputeError::InvalidHorizon(horizon));
        }

        let values = forecast_mean(&self.model, horizon);
        if let Some(step) = values.iter().position(|v| !v.is_finite()) {
            error!("Model produced a non-finite value at step {}", step + 1);
            return Err(ComputeError::ModelUnavailable(format!(
                "forecast diverged at step {}",
                step + 1
            )));
        }

        let points = values
            .into_iter()
            .enumerate()
            .map(|(i, predicted_mean)| {
                self.model
                    .frequency
                    .advance(self.model.last_timestamp, i as u32 + 1)
                    .map(|date| ForecastPoint { date, predicted_mean })
                    .ok_or_else(|| {
                        ComputeError::ModelUnavailable(format!(
                            "forecast step {} is outside the supported calendar",
                            i + 1
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Forecast of {} periods from {:?} to {:?}",
            points.len(),
            points.first().map(|p| p.date),
            points.last().map(|p| p.date)
        );

        Ok(ForecastSequence {
            frequency: self.model.frequency,
            points,
        })
    }

    fn summary(&self) -> ModelSummary {
        let m = &self.model;
        ModelSummary {
            name: m.name.clone(),
            order: (m.order.p, m.order.d, m.order.q),
            seasonal_order: (
                m.seasonal_order.p,
                m.seasonal_order.d,
                m.seasonal_order.q,
                m.seasonal_order.s,
            ),
            frequency: m.frequency,
            last_timestamp: m.last_timestamp,
            observations: m.history.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, SeasonalOrder};

    fn seasonal_naive() -> SarimaxForecaster {
        SarimaxForecaster::new(SarimaxModel {
            name: "seasonal-naive".to_string(),
            order: Order::default(),
            seasonal_order: SeasonalOrder { p: 0, d: 1, q: 0, s: 12 },
            ar: vec![],
            ma: vec![],
            seasonal_ar: vec![],
            seasonal_ma: vec![],
            intercept: 0.0,
            frequency: Frequency::MonthStart,
            last_timestamp: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            history: (1..=12).map(|m| 20.0 + m as f64).collect(),
            residuals: vec![],
        })
        .unwrap()
    }

    #[test]
    fn test_forecast_has_requested_length() {
        let provider = seasonal_naive();
        for horizon in [1, 12, 72] {
            assert_eq!(provider.forecast(horizon).unwrap().len(), horizon);
        }
    }

    #[test]
    fn test_forecast_is_gap_free_and_increasing() {
        let provider = seasonal_naive();
        let sequence = provider.forecast(72).unwrap();

        assert_eq!(sequence.first_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(sequence.last_date(), NaiveDate::from_ymd_opt(2029, 12, 1));
        for (i, pair) in sequence.points.windows(2).enumerate() {
            assert!(pair[0].date < pair[1].date);
            assert_eq!(
                Frequency::MonthStart.advance(pair[0].date, 1),
                Some(pair[1].date),
                "gap after step {}",
                i
            );
        }
    }

    #[test]
    fn test_forecast_does_not_depend_on_previous_calls() {
        let provider = seasonal_naive();
        let long = provider.forecast(24).unwrap();
        let short = provider.forecast(12).unwrap();
        assert_eq!(&long.points[..12], &short.points[..]);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = seasonal_naive().forecast(0).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidHorizon(0)));
    }

    #[test]
    fn test_diverging_model_reported_unavailable() {
        let mut model = seasonal_naive().model().clone();
        model.history = vec![f64::MAX; 12];
        model.intercept = f64::MAX;
        let provider = SarimaxForecaster { model };
        let err = provider.forecast(3).unwrap_err();
        assert!(matches!(err, ComputeError::ModelUnavailable(_)));
    }

    #[test]
    fn test_summary() {
        let summary = seasonal_naive().summary();
        assert_eq!(summary.name, "seasonal-naive");
        assert_eq!(summary.seasonal_order, (0, 1, 0, 12));
        assert_eq!(summary.observations, 12);
    }
}
