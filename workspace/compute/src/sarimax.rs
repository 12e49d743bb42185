//! Point forecasts for fitted seasonal ARIMA models.
//!
//! Polynomials are lag polynomials stored as coefficient vectors where index
//! `k` holds the coefficient of `B^k`.

use tracing::{debug, trace};

use crate::model::SarimaxModel;

/// Multiplies two lag polynomials.
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Builds `1 + sign * (c_1 B^step + c_2 B^{2 step} + ...)`.
fn lag_polynomial(coefficients: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = sign * c;
    }
    poly
}

/// `(1 - B)^d (1 - B^s)^D`
pub fn differencing_polynomial(d: usize, seasonal_d: usize, s: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = poly_mul(&poly, &[1.0, -1.0]);
    }
    if seasonal_d > 0 {
        let seasonal = lag_polynomial(&[1.0], s, -1.0);
        for _ in 0..seasonal_d {
            poly = poly_mul(&poly, &seasonal);
        }
    }
    poly
}

/// Expanded `phi(B) Phi(B^s)`, statsmodels sign convention (`1 - phi_1 B - ...`).
pub fn ar_polynomial(model: &SarimaxModel) -> Vec<f64> {
    poly_mul(
        &lag_polynomial(&model.ar, 1, -1.0),
        &lag_polynomial(&model.seasonal_ar, model.seasonal_order.s.max(1), -1.0),
    )
}

/// Expanded `theta(B) Theta(B^s)` (`1 + theta_1 B + ...`).
pub fn ma_polynomial(model: &SarimaxModel) -> Vec<f64> {
    poly_mul(
        &lag_polynomial(&model.ma, 1, 1.0),
        &lag_polynomial(&model.seasonal_ma, model.seasonal_order.s.max(1), 1.0),
    )
}

/// Forecasts `horizon` values following the end of the model history.
///
/// The differenced series is extended by the ARMA recursion with future
/// innovations set to zero, then integrated back onto the original scale.
/// The model is expected to have passed [`SarimaxModel::validate`].
pub fn forecast_mean(model: &SarimaxModel, horizon: usize) -> Vec<f64> {
    let delta = differencing_polynomial(
        model.order.d,
        model.seasonal_order.d,
        model.seasonal_order.s,
    );
    let ar = ar_polynomial(model);
    let ma = ma_polynomial(model);
    let diff_degree = delta.len() - 1;

    debug!(
        "Forecasting {} periods: differencing degree {}, AR degree {}, MA degree {}",
        horizon,
        diff_degree,
        ar.len() - 1,
        ma.len() - 1
    );

    // Differenced history, one value per observation from index `diff_degree` on.
    let history = &model.history;
    let mut w: Vec<f64> = (diff_degree..history.len())
        .map(|t| {
            delta
                .iter()
                .enumerate()
                .map(|(k, c)| c * history[t - k])
                .sum::<f64>()
        })
        .collect();
    let observed = w.len();

    // Innovations aligned with `w`; anything the artifact does not carry is zero.
    let mut innovations = vec![0.0; observed];
    let carried = model.residuals.len().min(observed);
    innovations[observed - carried..]
        .copy_from_slice(&model.residuals[model.residuals.len() - carried..]);

    for h in 0..horizon {
        let t = observed + h;
        let mut value = model.intercept;
        for (k, coefficient) in ar.iter().enumerate().skip(1) {
            if k <= t {
                value -= coefficient * w[t - k];
            }
        }
        for (k, coefficient) in ma.iter().enumerate().skip(1) {
            if k <= t {
                value += coefficient * innovations[t - k];
            }
        }
        trace!("Differenced forecast step {}: {}", h + 1, value);
        w.push(value);
        innovations.push(0.0);
    }

    // Integrate: y[t] = w[t] - sum_{k>=1} delta_k y[t-k]
    let mut levels = history.clone();
    let mut forecast = Vec::with_capacity(horizon);
    for h in 0..horizon {
        let t = levels.len();
        let mut value = w[observed + h];
        for (k, coefficient) in delta.iter().enumerate().skip(1) {
            value -= coefficient * levels[t - k];
        }
        levels.push(value);
        forecast.push(value);
    }

    forecast
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frequency, Order, SeasonalOrder};
    use chrono::NaiveDate;

    fn model(order: Order, seasonal_order: SeasonalOrder, history: Vec<f64>) -> SarimaxModel {
        SarimaxModel {
            name: "test".to_string(),
            order,
            seasonal_order,
            ar: vec![],
            ma: vec![],
            seasonal_ar: vec![],
            seasonal_ma: vec![],
            intercept: 0.0,
            frequency: Frequency::MonthStart,
            last_timestamp: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            history,
            residuals: vec![],
        }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_poly_mul() {
        assert_eq!(poly_mul(&[1.0, -1.0], &[1.0, -1.0]), vec![1.0, -2.0, 1.0]);
        assert!(poly_mul(&[], &[1.0]).is_empty());
    }

    #[test]
    fn test_differencing_polynomial() {
        assert_eq!(differencing_polynomial(0, 0, 12), vec![1.0]);
        assert_eq!(differencing_polynomial(2, 0, 12), vec![1.0, -2.0, 1.0]);
        let seasonal = differencing_polynomial(1, 1, 4);
        // (1 - B)(1 - B^4) = 1 - B - B^4 + B^5
        assert_eq!(seasonal, vec![1.0, -1.0, 0.0, 0.0, -1.0, 1.0]);
    }

    #[test]
    fn test_constant_model() {
        let mut m = model(Order::default(), SeasonalOrder::default(), vec![3.0, 4.0]);
        m.intercept = 5.0;
        assert_close(&forecast_mean(&m, 3), &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_random_walk_repeats_last_value() {
        let m = model(Order { p: 0, d: 1, q: 0 }, SeasonalOrder::default(), vec![1.0, 4.0, 2.5]);
        assert_close(&forecast_mean(&m, 4), &[2.5, 2.5, 2.5, 2.5]);
    }

    #[test]
    fn test_random_walk_with_drift() {
        let mut m = model(Order { p: 0, d: 1, q: 0 }, SeasonalOrder::default(), vec![1.0, 2.0]);
        m.intercept = 0.5;
        assert_close(&forecast_mean(&m, 3), &[2.5, 3.0, 3.5]);
    }

    #[test]
    fn test_seasonal_naive_repeats_last_cycle() {
        let history = vec![1.0, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0];
        let m = model(
            Order::default(),
            SeasonalOrder { p: 0, d: 1, q: 0, s: 4 },
            history,
        );
        assert_close(
            &forecast_mean(&m, 6),
            &[10.0, 20.0, 30.0, 40.0, 10.0, 20.0],
        );
    }

    #[test]
    fn test_ar1_decays_geometrically() {
        let mut m = model(Order { p: 1, d: 0, q: 0 }, SeasonalOrder::default(), vec![8.0]);
        m.ar = vec![0.5];
        assert_close(&forecast_mean(&m, 3), &[4.0, 2.0, 1.0]);
    }

    #[test]
    fn test_ma1_uses_last_residual_once() {
        let mut m = model(Order { p: 0, d: 0, q: 1 }, SeasonalOrder::default(), vec![0.0, 0.0]);
        m.ma = vec![0.5];
        m.intercept = 1.0;
        m.residuals = vec![2.0];
        assert_close(&forecast_mean(&m, 3), &[2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_seasonal_ar_on_differenced_series() {
        // (1 - 0.5 B^2)(1 - B) y = e, history 0,1,3,6 -> w = 1,2,3
        let mut m = model(
            Order { p: 0, d: 1, q: 0 },
            SeasonalOrder { p: 1, d: 0, q: 0, s: 2 },
            vec![0.0, 1.0, 3.0, 6.0],
        );
        m.seasonal_ar = vec![0.5];
        // w4 = 0.5*w2 = 1.0, w5 = 0.5*w3 = 1.5, w6 = 0.5*w4 = 0.5
        assert_close(&forecast_mean(&m, 3), &[7.0, 8.5, 9.0]);
    }
}
