//! Numeric description of the forecast bar chart.
//!
//! Everything the raster shows is decided here so it can be compared and
//! serialized independently of the pixels.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::forecast::ForecastPoint;

pub const CHART_TITLE: &str = "Forecasted Emissions";
pub const X_AXIS_LABEL: &str = "Month";
pub const Y_AXIS_LABEL: &str = "Predicted Mean (µg/m³)";

/// Categorical colours assigned to year groups in order of appearance.
pub const YEAR_PALETTE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// RGB colour of a bar or legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn for_group(group: usize) -> Self {
        let (r, g, b) = YEAR_PALETTE[group % YEAR_PALETTE.len()];
        Rgb(r, g, b)
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// One bar: the mean of the forecasted periods falling in one (year, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub month: u32,
    pub year: i32,
    pub value: f64,
    pub label: String,
    /// Index of the year among the years present, also the dodge position.
    pub group: usize,
    pub color: Rgb,
}

/// Legend entry for one year group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub year: i32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    pub legend: Vec<LegendEntry>,
}

/// Formats a bar value the way it is printed above the bar.
pub fn format_label(value: f64) -> String {
    format!("{:.2}", value)
}

impl BarChart {
    /// Builds the chart for an already filtered window.
    pub fn from_window(window: &[ForecastPoint]) -> Self {
        // One bar per (year, month); sub-monthly periods are averaged.
        let mut months: BTreeMap<(i32, u32), (NaiveDate, f64, usize)> = BTreeMap::new();
        for p in window {
            let entry = months
                .entry((p.date.year(), p.date.month()))
                .or_insert((p.date, 0.0, 0));
            entry.0 = entry.0.min(p.date);
            entry.1 += p.predicted_mean;
            entry.2 += 1;
        }

        let mut years: Vec<i32> = months.keys().map(|(year, _)| *year).collect();
        years.dedup();

        let bars = months
            .into_iter()
            .map(|((year, month), (date, sum, count))| {
                let value = sum / count as f64;
                let group = years.iter().position(|y| *y == year).unwrap_or_default();
                Bar {
                    date,
                    month,
                    year,
                    value,
                    label: format_label(value),
                    group,
                    color: Rgb::for_group(group),
                }
            })
            .collect();

        let legend = years
            .iter()
            .enumerate()
            .map(|(group, year)| LegendEntry {
                year: *year,
                color: Rgb::for_group(group),
            })
            .collect();

        Self {
            title: CHART_TITLE.to_string(),
            x_label: X_AXIS_LABEL.to_string(),
            y_label: Y_AXIS_LABEL.to_string(),
            bars,
            legend,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.legend.iter().map(|l| l.year).collect()
    }

    pub fn group_count(&self) -> usize {
        self.legend.len()
    }

    /// Value range to plot, always including zero and never degenerate.
    pub fn value_bounds(&self) -> (f64, f64) {
        let min = self.bars.iter().map(|b| b.value).fold(0.0_f64, f64::min);
        let max = self.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
        if max - min <= f64::EPSILON {
            return (min, min + 1.0);
        }
        // headroom for the labels
        let pad = (max - min) * 0.1;
        (if min < 0.0 { min - pad } else { min }, max + pad)
    }
}
