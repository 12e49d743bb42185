use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::forecast::DateRange;

/// A single bar of the forecast chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ChartBar {
    /// Forecasted period (YYYY-MM-DD)
    pub date: chrono::NaiveDate,
    /// Calendar month (1-12), the x axis category
    pub month: u32,
    /// Calendar year, the colour group
    pub year: i32,
    /// Predicted mean
    pub value: f64,
    /// Value printed above the bar, two decimals
    pub label: String,
    /// Bar colour as `#rrggbb`
    pub color: String,
}

/// Legend entry, one per year present in the window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LegendItem {
    pub year: i32,
    pub color: String,
}

/// Rendered chart returned by the chart endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ChartResponse {
    /// Requested range after parsing
    pub range: DateRange,
    /// PNG image, base64 encoded
    pub image_base64: String,
    /// MIME type of the encoded image
    pub mime_type: String,
    /// Bars drawn on the chart, in date order
    pub bars: Vec<ChartBar>,
    /// Year groups in legend order
    pub legend: Vec<LegendItem>,
    /// True when no forecast period fell inside the range
    pub empty_window: bool,
}

impl ChartResponse {
    /// `data:` URI suitable for an `<img src>` attribute.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.image_base64)
    }
}
