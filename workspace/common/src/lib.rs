//! Common transport-layer types shared by the HTTP handlers and the CLI.
//! These structs describe the JSON payloads of the API so that clients can
//! deserialize responses without duplicating shapes.

mod chart;
mod forecast;

pub use chart::{ChartBar, ChartResponse, LegendItem};
pub use forecast::{DateRange, ForecastPointDto, ForecastResponse, ModelSummaryDto};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_response_shape() {
        let response = ApiResponse::ok(
            DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            },
            "done",
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert_eq!(json["data"]["start"], "2024-01-01");
        assert_eq!(json["data"]["end"], "2024-12-01");
    }
}
