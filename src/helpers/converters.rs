use common::{ChartBar, ChartResponse, DateRange, ForecastPointDto, LegendItem, ModelSummaryDto};
use compute::dates;
use compute::forecast::{ForecastPoint, ModelSummary};
use compute::render::RenderedReport;

pub const PNG_MIME_TYPE: &str = "image/png";

pub fn date_range_to_dto(range: &dates::DateRange) -> DateRange {
    DateRange {
        start: range.start,
        end: range.end,
    }
}

pub fn points_to_dtos(points: &[ForecastPoint]) -> Vec<ForecastPointDto> {
    points
        .iter()
        .map(|point| ForecastPointDto {
            date: point.date,
            predicted_mean: point.predicted_mean,
        })
        .collect()
}

/// Convert a rendered report into the JSON payload, embedding the PNG as base64.
pub fn report_to_chart_response(report: &RenderedReport) -> ChartResponse {
    let bars = report
        .chart
        .bars
        .iter()
        .map(|bar| ChartBar {
            date: bar.date,
            month: bar.month,
            year: bar.year,
            value: bar.value,
            label: bar.label.clone(),
            color: bar.color.hex(),
        })
        .collect();

    let legend = report
        .chart
        .legend
        .iter()
        .map(|entry| LegendItem {
            year: entry.year,
            color: entry.color.hex(),
        })
        .collect();

    ChartResponse {
        range: date_range_to_dto(&report.range),
        image_base64: report.to_base64(),
        mime_type: PNG_MIME_TYPE.to_string(),
        bars,
        legend,
        empty_window: report.is_empty(),
    }
}

pub fn summary_to_dto(summary: &ModelSummary, horizon: usize) -> ModelSummaryDto {
    let (p, d, q) = summary.order;
    let (sp, sd, sq, s) = summary.seasonal_order;
    ModelSummaryDto {
        name: summary.name.clone(),
        order: vec![p, d, q],
        seasonal_order: vec![sp, sd, sq, s],
        frequency: summary.frequency.as_str().to_string(),
        last_timestamp: summary.last_timestamp,
        observations: summary.observations,
        horizon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use compute::model::Frequency;

    #[test]
    fn test_summary_to_dto_flattens_orders() {
        let summary = ModelSummary {
            name: "airline".to_string(),
            order: (0, 1, 1),
            seasonal_order: (0, 1, 1, 12),
            frequency: Frequency::MonthStart,
            last_timestamp: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            observations: 48,
        };

        let dto = summary_to_dto(&summary, 72);
        assert_eq!(dto.order, vec![0, 1, 1]);
        assert_eq!(dto.seasonal_order, vec![0, 1, 1, 12]);
        assert_eq!(dto.frequency, "month_start");
        assert_eq!(dto.horizon, 72);
    }

    #[test]
    fn test_points_to_dtos_keeps_order() {
        let points = vec![
            ForecastPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                predicted_mean: 1.5,
            },
            ForecastPoint {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                predicted_mean: 2.5,
            },
        ];
        let dtos = points_to_dtos(&points);
        assert_eq!(dtos.len(), 2);
        assert_eq!(dtos[1].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(dtos[1].predicted_mean, 2.5);
    }
}
