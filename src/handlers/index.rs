use axum::{extract::State, http::StatusCode, response::Html, Form};
use tracing::{debug, instrument, warn};

use crate::handlers::chart::build_report;
use crate::handlers::date_pair;
use crate::page::{PageContent, render_index};
use crate::schemas::{AppState, ChartForm};

fn page(status: StatusCode, content: PageContent<'_>) -> (StatusCode, Html<String>) {
    (status, Html(render_index(&content)))
}

/// Render the date range form without a chart.
#[instrument]
pub async fn index_page() -> Html<String> {
    Html(render_index(&PageContent::default()))
}

/// Handle the form submission and embed the chart in the page.
///
/// Errors are shown on the page itself with the matching status code.
#[instrument(skip(state))]
pub async fn submit_chart(
    State(state): State<AppState>,
    form: Option<Form<ChartForm>>,
) -> (StatusCode, Html<String>) {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let start_date = form.start_date.as_deref().unwrap_or_default();
    let end_date = form.end_date.as_deref().unwrap_or_default();

    let base = PageContent {
        start_date,
        end_date,
        ..PageContent::default()
    };

    let (start, end) = match date_pair(form.start_date.as_deref(), form.end_date.as_deref()) {
        Ok(Some(pair)) => pair,
        Ok(None) => {
            debug!("Form submitted without dates, rendering no chart");
            return page(StatusCode::OK, base);
        }
        Err(e) => {
            warn!("Incomplete form submission: {}", e);
            let message = "Please provide both a start date and an end date.";
            return page(e.status(), PageContent { error: Some(message), ..base });
        }
    };

    match build_report(&state, start, end).await {
        Ok(report) => {
            let chart = report.to_base64();
            page(
                StatusCode::OK,
                PageContent {
                    chart_base64: Some(&chart),
                    empty_window: report.is_empty(),
                    ..base
                },
            )
        }
        Err(e) => {
            let message = e.to_string();
            warn!("Chart request failed: {}", message);
            page(e.status(), PageContent { error: Some(&message), ..base })
        }
    }
}
