//! Server-rendered HTML page with the date range form.

/// What the page shows below the form.
#[derive(Debug, Clone, Default)]
pub struct PageContent<'a> {
    pub start_date: &'a str,
    pub end_date: &'a str,
    /// Base64 encoded PNG chart.
    pub chart_base64: Option<&'a str>,
    /// Message shown when the chart could not be produced.
    pub error: Option<&'a str>,
    /// Set when the range matched no forecast period.
    pub empty_window: bool,
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_index(content: &PageContent<'_>) -> String {
    let mut body = String::new();

    if let Some(error) = content.error {
        body.push_str(&format!(
            "<p class=\"error\" role=\"alert\">{}</p>\n",
            escape_html(error)
        ));
    }

    if let Some(chart) = content.chart_base64 {
        if content.empty_window {
            body.push_str("<p class=\"notice\">No forecast periods fall within the selected range.</p>\n");
        }
        body.push_str(&format!(
            "<div class=\"chart\"><img src=\"data:image/png;base64,{}\" alt=\"Forecasted Emissions\"></div>\n",
            chart
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Emission Forecast</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        form {{ margin-bottom: 30px; }}
        label {{ margin-right: 10px; }}
        .error {{ color: #b00020; font-weight: bold; }}
        .notice {{ color: #555; }}
        .chart img {{ max-width: 100%; }}
    </style>
</head>
<body>
    <h1>Emission Forecast</h1>
    <form method="post" action="/">
        <label for="start_date">Start date</label>
        <input type="date" id="start_date" name="start_date" value="{}" placeholder="YYYY-MM-DD">
        <label for="end_date">End date</label>
        <input type="date" id="end_date" name="end_date" value="{}" placeholder="YYYY-MM-DD">
        <button type="submit">Show forecast</button>
    </form>
{}</body>
</html>
"#,
        escape_html(content.start_date),
        escape_html(content.end_date),
        body
    )
}
