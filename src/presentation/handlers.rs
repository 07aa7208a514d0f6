// HTTP request handlers
use crate::domain::battery::RunResult;
use crate::infrastructure::http_response::{
    accepts_brotli, encoded_response, json_response, CONTENT_TYPE_HTML, CONTENT_TYPE_SVG,
};
use crate::presentation::app_state::AppState;
use axum::{extract::State, http::HeaderMap, response::IntoResponse};
use std::fmt::Write;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Chart page with the embedded SVG and a summary table
pub async fn chart_page(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let page = render_page(&state);
    match encoded_response(page.into_bytes(), CONTENT_TYPE_HTML, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Raw SVG chart
pub async fn chart_svg(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match encoded_response(
        state.svg.clone().into_bytes(),
        CONTENT_TYPE_SVG,
        accepts_brotli(&headers),
    )
    .await
    {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Chart model and comparison as JSON
pub async fn chart_json(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match json_response(&*state, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub fn render_page(state: &AppState) -> String {
    let mut html = String::new();
    let title = escape_html(&state.chart.title);

    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        title
    );
    let _ = writeln!(html, "<div class=\"chart\">{}</div>", state.svg);
    html.push_str("<table>\n<tr><th>Run</th><th>Start (%)</th><th>End (%)</th><th>Drop (%)</th><th>Drain rate (%/h)</th></tr>\n");

    for run in [&state.comparison.scheduler, &state.comparison.non_scheduler] {
        summary_row(&mut html, run);
    }
    html.push_str("</table>\n");

    match state.comparison.battery_saved_percent {
        Some(saved) => {
            let _ = writeln!(html, "<p class=\"saved\">Battery Saved: {:.2}%</p>", saved);
        }
        None => html.push_str("<p class=\"saved\">Battery Saved: n/a</p>\n"),
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn summary_row(html: &mut String, run: &RunResult) {
    let rate = run
        .drain_rate_per_hour
        .map(|r| format!("{:.2}", r))
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        html,
        "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
        escape_html(&run.label),
        run.start_percent,
        run.end_percent,
        run.drop,
        rate
    );
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::battery::{ComparisonResult, TimeMode};
    use crate::domain::chart::ChartData;

    fn run(label: &str, drop: f64, rate: Option<f64>) -> RunResult {
        RunResult {
            label: label.to_string(),
            drop,
            start_percent: 100.0,
            end_percent: 100.0 - drop,
            duration: 0,
            drain_rate_per_hour: rate,
            charging_samples: 0,
        }
    }

    fn state(non_scheduler_drop: f64) -> AppState {
        AppState {
            chart: ChartData::new(
                "Battery Drain Comparison".to_string(),
                "Time".to_string(),
                "Battery (%)".to_string(),
                TimeMode::Absolute,
                Vec::new(),
            ),
            comparison: ComparisonResult::new(
                run("Scheduler Mode", 5.0, Some(2.5)),
                run("Non-Scheduler Mode", non_scheduler_drop, None),
            ),
            svg: "<svg id=\"chart\"></svg>".to_string(),
        }
    }

    #[test]
    fn test_render_page() {
        let html = render_page(&state(10.0));
        assert!(html.contains("<title>Battery Drain Comparison</title>"));
        assert!(html.contains("<svg id=\"chart\"></svg>"));
        assert!(html.contains("<td>Scheduler Mode</td><td>100.00</td><td>95.00</td><td>5.00</td><td>2.50</td>"));
        assert!(html.contains("<td>Non-Scheduler Mode</td>"));
        assert!(html.contains("Battery Saved: 50.00%"));
    }

    #[test]
    fn test_render_page_without_savings() {
        let html = render_page(&state(0.0));
        assert!(html.contains("Battery Saved: n/a"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a <b> & \"c\""), "a &lt;b&gt; &amp; &quot;c&quot;");
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }
}
