// Chart surface that serves the rendered comparison to a browser
use crate::application::chart_surface::ChartSurface;
use crate::domain::battery::ComparisonResult;
use crate::domain::chart::ChartData;
use crate::infrastructure::svg_renderer::SvgRenderer;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{chart_json, chart_page, chart_svg, health_check};
use anyhow::Context;
use async_trait::async_trait;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct HttpChartSurface {
    addr: SocketAddr,
    renderer: SvgRenderer,
}

impl HttpChartSurface {
    pub fn new(addr: SocketAddr, renderer: SvgRenderer) -> Self {
        Self { addr, renderer }
    }

    /// Render the chart once and build the state shared by all handlers
    pub fn prepare_state(
        &self,
        chart: ChartData,
        comparison: ComparisonResult,
    ) -> anyhow::Result<Arc<AppState>> {
        let svg = self
            .renderer
            .render(&chart)
            .context("Failed to render chart")?;

        Ok(Arc::new(AppState {
            chart,
            comparison,
            svg,
        }))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(chart_page))
        .route("/healthz", get(health_check))
        .route("/chart.svg", get(chart_svg))
        .route("/chart.json", get(chart_json))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[async_trait]
impl ChartSurface for HttpChartSurface {
    async fn display(&self, chart: ChartData, comparison: ComparisonResult) -> anyhow::Result<()> {
        let state = self.prepare_state(chart, comparison)?;

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Battery drain chart available at http://{}/", local_addr);
        tracing::info!("Press Ctrl-C to exit");

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Chart surface closed");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
}
