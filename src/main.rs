// Main entry point - Dependency wiring for the battery drain comparison
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::analyzer_service::BatteryDrainAnalyzer;
use crate::application::chart_surface::ChartSurface;
use crate::infrastructure::config::load_analyzer_config;
use crate::infrastructure::csv_source::CsvSampleSource;
use crate::infrastructure::http_surface::HttpChartSurface;
use crate::infrastructure::svg_renderer::SvgRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_analyzer_config()?;
    tracing::info!(
        "Comparing {} against {} ({} time)",
        config.inputs.scheduler,
        config.inputs.non_scheduler,
        config.inputs.time_mode
    );

    // Analysis is a synchronous batch over both files
    let analyzer = BatteryDrainAnalyzer::new(Arc::new(CsvSampleSource::new()), config.inputs);
    let analysis = analyzer.analyze()?;
    tracing::debug!(
        "Charting {} scheduler and {} non-scheduler samples",
        analysis.scheduler.len(),
        analysis.non_scheduler.len()
    );

    // Hand the finished chart to the rendering surface
    let addr: SocketAddr = config
        .display
        .bind
        .parse()
        .with_context(|| format!("Invalid display.bind address: {}", config.display.bind))?;
    let surface = HttpChartSurface::new(
        addr,
        SvgRenderer::new(config.display.width, config.display.height),
    );
    surface.display(analysis.chart, analysis.comparison).await?;

    Ok(())
}
