// Battery drain analyzer - Use case for comparing scheduler and non-scheduler runs
use crate::application::sample_source::SampleSource;
use crate::domain::battery::{bucket_average, ComparisonResult, RunResult, Series, TimeMode};
use crate::domain::chart::{ChartData, MarkerKind, SeriesData};
use crate::domain::error::AnalysisError;
use crate::infrastructure::config::InputsConfig;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

pub const SCHEDULER_LABEL: &str = "Scheduler Mode";
pub const NON_SCHEDULER_LABEL: &str = "Non-Scheduler Mode";

const CHART_TITLE: &str = "Battery Drain Comparison";
const Y_TITLE: &str = "Battery (%)";
const SCHEDULER_COLOR: &str = "#1f77b4";
const NON_SCHEDULER_COLOR: &str = "#ff7f0e";

/// Result of one analysis run, ready to hand to a chart surface.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub scheduler: Series,
    pub non_scheduler: Series,
    pub comparison: ComparisonResult,
    pub chart: ChartData,
}

#[derive(Clone)]
pub struct BatteryDrainAnalyzer {
    source: Arc<dyn SampleSource>,
    inputs: InputsConfig,
}

impl BatteryDrainAnalyzer {
    pub fn new(source: Arc<dyn SampleSource>, inputs: InputsConfig) -> Self {
        Self { source, inputs }
    }

    pub fn analyze(&self) -> anyhow::Result<Analysis> {
        let time_mode = self.inputs.time_mode;

        let scheduler = self.load(&self.inputs.scheduler, SCHEDULER_LABEL, time_mode)?;
        let non_scheduler = self.load(&self.inputs.non_scheduler, NON_SCHEDULER_LABEL, time_mode)?;

        let comparison = compare(&scheduler, &non_scheduler)?;
        log_summary(&comparison);

        let chart = build_chart(&scheduler, &non_scheduler, &comparison);

        Ok(Analysis {
            scheduler,
            non_scheduler,
            comparison,
            chart,
        })
    }

    fn load(&self, path: &str, label: &str, time_mode: TimeMode) -> anyhow::Result<Series> {
        let series = self
            .source
            .load_series(Path::new(path), label, time_mode)
            .with_context(|| format!("Failed to load {} data", label))?;

        let series = match time_mode {
            TimeMode::SyntheticIndex => {
                let averaged = bucket_average(&series);
                tracing::debug!(
                    "{}: collapsed {} samples into {} time buckets",
                    label,
                    series.len(),
                    averaged.len()
                );
                averaged
            }
            TimeMode::Absolute => series,
        };

        Ok(series)
    }
}

/// Compare two runs recorded on the same time basis.
pub fn compare(scheduler: &Series, non_scheduler: &Series) -> Result<ComparisonResult, AnalysisError> {
    if scheduler.time_mode != non_scheduler.time_mode {
        return Err(AnalysisError::MixedTimeModes {
            scheduler: scheduler.time_mode,
            non_scheduler: non_scheduler.time_mode,
        });
    }

    let scheduler_run = RunResult::from_series(scheduler)
        .ok_or_else(|| AnalysisError::EmptySeries(scheduler.label.clone()))?;
    let non_scheduler_run = RunResult::from_series(non_scheduler)
        .ok_or_else(|| AnalysisError::EmptySeries(non_scheduler.label.clone()))?;

    Ok(ComparisonResult::new(scheduler_run, non_scheduler_run))
}

pub fn format_saved_annotation(saved_percent: f64) -> String {
    format!("Battery Saved: {:.2}%", saved_percent)
}

pub fn build_chart(scheduler: &Series, non_scheduler: &Series, comparison: &ComparisonResult) -> ChartData {
    let time_mode = scheduler.time_mode;
    let x_title = match time_mode {
        TimeMode::Absolute => "Time",
        TimeMode::SyntheticIndex => "Time (seconds)",
    };

    // Markers only help when the x axis is a plain index
    let (scheduler_marker, non_scheduler_marker) = match time_mode {
        TimeMode::SyntheticIndex => (MarkerKind::Cross, MarkerKind::Circle),
        TimeMode::Absolute => (MarkerKind::None, MarkerKind::None),
    };

    let series = vec![
        SeriesData::from_series("scheduler", scheduler, Some(SCHEDULER_COLOR.to_string()))
            .with_marker(scheduler_marker),
        SeriesData::from_series(
            "non_scheduler",
            non_scheduler,
            Some(NON_SCHEDULER_COLOR.to_string()),
        )
        .with_marker(non_scheduler_marker),
    ];

    ChartData::new(
        CHART_TITLE.to_string(),
        x_title.to_string(),
        Y_TITLE.to_string(),
        time_mode,
        series,
    )
    .with_annotation(comparison.battery_saved_percent.map(format_saved_annotation))
}

fn log_summary(comparison: &ComparisonResult) {
    for run in [&comparison.scheduler, &comparison.non_scheduler] {
        tracing::info!(
            "{}: {:.2}% -> {:.2}% (drop {:.2}%)",
            run.label,
            run.start_percent,
            run.end_percent,
            run.drop
        );

        if let Some(rate) = run.drain_rate_per_hour {
            match run.estimate_remaining_minutes() {
                Some(minutes) => tracing::info!(
                    "{}: drain rate {:.2}%/hour, ~{:.0} minutes remaining",
                    run.label,
                    rate,
                    minutes
                ),
                None => tracing::info!("{}: drain rate {:.2}%/hour", run.label, rate),
            }
        }

        if run.charging_samples > 0 {
            tracing::warn!(
                "{}: {} samples were recorded while charging; drop may be understated",
                run.label,
                run.charging_samples
            );
        }
    }

    match comparison.battery_saved_percent {
        Some(saved) => tracing::info!("{}", format_saved_annotation(saved)),
        None => tracing::warn!(
            "Non-scheduler drop is {:.2}%; no battery saved figure",
            comparison.non_scheduler.drop
        ),
    }
}
