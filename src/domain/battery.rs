// Battery measurement domain models
use serde::{Deserialize, Serialize};
use std::fmt;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Time basis used for every sample of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeMode {
    /// Epoch milliseconds, parsed from the `Timestamp` column
    Absolute,
    /// Zero-based row index
    SyntheticIndex,
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMode::Absolute => write!(f, "absolute"),
            TimeMode::SyntheticIndex => write!(f, "synthetic-index"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: i64,
    pub battery_percent: f64,
    pub discharging: Option<bool>,
}

impl Sample {
    pub fn new(time: i64, battery_percent: f64) -> Self {
        Self {
            time,
            battery_percent,
            discharging: None,
        }
    }

    pub fn with_discharging(mut self, discharging: Option<bool>) -> Self {
        self.discharging = discharging;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub time_mode: TimeMode,
    pub samples: Vec<Sample>,
}

impl Series {
    /// Builds a series, sorting samples by time. Equal times keep their input order.
    pub fn new(label: String, time_mode: TimeMode, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.time);
        Self {
            label,
            time_mode,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

/// Collapse samples sharing a time value into one sample holding the mean battery percentage.
pub fn bucket_average(series: &Series) -> Series {
    let mut buckets: Vec<(Sample, usize)> = Vec::with_capacity(series.samples.len());

    for sample in &series.samples {
        match buckets.last_mut() {
            Some((bucket, count)) if bucket.time == sample.time => {
                bucket.battery_percent += sample.battery_percent;
                bucket.discharging = sample.discharging;
                *count += 1;
            }
            _ => buckets.push((sample.clone(), 1)),
        }
    }

    let samples = buckets
        .into_iter()
        .map(|(mut bucket, count)| {
            bucket.battery_percent /= count as f64;
            bucket
        })
        .collect();

    Series::new(series.label.clone(), series.time_mode, samples)
}

/// First minus last battery percentage. `None` for an empty series.
pub fn compute_drop(series: &Series) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    Some(first.battery_percent - last.battery_percent)
}

/// Relative reduction of the scheduler drop against the non-scheduler baseline.
///
/// Returns `None` when the baseline drop is not positive, since no meaningful
/// ratio exists in that case.
pub fn compute_saved_percent(scheduler_drop: f64, non_scheduler_drop: f64) -> Option<f64> {
    if non_scheduler_drop > 0.0 {
        Some(((non_scheduler_drop - scheduler_drop) / non_scheduler_drop) * 100.0)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub label: String,
    pub drop: f64,
    pub start_percent: f64,
    pub end_percent: f64,
    pub duration: i64,
    pub drain_rate_per_hour: Option<f64>,
    pub charging_samples: usize,
}

impl RunResult {
    pub fn from_series(series: &Series) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;
        let drop = compute_drop(series)?;
        let duration = last.time - first.time;

        let drain_rate_per_hour = match series.time_mode {
            TimeMode::Absolute if duration > 0 => Some(drop / (duration as f64 / MS_PER_HOUR)),
            _ => None,
        };

        let charging_samples = series
            .samples
            .iter()
            .filter(|s| s.discharging == Some(false))
            .count();

        Some(Self {
            label: series.label.clone(),
            drop,
            start_percent: first.battery_percent,
            end_percent: last.battery_percent,
            duration,
            drain_rate_per_hour,
            charging_samples,
        })
    }

    /// Minutes until empty at the observed drain rate, if the rate is known and positive.
    pub fn estimate_remaining_minutes(&self) -> Option<f64> {
        match self.drain_rate_per_hour {
            Some(rate) if rate > 0.0 => Some(self.end_percent.max(0.0) * 60.0 / rate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub scheduler: RunResult,
    pub non_scheduler: RunResult,
    pub battery_saved_percent: Option<f64>,
}

impl ComparisonResult {
    pub fn new(scheduler: RunResult, non_scheduler: RunResult) -> Self {
        let battery_saved_percent = compute_saved_percent(scheduler.drop, non_scheduler.drop);
        Self {
            scheduler,
            non_scheduler,
            battery_saved_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, f64)]) -> Series {
        let samples = points.iter().map(|&(t, b)| Sample::new(t, b)).collect();
        Series::new("test".to_string(), TimeMode::SyntheticIndex, samples)
    }

    #[test]
    fn test_compute_drop() {
        let s = series(&[(0, 100.0), (1, 97.5), (2, 91.0)]);
        assert_eq!(compute_drop(&s), Some(9.0));
    }

    #[test]
    fn test_compute_drop_single_sample() {
        let s = series(&[(5, 42.0)]);
        assert_eq!(compute_drop(&s), Some(0.0));
    }

    #[test]
    fn test_compute_drop_empty() {
        let s = series(&[]);
        assert_eq!(compute_drop(&s), None);
    }

    #[test]
    fn test_compute_drop_can_be_negative() {
        let s = series(&[(0, 50.0), (1, 60.0)]);
        assert_eq!(compute_drop(&s), Some(-10.0));
    }

    #[test]
    fn test_compute_saved_percent() {
        assert_eq!(compute_saved_percent(10.0, 20.0), Some(50.0));
        assert_eq!(compute_saved_percent(0.0, 10.0), Some(100.0));
        assert_eq!(compute_saved_percent(20.0, 0.0), None);
        assert_eq!(compute_saved_percent(5.0, -3.0), None);
    }

    #[test]
    fn test_compute_saved_percent_scheduler_worse() {
        assert_eq!(compute_saved_percent(30.0, 20.0), Some(-50.0));
    }

    #[test]
    fn test_bucket_average() {
        let s = series(&[(0, 100.0), (0, 98.0), (1, 90.0)]);
        let averaged = bucket_average(&s);
        assert_eq!(
            averaged.samples,
            vec![Sample::new(0, 99.0), Sample::new(1, 90.0)]
        );
    }

    #[test]
    fn test_bucket_average_is_idempotent() {
        let s = series(&[(2, 80.0), (0, 100.0), (2, 70.0), (1, 95.0), (0, 99.0), (0, 98.0)]);
        let once = bucket_average(&s);
        let twice = bucket_average(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bucket_average_keeps_distinct_times_in_order() {
        let s = series(&[(3, 60.0), (1, 90.0), (3, 58.0), (2, 75.0), (1, 88.0)]);
        let averaged = bucket_average(&s);
        let times: Vec<i64> = averaged.samples.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![1, 2, 3]);
        assert_eq!(averaged.samples[0].battery_percent, 89.0);
        assert_eq!(averaged.samples[2].battery_percent, 59.0);
    }

    #[test]
    fn test_series_sorts_stably() {
        let s = series(&[(1, 10.0), (0, 20.0), (1, 30.0)]);
        let values: Vec<f64> = s.samples.iter().map(|p| p.battery_percent).collect();
        assert_eq!(values, vec![20.0, 10.0, 30.0]);
    }

    #[test]
    fn test_run_result_absolute_drain_rate() {
        let samples = vec![
            Sample::new(0, 100.0).with_discharging(Some(true)),
            Sample::new(1_800_000, 97.0).with_discharging(Some(false)),
            Sample::new(3_600_000, 95.0).with_discharging(Some(true)),
        ];
        let s = Series::new("run".to_string(), TimeMode::Absolute, samples);
        let run = RunResult::from_series(&s).unwrap();

        assert_eq!(run.drop, 5.0);
        assert_eq!(run.duration, 3_600_000);
        assert_eq!(run.drain_rate_per_hour, Some(5.0));
        assert_eq!(run.charging_samples, 1);
        assert_eq!(run.estimate_remaining_minutes(), Some(1140.0));
    }

    #[test]
    fn test_run_result_synthetic_has_no_rate() {
        let s = series(&[(0, 100.0), (10, 90.0)]);
        let run = RunResult::from_series(&s).unwrap();
        assert_eq!(run.drain_rate_per_hour, None);
        assert_eq!(run.estimate_remaining_minutes(), None);
    }

    #[test]
    fn test_comparison_result() {
        let scheduler = RunResult::from_series(&series(&[(0, 100.0), (1, 90.0)])).unwrap();
        let non_scheduler = RunResult::from_series(&series(&[(0, 100.0), (1, 80.0)])).unwrap();
        let comparison = ComparisonResult::new(scheduler, non_scheduler);
        assert_eq!(comparison.battery_saved_percent, Some(50.0));
    }

    #[test]
    fn test_time_mode_display() {
        assert_eq!(TimeMode::Absolute.to_string(), "absolute");
        assert_eq!(TimeMode::SyntheticIndex.to_string(), "synthetic-index");
    }
}
