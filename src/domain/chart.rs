// Chart domain models handed to the rendering surface
use serde::Serialize;

use super::battery::{Series, TimeMode};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: i64,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    None,
    Circle,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub marker: MarkerKind,
    pub points: Vec<ChartPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, color: Option<String>, points: Vec<ChartPoint>) -> Self {
        Self {
            id,
            name,
            color,
            marker: MarkerKind::None,
            points,
        }
    }

    pub fn from_series(id: &str, series: &Series, color: Option<String>) -> Self {
        let points = series
            .samples
            .iter()
            .map(|s| ChartPoint::new(s.time, s.battery_percent))
            .collect();
        Self::new(id.to_string(), series.label.clone(), color, points)
    }

    pub fn with_marker(mut self, marker: MarkerKind) -> Self {
        self.marker = marker;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub time_mode: TimeMode,
    pub legend: bool,
    pub grid: bool,
    pub annotation: Option<String>,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn new(
        title: String,
        x_title: String,
        y_title: String,
        time_mode: TimeMode,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            title,
            x_title,
            y_title,
            time_mode,
            legend: true,
            grid: true,
            annotation: None,
            series,
        }
    }

    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = annotation;
        self
    }

    /// Inclusive (min, max) of time across all series.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let mut times = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.time));
        let first = times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// Inclusive (min, max) of values across all series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
