// Application state for HTTP handlers
use crate::domain::battery::ComparisonResult;
use crate::domain::chart::ChartData;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    pub chart: ChartData,
    pub comparison: ComparisonResult,
    #[serde(skip)]
    pub svg: String,
}
