// Rendering collaborator trait
use crate::domain::battery::ComparisonResult;
use crate::domain::chart::ChartData;
use async_trait::async_trait;

#[async_trait]
pub trait ChartSurface: Send + Sync {
    /// Display a finished chart alongside the comparison it was built from
    async fn display(&self, chart: ChartData, comparison: ComparisonResult) -> anyhow::Result<()>;
}
