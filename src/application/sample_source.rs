// Source trait for battery measurement data access
use crate::domain::battery::{Series, TimeMode};
use crate::domain::error::DataFormatError;
use std::path::Path;

pub trait SampleSource: Send + Sync {
    /// Load one labelled series from `path`, ordered by time, without deduplication
    fn load_series(
        &self,
        path: &Path,
        label: &str,
        time_mode: TimeMode,
    ) -> Result<Series, DataFormatError>;
}
