// Domain error types
use thiserror::Error;

use super::battery::TimeMode;

/// Input file does not have the shape the analyzer needs.
#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("{file}: failed to read file: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{file}: malformed CSV: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("{file}: missing required column \"{column}\"")]
    MissingColumn { file: String, column: String },
    #[error("{file}: invalid value {value:?} in column \"{column}\" at row {row}")]
    InvalidValue {
        file: String,
        column: String,
        row: usize,
        value: String,
    },
    #[error("{file}: no data rows")]
    Empty { file: String },
}

impl DataFormatError {
    /// Name of the column at fault, when the error is about one.
    pub fn column(&self) -> Option<&str> {
        match self {
            DataFormatError::MissingColumn { column, .. }
            | DataFormatError::InvalidValue { column, .. } => Some(column),
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("cannot compare series with different time bases ({scheduler} vs {non_scheduler})")]
    MixedTimeModes {
        scheduler: TimeMode,
        non_scheduler: TimeMode,
    },
    #[error("series \"{0}\" has no samples")]
    EmptySeries(String),
}
