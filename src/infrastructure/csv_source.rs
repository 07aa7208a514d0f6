// CSV sample source - reads measurement files written by the battery logger
use crate::application::sample_source::SampleSource;
use crate::domain::battery::{Sample, Series, TimeMode};
use crate::domain::error::DataFormatError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const TIMESTAMP_COLUMN: &str = "Timestamp";
pub const BATTERY_COLUMN: &str = "BatteryPercent";
pub const DISCHARGING_COLUMN: &str = "Discharging";

#[derive(Debug, Clone, Default)]
pub struct CsvSampleSource;

impl CsvSampleSource {
    pub fn new() -> Self {
        Self
    }
}

impl SampleSource for CsvSampleSource {
    fn load_series(
        &self,
        path: &Path,
        label: &str,
        time_mode: TimeMode,
    ) -> Result<Series, DataFormatError> {
        let file_name = path.display().to_string();
        let file = File::open(path).map_err(|source| DataFormatError::Io {
            file: file_name.clone(),
            source,
        })?;

        // The handle is dropped when read_series returns, on success or failure
        let series = read_series(file, &file_name, label, time_mode)?;

        tracing::debug!(
            "Loaded {} samples from {} ({} time)",
            series.len(),
            file_name,
            time_mode
        );
        Ok(series)
    }
}

/// Parse a measurement CSV from any reader. `file_name` is only used in error messages.
pub fn read_series<R: Read>(
    reader: R,
    file_name: &str,
    label: &str,
    time_mode: TimeMode,
) -> Result<Series, DataFormatError> {
    let csv_error = |source: csv::Error| DataFormatError::Csv {
        file: file_name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let battery_idx = column(BATTERY_COLUMN).ok_or_else(|| DataFormatError::MissingColumn {
        file: file_name.to_string(),
        column: BATTERY_COLUMN.to_string(),
    })?;
    let timestamp_idx = column(TIMESTAMP_COLUMN);
    let discharging_idx = column(DISCHARGING_COLUMN);

    if time_mode == TimeMode::Absolute && timestamp_idx.is_none() {
        return Err(DataFormatError::MissingColumn {
            file: file_name.to_string(),
            column: TIMESTAMP_COLUMN.to_string(),
        });
    }

    let mut samples = Vec::new();
    let mut index = SyntheticIndex::default();

    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row = i + 1;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let battery_percent = parse_battery(cell(battery_idx)).ok_or_else(|| {
            DataFormatError::InvalidValue {
                file: file_name.to_string(),
                column: BATTERY_COLUMN.to_string(),
                row,
                value: cell(battery_idx).to_string(),
            }
        })?;

        let time = match time_mode {
            TimeMode::Absolute => {
                // Checked above
                let raw = timestamp_idx.map(cell).unwrap_or("");
                parse_epoch_seconds(raw).ok_or_else(|| DataFormatError::InvalidValue {
                    file: file_name.to_string(),
                    column: TIMESTAMP_COLUMN.to_string(),
                    row,
                    value: raw.to_string(),
                })?
            }
            TimeMode::SyntheticIndex => index.next(timestamp_idx.map(cell)),
        };

        let discharging = discharging_idx.and_then(|idx| parse_flag(cell(idx)));

        samples.push(Sample::new(time, battery_percent).with_discharging(discharging));
    }

    if samples.is_empty() {
        return Err(DataFormatError::Empty {
            file: file_name.to_string(),
        });
    }

    Ok(Series::new(label.to_string(), time_mode, samples))
}

/// Assigns zero-based indices to rows; consecutive rows with the same raw
/// timestamp share an index.
#[derive(Debug, Default)]
struct SyntheticIndex {
    next: i64,
    previous: Option<String>,
}

impl SyntheticIndex {
    fn next(&mut self, raw_timestamp: Option<&str>) -> i64 {
        if let (Some(raw), Some(previous)) = (raw_timestamp, &self.previous) {
            if raw == previous.as_str() {
                return self.next - 1;
            }
        }

        self.previous = raw_timestamp.map(str::to_string);
        self.next += 1;
        self.next - 1
    }
}

fn parse_battery(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Epoch seconds (fractions allowed) to epoch milliseconds.
fn parse_epoch_seconds(raw: &str) -> Option<i64> {
    let seconds = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    let millis = millis as i64;
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis).map(|_| millis)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        "" => None,
        other => {
            tracing::debug!("Ignoring unrecognized {} value: {}", DISCHARGING_COLUMN, other);
            None
        }
    }
}
