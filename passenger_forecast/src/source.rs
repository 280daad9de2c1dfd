//! Data-source collaborator: raw monthly records and their conversion into observations

use crate::config::SourceConfig;
use crate::data::{add_months, Observation, SeriesBuffer};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A row as delivered by a source: `yyyy-MM` month and an integer count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub month: String,
    pub passengers: i64,
}

impl RawRecord {
    pub fn new(month: &str, passengers: i64) -> Self {
        Self {
            month: month.to_string(),
            passengers,
        }
    }
}

/// Anything that can hand over the full ordered list of raw records
pub trait RecordSource {
    /// Fetch every record, oldest first
    fn fetch(&self) -> Result<Vec<RawRecord>>;
}

/// Reads records from a delimited file with a header row
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    month_column: String,
    value_column: String,
    delimiter: u8,
}

impl CsvSource {
    /// Comma separated file with `Month` and `#Passengers` columns
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            month_column: "Month".to_string(),
            value_column: "#Passengers".to_string(),
            delimiter: b',',
        }
    }

    /// Use different header names
    pub fn with_columns(mut self, month_column: &str, value_column: &str) -> Self {
        self.month_column = month_column.to_string();
        self.value_column = value_column.to_string();
        self
    }

    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            ForecastError::DataError(format!("Column '{}' not found in CSV header", name))
        })
    }
}

impl RecordSource for CsvSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let month_idx = Self::column_index(&headers, &self.month_column)?;
        let value_idx = Self::column_index(&headers, &self.value_column)?;

        let mut records = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let month = record.get(month_idx).unwrap_or_default();
            let raw_value = record.get(value_idx).unwrap_or_default();
            let passengers = raw_value.parse::<i64>().map_err(|e| {
                ForecastError::DataError(format!(
                    "Row {}: cannot parse count '{}': {}",
                    row + 1,
                    raw_value,
                    e
                ))
            })?;

            records.push(RawRecord::new(month, passengers));
        }

        debug!(path = %self.path.display(), rows = records.len(), "read CSV records");
        Ok(records)
    }
}

/// Serves records held in memory
#[derive(Debug, Clone, Default)]
pub struct InlineSource {
    records: Vec<RawRecord>,
}

impl InlineSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for InlineSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}

/// Build the source described by `config`
pub fn source_from_config(config: &SourceConfig) -> Result<Box<dyn RecordSource>> {
    match config {
        SourceConfig::Csv {
            path,
            month_column,
            value_column,
            delimiter,
        } => {
            if !delimiter.is_ascii() {
                return Err(ForecastError::InvalidArgument(format!(
                    "CSV delimiter must be a single ASCII character, got {:?}",
                    delimiter
                )));
            }
            Ok(Box::new(
                CsvSource::new(path)
                    .with_columns(month_column, value_column)
                    .with_delimiter(*delimiter as u8),
            ))
        }
        SourceConfig::Inline { records } => Ok(Box::new(InlineSource::new(records.clone()))),
    }
}

/// Parse a `yyyy-MM` month into the first day of that month
pub fn parse_month(month: &str) -> Result<NaiveDate> {
    let month = month.trim();
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|e| ForecastError::DataError(format!("Cannot parse month '{}': {}", month, e)))
}

/// Convert raw records into a buffer of consecutive monthly observations
pub fn records_to_buffer(records: &[RawRecord]) -> Result<SeriesBuffer> {
    let mut buffer = SeriesBuffer::new();

    for record in records {
        let month = parse_month(&record.month)?;
        if record.passengers < 0 {
            return Err(ForecastError::DataError(format!(
                "Negative passenger count {} for {}",
                record.passengers, record.month
            )));
        }

        if let Some(last) = buffer.last() {
            let expected = add_months(last.timestamp(), 1);
            if month > last.timestamp() && Some(month) != expected {
                return Err(ForecastError::DataError(format!(
                    "Gap in monthly series between {} and {}",
                    last.timestamp(),
                    month
                )));
            }
        }

        buffer.append(Observation::new(month, record.passengers as f64)?)?;
    }

    Ok(buffer)
}

/// Fetch from `source` and convert in one go
pub fn load_buffer(source: &dyn RecordSource) -> Result<SeriesBuffer> {
    records_to_buffer(&source.fetch()?)
}
