//! Model and pipeline configuration

use crate::error::{ForecastError, Result};
use crate::source::RawRecord;
use serde::{Deserialize, Serialize};
use ssa_math::RankSelection;
use std::fs;
use std::path::{Path, PathBuf};

/// Parameters accepted by [`SsaForecastModel::fit`](crate::models::ssa::SsaForecastModel::fit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SsaConfig {
    /// Embedding dimension of the trajectory matrix
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Number of trailing training observations the model is fitted on
    #[serde(default = "default_series_length")]
    pub series_length: usize,

    /// Forecast steps produced by default
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Two-sided coverage of the confidence bounds
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    /// Signal subspace size
    #[serde(default)]
    pub rank: RankSelection,
}

fn default_window_size() -> usize {
    6
}
fn default_series_length() -> usize {
    12
}
fn default_horizon() -> usize {
    6
}
fn default_confidence_level() -> f64 {
    0.95
}
fn default_train_fraction() -> f64 {
    0.8
}

impl Default for SsaConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            series_length: default_series_length(),
            horizon: default_horizon(),
            confidence_level: default_confidence_level(),
            rank: RankSelection::default(),
        }
    }
}

impl SsaConfig {
    /// Create a configuration with the default rank selection
    pub fn new(
        window_size: usize,
        series_length: usize,
        horizon: usize,
        confidence_level: f64,
    ) -> Self {
        Self {
            window_size,
            series_length,
            horizon,
            confidence_level,
            rank: RankSelection::default(),
        }
    }

    /// Replace the rank selection rule
    pub fn with_rank(mut self, rank: RankSelection) -> Self {
        self.rank = rank;
        self
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(ForecastError::InvalidArgument(format!(
                "Window size must be at least 2, got {}",
                self.window_size
            )));
        }

        if self.horizon == 0 {
            return Err(ForecastError::InvalidArgument(
                "Horizon must be at least 1".to_string(),
            ));
        }

        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidArgument(format!(
                "Confidence level must be between 0 and 1 (exclusive), got {}",
                self.confidence_level
            )));
        }

        self.rank.validate()?;

        if self.series_length == 0 {
            return Err(ForecastError::InvalidArgument(
                "Series length must be at least 1".to_string(),
            ));
        }

        if self.series_length <= self.window_size {
            return Err(ForecastError::InsufficientData {
                available: self.series_length,
                required: self.window_size + 1,
            });
        }

        Ok(())
    }
}

/// Where the raw monthly records come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Delimited text file with a header row
    Csv {
        path: PathBuf,
        #[serde(default = "default_month_column")]
        month_column: String,
        #[serde(default = "default_value_column")]
        value_column: String,
        #[serde(default = "default_delimiter")]
        delimiter: char,
    },
    /// Records embedded in the configuration itself
    Inline { records: Vec<RawRecord> },
}

fn default_month_column() -> String {
    "Month".to_string()
}
fn default_value_column() -> String {
    "#Passengers".to_string()
}
fn default_delimiter() -> char {
    ','
}

impl SourceConfig {
    /// CSV source with the default column names
    pub fn csv<P: Into<PathBuf>>(path: P) -> Self {
        SourceConfig::Csv {
            path: path.into(),
            month_column: default_month_column(),
            value_column: default_value_column(),
            delimiter: default_delimiter(),
        }
    }
}

/// Top-level configuration of a load, fit, evaluate and forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Record source
    pub source: SourceConfig,

    /// Model settings
    #[serde(default)]
    pub model: SsaConfig,

    /// Share of observations used for training
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
}

impl PipelineConfig {
    /// Create a configuration with the default train fraction
    pub fn new(source: SourceConfig, model: SsaConfig) -> Self {
        Self {
            source,
            model,
            train_fraction: default_train_fraction(),
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON file; relative CSV paths resolve against the file's directory
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json_str(&fs::read_to_string(path)?)?;

        if let SourceConfig::Csv {
            path: csv_path, ..
        } = &mut config.source
        {
            if csv_path.is_relative() {
                if let Some(dir) = path.parent() {
                    *csv_path = dir.join(&*csv_path);
                }
            }
        }

        Ok(config)
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(ForecastError::InvalidArgument(format!(
                "Train fraction must be between 0 and 1 (exclusive), got {}",
                self.train_fraction
            )));
        }

        if let SourceConfig::Csv { delimiter, .. } = &self.source {
            if !delimiter.is_ascii() {
                return Err(ForecastError::InvalidArgument(format!(
                    "CSV delimiter must be a single ASCII character, got {:?}",
                    delimiter
                )));
            }
        }

        self.model.validate()
    }
}
