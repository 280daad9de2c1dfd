//! Error types for the passenger_forecast crate

use chrono::NaiveDate;
use ssa_math::MathError;
use thiserror::Error;

/// Custom error types for the passenger_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Bad configuration value (confidence level, fractions, sizes)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough observations for the requested window or series length
    #[error("Insufficient data: got {available} observations, need at least {required}")]
    InsufficientData { available: usize, required: usize },

    /// Timestamp did not move strictly forward
    #[error("Out of order observation: {attempted} does not follow {previous}")]
    OutOfOrder {
        previous: NaiveDate,
        attempted: NaiveDate,
    },

    /// Evaluator given sequences of different lengths
    #[error("Length mismatch: {actual} actual values vs {forecast} forecasts")]
    LengthMismatch { actual: usize, forecast: usize },

    /// Slice bounds outside the buffer
    #[error("Range error: [{start}, {end}) is outside a series of length {len}")]
    Range { start: usize, end: usize, len: usize },

    /// Raw records could not be turned into observations
    #[error("Data error: {0}")]
    DataError(String),

    /// Decomposition or recurrence could not be computed
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData {
                available,
                required,
            } => ForecastError::InsufficientData {
                available,
                required,
            },
            MathError::InvalidInput(msg) => ForecastError::InvalidArgument(msg),
            MathError::CalculationError(msg) => ForecastError::NumericalError(msg),
        }
    }
}
