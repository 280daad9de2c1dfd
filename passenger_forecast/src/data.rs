//! Monthly observations and the ordered buffer that feeds the model

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single monthly observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// First day of the observed month
    timestamp: NaiveDate,
    /// Observed count
    value: f64,
}

impl Observation {
    /// Create an observation; the timestamp is truncated to its month
    pub fn new(timestamp: NaiveDate, value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(ForecastError::InvalidArgument(format!(
                "Observation value must be finite and non-negative, got {}",
                value
            )));
        }

        let timestamp = NaiveDate::from_ymd_opt(timestamp.year(), timestamp.month(), 1)
            .ok_or_else(|| {
                ForecastError::InvalidArgument(format!("Cannot truncate {} to a month", timestamp))
            })?;

        Ok(Self { timestamp, value })
    }

    /// Create an observation for `year`-`month`
    pub fn for_month(year: i32, month: u32, value: f64) -> Result<Self> {
        let timestamp = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ForecastError::InvalidArgument(format!("Invalid month {}-{:02}", year, month))
        })?;
        Self::new(timestamp, value)
    }

    /// Get the month of the observation
    pub fn timestamp(&self) -> NaiveDate {
        self.timestamp
    }

    /// Get the observed value
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Ordered store of observations, oldest first.
///
/// A bounded buffer evicts its oldest observation once `capacity` is reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBuffer {
    /// Always contiguous, so views can borrow a single slice
    observations: VecDeque<Observation>,
    capacity: Option<usize>,
}

impl SeriesBuffer {
    /// Create an empty, unbounded buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer that keeps at most `capacity` observations
    pub fn bounded(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ForecastError::InvalidArgument(
                "Buffer capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            observations: VecDeque::with_capacity(2 * capacity),
            capacity: Some(capacity),
        })
    }

    /// Build an unbounded buffer from observations in chronological order
    pub fn from_observations<I>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut buffer = Self::new();
        for observation in observations {
            buffer.append(observation)?;
        }
        Ok(buffer)
    }

    /// Append an observation strictly after the last stored one
    pub fn append(&mut self, observation: Observation) -> Result<()> {
        if let Some(last) = self.observations.back() {
            if observation.timestamp <= last.timestamp {
                return Err(ForecastError::OutOfOrder {
                    previous: last.timestamp,
                    attempted: observation.timestamp,
                });
            }
        }

        if let Some(capacity) = self.capacity {
            if self.observations.len() == capacity {
                self.observations.pop_front();
            }
        }

        self.observations.push_back(observation);
        // Only moves data when the ring wraps, at most once per `capacity` appends
        self.observations.make_contiguous();
        Ok(())
    }

    /// Get the number of stored observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the capacity limit, if any
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Get the most recent observation
    pub fn last(&self) -> Option<&Observation> {
        self.observations.back()
    }

    fn as_slice(&self) -> &[Observation] {
        self.observations.as_slices().0
    }

    /// Get the values as a vector
    pub fn values(&self) -> Vec<f64> {
        self.view().values()
    }

    /// View the whole buffer
    pub fn view(&self) -> SeriesView<'_> {
        SeriesView {
            observations: self.as_slice(),
            offset: 0,
        }
    }

    /// Read-only view of `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> Result<SeriesView<'_>> {
        let len = self.observations.len();
        if start > end || end > len {
            return Err(ForecastError::Range { start, end, len });
        }

        Ok(SeriesView {
            observations: &self.as_slice()[start..end],
            offset: start,
        })
    }

    /// Split chronologically into `(train, test)` views.
    ///
    /// The train view holds the first `round(len * train_fraction)` observations.
    pub fn split(&self, train_fraction: f64) -> Result<(SeriesView<'_>, SeriesView<'_>)> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(ForecastError::InvalidArgument(format!(
                "Train fraction must be between 0 and 1 (exclusive), got {}",
                train_fraction
            )));
        }

        let len = self.observations.len();
        let train_len = (len as f64 * train_fraction).round() as usize;

        Ok((self.slice(0, train_len)?, self.slice(train_len, len)?))
    }
}

/// Borrowed, read-only run of consecutive observations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesView<'a> {
    observations: &'a [Observation],
    offset: usize,
}

impl<'a> SeriesView<'a> {
    /// Get the observations in chronological order
    pub fn observations(&self) -> &'a [Observation] {
        self.observations
    }

    /// Index of the first observation in the originating buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the view is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the first observation
    pub fn first(&self) -> Option<&'a Observation> {
        self.observations.first()
    }

    /// Get the last observation
    pub fn last(&self) -> Option<&'a Observation> {
        self.observations.last()
    }

    /// Get the values as a vector
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(Observation::value).collect()
    }

    /// Get the timestamps as a vector
    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(Observation::timestamp).collect()
    }

    /// Iterate over the observations
    pub fn iter(&self) -> std::slice::Iter<'a, Observation> {
        self.observations.iter()
    }

    /// Copy the view into an owned, unbounded buffer
    pub fn to_buffer(&self) -> SeriesBuffer {
        SeriesBuffer {
            observations: self.observations.iter().cloned().collect(),
            capacity: None,
        }
    }
}

impl<'a> IntoIterator for SeriesView<'a> {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Advance a month timestamp by `months`
pub fn add_months(month: NaiveDate, months: u32) -> Option<NaiveDate> {
    month.checked_add_months(chrono::Months::new(months))
}
