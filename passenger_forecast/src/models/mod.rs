//! Forecast results and the SSA forecasting model

use crate::error::{ForecastError, Result};
use crate::metrics::{score, Score};
use serde::{Deserialize, Serialize};

pub mod ssa;

pub use ssa::{FitSummary, SsaForecastModel};

/// Point forecasts with lower and upper confidence bounds.
///
/// Bounds are stored raw; apply [`ForecastResult::clamped_lower_bound`] at
/// presentation time if the domain has a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Forecasted values
    point_forecast: Vec<f64>,
    /// Lower confidence bound per step
    lower_bound: Vec<f64>,
    /// Upper confidence bound per step
    upper_bound: Vec<f64>,
}

impl ForecastResult {
    /// Create a forecast result from per-step values and bounds
    pub fn new(
        point_forecast: Vec<f64>,
        lower_bound: Vec<f64>,
        upper_bound: Vec<f64>,
    ) -> Result<Self> {
        if point_forecast.len() != lower_bound.len() || point_forecast.len() != upper_bound.len() {
            return Err(ForecastError::InvalidArgument(format!(
                "Forecast length ({}) doesn't match bound lengths ({}, {})",
                point_forecast.len(),
                lower_bound.len(),
                upper_bound.len()
            )));
        }

        Ok(Self {
            point_forecast,
            lower_bound,
            upper_bound,
        })
    }

    /// Get the number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.point_forecast.len()
    }

    /// Get the forecasted values
    pub fn point_forecast(&self) -> &[f64] {
        &self.point_forecast
    }

    /// Get the raw lower bounds
    pub fn lower_bound(&self) -> &[f64] {
        &self.lower_bound
    }

    /// Get the upper bounds
    pub fn upper_bound(&self) -> &[f64] {
        &self.upper_bound
    }

    /// Distance from each point forecast to its upper bound
    pub fn half_widths(&self) -> Vec<f64> {
        self.upper_bound
            .iter()
            .zip(self.point_forecast.iter())
            .map(|(u, p)| u - p)
            .collect()
    }

    /// Lower bounds raised to `floor` where they fall below it
    pub fn clamped_lower_bound(&self, floor: f64) -> Vec<f64> {
        self.lower_bound.iter().map(|l| l.max(floor)).collect()
    }

    /// Score the point forecasts against observed values
    pub fn score_against(&self, actual: &[f64]) -> Result<Score> {
        score(actual, &self.point_forecast)
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
