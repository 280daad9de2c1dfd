//! Metrics for evaluating forecast performance

use crate::data::SeriesView;
use crate::engine::ForecastEngine;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregate error of forecasts against actual values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, " > Evaluation Metrics")?;
        writeln!(f, " > Mean Absolute Error: {:.3}", self.mae)?;
        writeln!(f, " > Root Mean Squared Error: {:.3}", self.rmse)?;
        Ok(())
    }
}

/// Score index-aligned `actual` and `forecast` sequences
pub fn score(actual: &[f64], forecast: &[f64]) -> Result<Score> {
    if actual.len() != forecast.len() {
        return Err(ForecastError::LengthMismatch {
            actual: actual.len(),
            forecast: forecast.len(),
        });
    }

    if actual.is_empty() {
        return Err(ForecastError::InvalidArgument(
            "Cannot score empty sequences".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let errors: Vec<f64> = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let rmse = (errors.iter().map(|e| e.powi(2)).sum::<f64>() / n).sqrt();

    Ok(Score { mae, rmse })
}

/// Outcome of a rolling one-step-ahead evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct RollingEvaluation {
    /// Observed values, in order
    pub actual: Vec<f64>,
    /// One-step forecast made just before each observation
    pub forecast: Vec<f64>,
    /// Score of `forecast` against `actual`
    pub score: Score,
}

/// Forecast one step, ingest the true value, repeat over `holdout`.
///
/// Leaves `engine` advanced past every holdout observation.
pub fn evaluate_one_step(
    engine: &mut ForecastEngine,
    holdout: SeriesView<'_>,
) -> Result<RollingEvaluation> {
    let mut actual = Vec::with_capacity(holdout.len());
    let mut forecast = Vec::with_capacity(holdout.len());

    for observation in holdout {
        let next = engine.forecast(1)?;
        forecast.push(next.point_forecast()[0]);
        actual.push(observation.value());
        engine.ingest(*observation)?;
    }

    let score = score(&actual, &forecast)?;
    debug!(steps = actual.len(), mae = score.mae, rmse = score.rmse, "rolling evaluation done");

    Ok(RollingEvaluation {
        actual,
        forecast,
        score,
    })
}
