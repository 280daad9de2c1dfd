//! Singular spectrum analysis forecasting model

use crate::config::SsaConfig;
use crate::data::SeriesView;
use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use ssa_math::{LinearRecurrence, SsaDecomposer};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::info;

/// Two-sided standard normal quantile for `confidence_level`
pub fn z_score(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(ForecastError::InvalidArgument(format!(
            "Confidence level must be between 0 and 1 (exclusive), got {}",
            confidence_level
        )));
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::NumericalError(format!("Standard normal: {}", e)))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
}

/// Fitted SSA model.
///
/// Immutable once built; fitting again yields a new model.
#[derive(Debug, Clone, PartialEq)]
pub struct SsaForecastModel {
    /// Embedding dimension
    window_size: usize,
    /// Length of the fit window
    series_length: usize,
    /// Default forecast horizon
    horizon: usize,
    /// Two-sided coverage of the bounds
    confidence_level: f64,
    /// Recurrence over the previous `window_size - 1` values
    recurrence: LinearRecurrence,
    /// Root mean square of one-step residuals on the fit window
    training_residual_std_dev: f64,
    /// Retained singular values, largest first
    retained_singular_values: Vec<f64>,
    /// Quantile matching `confidence_level`
    z_score: f64,
}

/// Diagnostics produced alongside a fitted model
#[derive(Debug, Clone, PartialEq)]
pub struct FitSummary {
    /// Number of retained components
    pub rank: usize,
    /// Share of energy held by the retained components
    pub explained_energy: f64,
    /// All singular values of the trajectory matrix, largest first
    pub singular_values: Vec<f64>,
    /// Signal part of the fit window
    pub reconstruction: Vec<f64>,
    /// One-step-ahead residuals on the fit window
    pub residuals: Vec<f64>,
}

impl SsaForecastModel {
    /// Fit on the trailing `series_length` observations of `training`
    pub fn fit(training: SeriesView<'_>, config: &SsaConfig) -> Result<Self> {
        Self::fit_values(&training.values(), config)
    }

    /// Fit on raw values, oldest first
    pub fn fit_values(values: &[f64], config: &SsaConfig) -> Result<Self> {
        Self::fit_with_summary(values, config).map(|(model, _)| model)
    }

    /// Fit and keep the decomposition diagnostics
    #[tracing::instrument(
        skip(values, config),
        fields(window_size = config.window_size, series_length = config.series_length)
    )]
    pub fn fit_with_summary(values: &[f64], config: &SsaConfig) -> Result<(Self, FitSummary)> {
        config.validate()?;

        if values.len() < config.series_length {
            return Err(ForecastError::InsufficientData {
                available: values.len(),
                required: config.series_length,
            });
        }

        let window = &values[values.len() - config.series_length..];
        let decomposition = SsaDecomposer::new(config.window_size, config.rank)?.decompose(window)?;
        let recurrence = decomposition.recurrence()?;

        let residuals = recurrence.one_step_residuals(window)?;
        let mean_square = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;
        let training_residual_std_dev = mean_square.sqrt();
        if !training_residual_std_dev.is_finite() {
            return Err(ForecastError::NumericalError(
                "Training residuals are not finite".to_string(),
            ));
        }

        let model = Self {
            window_size: config.window_size,
            series_length: config.series_length,
            horizon: config.horizon,
            confidence_level: config.confidence_level,
            recurrence,
            training_residual_std_dev,
            retained_singular_values: decomposition.retained_singular_values().to_vec(),
            z_score: z_score(config.confidence_level)?,
        };

        let summary = FitSummary {
            rank: decomposition.rank(),
            explained_energy: decomposition.explained_energy(),
            singular_values: decomposition.singular_values().to_vec(),
            reconstruction: decomposition.reconstruction().to_vec(),
            residuals,
        };

        info!(
            rank = summary.rank,
            explained_energy = summary.explained_energy,
            residual_std_dev = training_residual_std_dev,
            "fitted SSA model"
        );

        Ok((model, summary))
    }

    /// Get the embedding dimension
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Get the fit window length
    pub fn series_length(&self) -> usize {
        self.series_length
    }

    /// Get the default horizon
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Get the confidence level
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Get the recurrence coefficients, oldest lag first
    pub fn linear_recurrence_coefficients(&self) -> &[f64] {
        self.recurrence.coefficients()
    }

    /// Get the residual standard deviation used for the bounds
    pub fn training_residual_std_dev(&self) -> f64 {
        self.training_residual_std_dev
    }

    /// Get the retained singular values
    pub fn retained_singular_values(&self) -> &[f64] {
        &self.retained_singular_values
    }

    /// Number of trailing values a forecast starts from
    pub fn required_history(&self) -> usize {
        self.recurrence.order()
    }

    /// Bound half-width at 1-based `step`: `z · σ · √step`
    pub fn half_width(&self, step: usize) -> f64 {
        self.z_score * self.training_residual_std_dev * (step as f64).sqrt()
    }

    /// Forecast `horizon` steps past the end of `history`
    pub fn forecast_from(&self, history: &[f64], horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidArgument(
                "Horizon must be at least 1".to_string(),
            ));
        }

        let points = self.recurrence.extend(history, horizon)?;
        let (lower, upper) = points
            .iter()
            .enumerate()
            .map(|(k, p)| {
                let width = self.half_width(k + 1);
                (p - width, p + width)
            })
            .unzip();

        ForecastResult::new(points, lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_z_score_95() {
        assert_abs_diff_eq!(z_score(0.95).unwrap(), 1.959964, epsilon = 1e-6);
    }

    #[test]
    fn test_z_score_rejects_bounds() {
        assert!(z_score(0.0).is_err());
        assert!(z_score(1.0).is_err());
        assert!(z_score(f64::NAN).is_err());
    }

    #[test]
    fn test_half_width_grows_with_sqrt_step() {
        let values: Vec<f64> = (0..24)
            .map(|t| 100.0 + t as f64 + if t % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let model = SsaForecastModel::fit_values(&values, &SsaConfig::new(4, 24, 6, 0.95)).unwrap();

        let w1 = model.half_width(1);
        assert!(w1 > 0.0);
        assert_abs_diff_eq!(model.half_width(4), 2.0 * w1, epsilon = 1e-9);
    }
}
