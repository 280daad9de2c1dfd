//! Load, fit, evaluate and forecast in one pass

use crate::config::{PipelineConfig, SsaConfig};
use crate::data::{add_months, SeriesBuffer};
use crate::engine::ForecastEngine;
use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate_one_step, RollingEvaluation};
use crate::models::{FitSummary, ForecastResult, SsaForecastModel};
use crate::report::{format_lines, render_forecast, ForecastLine};
use crate::source::{load_buffer, source_from_config};
use tracing::info;

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Observations used for training
    pub train_len: usize,
    /// Observations held out for evaluation
    pub test_len: usize,
    /// Fitted model
    pub model: SsaForecastModel,
    /// Decomposition diagnostics of the fit
    pub summary: FitSummary,
    /// Rolling one-step-ahead evaluation over the holdout
    pub evaluation: RollingEvaluation,
    /// Multi-step forecast from the end of training
    pub forecast: ForecastResult,
    /// `forecast` lined up with the holdout months
    pub lines: Vec<ForecastLine>,
}

impl std::fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.evaluation.score)?;
        write!(f, "{}", format_lines(&self.lines))
    }
}

/// Split `buffer`, fit on the train part, score rolling one-step forecasts
/// over the test part, then forecast the configured horizon from the end of
/// training.
#[tracing::instrument(
    skip_all,
    fields(observations = buffer.len(), train_fraction = train_fraction)
)]
pub fn run_pipeline(
    buffer: &SeriesBuffer,
    config: &SsaConfig,
    train_fraction: f64,
) -> Result<PipelineReport> {
    let (train, test) = buffer.split(train_fraction)?;
    if test.is_empty() {
        return Err(ForecastError::InsufficientData {
            available: buffer.len(),
            required: train.len() + 1,
        });
    }
    info!(train = train.len(), test = test.len(), "split series");

    let (model, summary) = SsaForecastModel::fit_with_summary(&train.values(), config)?;

    let mut rolling = ForecastEngine::new(model.clone(), train)?;
    let evaluation = evaluate_one_step(&mut rolling, test)?;
    info!(mae = evaluation.score.mae, rmse = evaluation.score.rmse, "evaluated holdout");

    let engine = ForecastEngine::new(model.clone(), train)?;
    let forecast = engine.predict()?;

    let last_month = train
        .last()
        .map(|o| o.timestamp())
        .ok_or(ForecastError::InsufficientData {
            available: 0,
            required: config.series_length,
        })?;
    let first_month = add_months(last_month, 1).ok_or_else(|| {
        ForecastError::DataError(format!("No month follows {}", last_month))
    })?;
    let lines = render_forecast(&forecast, first_month, test.observations())?;

    Ok(PipelineReport {
        train_len: train.len(),
        test_len: test.len(),
        model,
        summary,
        evaluation,
        forecast,
        lines,
    })
}

/// Load the configured source and run the pipeline on it
pub fn run_from_config(config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;
    let source = source_from_config(&config.source)?;
    let buffer = load_buffer(source.as_ref())?;
    info!(observations = buffer.len(), "loaded series");

    run_pipeline(&buffer, &config.model, config.train_fraction)
}
