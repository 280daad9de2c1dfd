//! Stateful online forecaster

use crate::data::{Observation, SeriesBuffer, SeriesView};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastResult, SsaForecastModel};
use tracing::trace;

/// Where the engine's cursor stands relative to the fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Cursor at the end of the history the engine was created with
    Fitted,
    /// At least one observation ingested since creation
    Advanced,
}

/// Applies a fitted model to a growing series.
///
/// Single writer: callers sharing an engine must serialize `ingest` and
/// `forecast` themselves.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    model: SsaForecastModel,
    history: SeriesBuffer,
    cursor: usize,
    ingested: usize,
}

impl ForecastEngine {
    /// Create an engine whose cursor sits after the last observation of `history`
    pub fn new(model: SsaForecastModel, history: SeriesView<'_>) -> Result<Self> {
        let required = model.required_history();
        if history.len() < required {
            return Err(ForecastError::InsufficientData {
                available: history.len(),
                required,
            });
        }

        // Only the trailing lags feed the recurrence
        let capacity = required.max(model.series_length());
        let mut buffer = SeriesBuffer::bounded(capacity)?;
        let start = history.len().saturating_sub(capacity);
        for observation in &history.observations()[start..] {
            buffer.append(*observation)?;
        }

        Ok(Self {
            model,
            history: buffer,
            cursor: history.offset() + history.len(),
            ingested: 0,
        })
    }

    /// Get the wrapped model
    pub fn model(&self) -> &SsaForecastModel {
        &self.model
    }

    /// Current state
    pub fn state(&self) -> EngineState {
        if self.ingested == 0 {
            EngineState::Fitted
        } else {
            EngineState::Advanced
        }
    }

    /// Index of the next observation in the overall series
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Most recent known observation
    pub fn last_observation(&self) -> Option<&Observation> {
        self.history.last()
    }

    /// Forecast `horizon` steps from the current cursor
    pub fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        self.model.forecast_from(&self.history.values(), horizon)
    }

    /// Forecast the model's configured horizon
    pub fn predict(&self) -> Result<ForecastResult> {
        self.forecast(self.model.horizon())
    }

    /// Absorb a new observation and move the cursor one step forward
    pub fn ingest(&mut self, observation: Observation) -> Result<()> {
        self.history.append(observation)?;
        self.cursor += 1;
        self.ingested += 1;
        trace!(cursor = self.cursor, month = %observation.timestamp(), "ingested observation");
        Ok(())
    }
}
