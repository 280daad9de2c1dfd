//! # Passenger Forecast
//!
//! Online forecasting of monthly passenger counts with singular spectrum
//! analysis (SSA).
//!
//! ## Features
//!
//! - Ordered monthly series storage with chronological train/test splits
//! - SSA model fitting: trajectory embedding, SVD, linear recurrence extraction
//! - Point forecasts with confidence bounds that widen with the horizon
//! - A stateful engine that absorbs new observations without refitting
//! - MAE / RMSE scoring of rolling one-step-ahead forecasts
//! - CSV and in-memory record sources, JSON configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use passenger_forecast::{ForecastEngine, Observation, SeriesBuffer, SsaConfig, SsaForecastModel};
//!
//! # fn main() -> passenger_forecast::Result<()> {
//! let mut buffer = SeriesBuffer::new();
//! for t in 0..48u32 {
//!     let seasonal = 20.0 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin();
//!     buffer.append(Observation::for_month(1949 + (t / 12) as i32, t % 12 + 1, 200.0 + 2.0 * t as f64 + seasonal)?)?;
//! }
//!
//! let (train, test) = buffer.split(0.75)?;
//! let config = SsaConfig::new(12, 36, 6, 0.95);
//! let model = SsaForecastModel::fit(train, &config)?;
//!
//! let mut engine = ForecastEngine::new(model, train)?;
//! let forecast = engine.predict()?;
//! assert_eq!(forecast.horizon(), 6);
//!
//! engine.ingest(test.observations()[0])?;
//! let next = engine.forecast(1)?;
//! assert_eq!(next.horizon(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod source;

// Re-export commonly used types
pub use crate::config::{PipelineConfig, SourceConfig, SsaConfig};
pub use crate::data::{Observation, SeriesBuffer, SeriesView};
pub use crate::engine::{EngineState, ForecastEngine};
pub use crate::error::{ForecastError, Result};
pub use crate::metrics::{evaluate_one_step, score, RollingEvaluation, Score};
pub use crate::models::{FitSummary, ForecastResult, SsaForecastModel};
pub use crate::pipeline::{run_from_config, run_pipeline, PipelineReport};
pub use crate::report::{render_forecast, ForecastLine};
pub use crate::source::{CsvSource, InlineSource, RawRecord, RecordSource};
pub use ssa_math::RankSelection;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
