//! # Passenger Forecast Workspace
//!
//! Facade over the workspace crates: `ssa_math` for the singular spectrum
//! analysis primitives and `passenger_forecast` for the monthly series,
//! the fitted model, the online engine and evaluation.
//!
//! ## Example
//!
//! ```
//! use passenger_forecast_workspace::{score, Score};
//!
//! let s = score(&[10.0, 20.0], &[12.0, 18.0]).unwrap();
//! assert_eq!(s, Score { mae: 2.0, rmse: 2.0 });
//! ```

pub use passenger_forecast::*;

/// Numerical building blocks
pub mod math {
    pub use ssa_math::*;
}
