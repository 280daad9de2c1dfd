//! # SSA Math
//!
//! Numerical building blocks for singular spectrum analysis (SSA).
//! This crate embeds a series into a trajectory matrix, decomposes it with a
//! singular value decomposition, and turns the retained signal subspace into a
//! linear recurrence that can extrapolate the series.
//!
//! ```
//! use ssa_math::{RankSelection, SsaDecomposer};
//!
//! let series: Vec<f64> = (0..24).map(|t| 10.0 + 2.0 * t as f64).collect();
//! let decomposer = SsaDecomposer::new(6, RankSelection::Fixed(2)).unwrap();
//! let decomposition = decomposer.decompose(&series).unwrap();
//! let recurrence = decomposition.recurrence().unwrap();
//!
//! let next = recurrence.next_value(&series).unwrap();
//! assert!((next - 58.0).abs() < 1e-6);
//! ```

use thiserror::Error;

pub mod decomposition;
pub mod embedding;
pub mod reconstruction;
pub mod recurrence;

pub use decomposition::{Decomposition, RankSelection, SsaDecomposer};
pub use embedding::trajectory_matrix;
pub use reconstruction::diagonal_average;
pub use recurrence::LinearRecurrence;

/// Errors that can occur in SSA calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: got {available} observations, need at least {required}")]
    InsufficientData { available: usize, required: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for SSA math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = MathError::InsufficientData {
            available: 3,
            required: 6,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: got 3 observations, need at least 6"
        );
    }
}
