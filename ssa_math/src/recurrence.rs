//! Linear recurrence formulae (LRF) derived from an SSA signal subspace

use crate::{MathError, Result};
use nalgebra::DMatrix;

/// Verticality values this close to one make the recurrence blow up.
const VERTICALITY_LIMIT: f64 = 1.0 - 1e-9;

/// A linear recurrence `x[n] = Σ a[j] · x[n - order + j]`.
///
/// Coefficients are stored oldest lag first, so `coefficients()[order - 1]`
/// weights the most recent value.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRecurrence {
    coefficients: Vec<f64>,
}

impl LinearRecurrence {
    /// Wrap explicit coefficients (oldest lag first)
    pub fn from_coefficients(coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(MathError::InvalidInput(
                "Recurrence needs at least one coefficient".to_string(),
            ));
        }

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(MathError::InvalidInput(
                "Recurrence coefficients must be finite".to_string(),
            ));
        }

        Ok(Self { coefficients })
    }

    /// Derive the recurrence from a `window × rank` orthonormal basis.
    ///
    /// With `π` the last row of the basis and `ν² = |π|²`, the coefficients are
    /// `(1 / (1 - ν²)) · Σ π_i · U_i[..window - 1]`.
    pub fn from_basis(basis: &DMatrix<f64>) -> Result<Self> {
        let (window, rank) = basis.shape();
        if window < 2 {
            return Err(MathError::InvalidInput(format!(
                "Basis vectors must have length at least 2, got {}",
                window
            )));
        }
        if rank == 0 {
            return Err(MathError::InvalidInput(
                "Basis must contain at least one vector".to_string(),
            ));
        }

        let last = window - 1;
        let verticality: f64 = (0..rank).map(|i| basis[(last, i)].powi(2)).sum();

        if verticality >= VERTICALITY_LIMIT {
            return Err(MathError::CalculationError(format!(
                "Verticality coefficient {:.6} leaves the recurrence undefined",
                verticality
            )));
        }

        let scale = 1.0 / (1.0 - verticality);
        let coefficients = (0..last)
            .map(|j| {
                let weighted: f64 = (0..rank).map(|i| basis[(last, i)] * basis[(j, i)]).sum();
                weighted * scale
            })
            .collect();

        Self::from_coefficients(coefficients)
    }

    /// Get the coefficients, oldest lag first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of past values each step depends on
    pub fn order(&self) -> usize {
        self.coefficients.len()
    }

    /// Predict the value following `history`
    pub fn next_value(&self, history: &[f64]) -> Result<f64> {
        let order = self.order();
        if history.len() < order {
            return Err(MathError::InsufficientData {
                available: history.len(),
                required: order,
            });
        }

        let lags = &history[history.len() - order..];
        Ok(self
            .coefficients
            .iter()
            .zip(lags.iter())
            .map(|(a, x)| a * x)
            .sum())
    }

    /// Apply the recurrence `steps` times, feeding each prediction back in
    pub fn extend(&self, history: &[f64], steps: usize) -> Result<Vec<f64>> {
        let order = self.order();
        if history.len() < order {
            return Err(MathError::InsufficientData {
                available: history.len(),
                required: order,
            });
        }

        let mut window = history[history.len() - order..].to_vec();
        let mut forecasts = Vec::with_capacity(steps);

        for _ in 0..steps {
            let next = self.next_value(&window)?;
            window.remove(0);
            window.push(next);
            forecasts.push(next);
        }

        Ok(forecasts)
    }

    /// One-step-ahead residuals `actual - predicted` for every position of
    /// `series` that has a full set of lags
    pub fn one_step_residuals(&self, series: &[f64]) -> Result<Vec<f64>> {
        let order = self.order();
        if series.len() <= order {
            return Err(MathError::InsufficientData {
                available: series.len(),
                required: order + 1,
            });
        }

        (order..series.len())
            .map(|t| self.next_value(&series[..t]).map(|p| series[t] - p))
            .collect()
    }
}
