//! Singular value decomposition of the trajectory matrix and component selection

use crate::embedding::trajectory_matrix;
use crate::reconstruction::reconstruct;
use crate::recurrence::LinearRecurrence;
use crate::{MathError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How many leading singular components make up the signal subspace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSelection {
    /// Smallest rank whose cumulative squared singular values reach `threshold`
    /// of the total, optionally capped at `max_rank`
    Energy {
        threshold: f64,
        #[serde(default)]
        max_rank: Option<usize>,
    },
    /// A fixed number of components
    Fixed(usize),
}

impl Default for RankSelection {
    fn default() -> Self {
        RankSelection::Energy {
            threshold: 0.99,
            max_rank: None,
        }
    }
}

impl RankSelection {
    /// Check the selection parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            RankSelection::Energy {
                threshold,
                max_rank,
            } => {
                if !(threshold > 0.0 && threshold <= 1.0) {
                    return Err(MathError::InvalidInput(format!(
                        "Energy threshold must be in (0, 1], got {}",
                        threshold
                    )));
                }
                if max_rank == Some(0) {
                    return Err(MathError::InvalidInput(
                        "Maximum rank must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
            RankSelection::Fixed(0) => Err(MathError::InvalidInput(
                "Fixed rank must be at least 1".to_string(),
            )),
            RankSelection::Fixed(_) => Ok(()),
        }
    }

    /// Resolve the rank against singular values sorted in descending order
    fn resolve(&self, sorted: &[f64], cap: usize) -> Result<usize> {
        let rank = match *self {
            RankSelection::Fixed(count) => count,
            RankSelection::Energy {
                threshold,
                max_rank,
            } => {
                let total: f64 = sorted.iter().map(|s| s * s).sum();
                if !(total > 0.0) || !total.is_finite() {
                    return Err(MathError::CalculationError(
                        "Trajectory matrix carries no energy".to_string(),
                    ));
                }

                let mut cumulative = 0.0;
                let mut rank = sorted.len();
                for (i, s) in sorted.iter().enumerate() {
                    cumulative += s * s;
                    if cumulative / total >= threshold {
                        rank = i + 1;
                        break;
                    }
                }
                max_rank.map_or(rank, |m| rank.min(m))
            }
        };

        Ok(rank.min(cap).max(1))
    }
}

/// Component indices ordered by singular value, largest first, ties by index
pub(crate) fn component_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));
    order
}

/// Embeds a series and extracts its leading singular components
#[derive(Debug, Clone)]
pub struct SsaDecomposer {
    window_size: usize,
    rank: RankSelection,
}

impl SsaDecomposer {
    /// Create a decomposer with embedding dimension `window_size`
    pub fn new(window_size: usize, rank: RankSelection) -> Result<Self> {
        if window_size < 2 {
            return Err(MathError::InvalidInput(format!(
                "Window size must be at least 2, got {}",
                window_size
            )));
        }
        rank.validate()?;

        Ok(Self { window_size, rank })
    }

    /// Get the embedding dimension
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Get the rank selection rule
    pub fn rank_selection(&self) -> RankSelection {
        self.rank
    }

    /// Decompose `series` and keep the signal subspace.
    ///
    /// The trajectory matrix only lives for the duration of this call.
    pub fn decompose(&self, series: &[f64]) -> Result<Decomposition> {
        let trajectory = trajectory_matrix(series, self.window_size)?;

        let svd = trajectory
            .clone()
            .try_svd(true, false, f64::EPSILON, 0)
            .ok_or_else(|| {
                MathError::CalculationError("SVD of trajectory matrix did not converge".to_string())
            })?;
        let u = svd.u.ok_or_else(|| {
            MathError::CalculationError("SVD did not produce left singular vectors".to_string())
        })?;

        let raw: Vec<f64> = svd.singular_values.iter().copied().collect();
        let order = component_order(&raw);
        let singular_values: Vec<f64> = order.iter().map(|&i| raw[i]).collect();

        let cap = (self.window_size - 1).min(singular_values.len());
        let rank = self.rank.resolve(&singular_values, cap)?;

        if rank < singular_values.len() {
            let boundary = singular_values[rank - 1] - singular_values[rank];
            if boundary.abs() <= 1e-12 * singular_values[0].max(1.0) {
                warn!(
                    rank,
                    value = singular_values[rank],
                    "tied singular values at rank boundary, keeping lower component indices"
                );
            }
        }

        let mut basis = DMatrix::from_fn(self.window_size, rank, |i, j| u[(i, order[j])]);
        // Singular vectors are defined up to sign; pin it so reported bases are stable
        for mut column in basis.column_iter_mut() {
            if column.sum() < 0.0 {
                column.neg_mut();
            }
        }

        let reconstruction = reconstruct(&trajectory, &basis);
        let decomposition = Decomposition {
            window_size: self.window_size,
            singular_values,
            basis,
            reconstruction,
        };

        debug!(
            window_size = self.window_size,
            rank,
            explained_energy = decomposition.explained_energy(),
            "decomposed trajectory matrix"
        );

        Ok(decomposition)
    }
}

/// Output of [`SsaDecomposer::decompose`]
#[derive(Debug, Clone)]
pub struct Decomposition {
    window_size: usize,
    singular_values: Vec<f64>,
    basis: DMatrix<f64>,
    reconstruction: Vec<f64>,
}

impl Decomposition {
    /// Get the embedding dimension
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of retained components
    pub fn rank(&self) -> usize {
        self.basis.ncols()
    }

    /// All singular values, largest first
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Singular values of the retained components
    pub fn retained_singular_values(&self) -> &[f64] {
        &self.singular_values[..self.rank()]
    }

    /// Share of the squared singular values held by the retained components
    pub fn explained_energy(&self) -> f64 {
        let total: f64 = self.singular_values.iter().map(|s| s * s).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.retained_singular_values()
            .iter()
            .map(|s| s * s)
            .sum::<f64>()
            / total
    }

    /// Retained left singular vectors as the columns of a `window × rank` matrix
    pub fn basis(&self) -> &DMatrix<f64> {
        &self.basis
    }

    /// Signal part of the decomposed series, rebuilt by diagonal averaging
    pub fn reconstruction(&self) -> &[f64] {
        &self.reconstruction
    }

    /// Linear recurrence implied by the retained subspace
    pub fn recurrence(&self) -> Result<LinearRecurrence> {
        LinearRecurrence::from_basis(&self.basis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    fn sine(n: usize, period: f64) -> Vec<f64> {
        (0..n).map(|t| (2.0 * PI * t as f64 / period).sin()).collect()
    }

    #[test]
    fn test_component_order_breaks_ties_by_index() {
        assert_eq!(component_order(&[1.0, 3.0, 3.0, 2.0]), vec![1, 2, 3, 0]);
        assert_eq!(component_order(&[2.0, 2.0, 2.0]), vec![0, 1, 2]);
    }

    #[test]
    fn test_constant_series_has_rank_one() {
        let series = vec![5.0; 20];
        let decomposer = SsaDecomposer::new(4, RankSelection::default()).unwrap();
        let d = decomposer.decompose(&series).unwrap();

        assert_eq!(d.rank(), 1);
        assert_abs_diff_eq!(d.explained_energy(), 1.0, epsilon = 1e-9);
        for v in d.reconstruction() {
            assert_abs_diff_eq!(*v, 5.0, epsilon = 1e-9);
        }

        let lrf = d.recurrence().unwrap();
        assert_abs_diff_eq!(lrf.next_value(&series).unwrap(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sine_needs_two_components() {
        let series = sine(48, 12.0);
        let decomposer = SsaDecomposer::new(12, RankSelection::default()).unwrap();
        let d = decomposer.decompose(&series).unwrap();

        assert_eq!(d.rank(), 2);
        assert_eq!(d.singular_values().len(), 12);

        let forecast = d.recurrence().unwrap().extend(&series, 12).unwrap();
        let truth = sine(60, 12.0);
        for (f, t) in forecast.iter().zip(truth[48..].iter()) {
            assert_abs_diff_eq!(*f, *t, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_singular_values_descending() {
        let series: Vec<f64> = (0..30).map(|t| (t as f64).sqrt() + (t % 3) as f64).collect();
        let d = SsaDecomposer::new(6, RankSelection::Fixed(3))
            .unwrap()
            .decompose(&series)
            .unwrap();

        assert!(d.singular_values().windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(d.retained_singular_values().len(), 3);
    }

    #[rstest]
    #[case(RankSelection::Fixed(10), 5)]
    #[case(RankSelection::Fixed(2), 2)]
    #[case(RankSelection::Energy { threshold: 1.0, max_rank: None }, 5)]
    #[case(RankSelection::Energy { threshold: 1.0, max_rank: Some(3) }, 3)]
    fn test_rank_is_capped(#[case] selection: RankSelection, #[case] expected: usize) {
        let series: Vec<f64> = (0..40).map(|t| ((t * 7919) % 13) as f64).collect();
        let d = SsaDecomposer::new(6, selection)
            .unwrap()
            .decompose(&series)
            .unwrap();
        assert_eq!(d.rank(), expected);
    }

    #[test]
    fn test_decomposition_is_deterministic() {
        let series: Vec<f64> = (0..36)
            .map(|t| 100.0 + t as f64 + 10.0 * (t as f64).cos())
            .collect();
        let decomposer = SsaDecomposer::new(8, RankSelection::Fixed(3)).unwrap();
        let a = decomposer.decompose(&series).unwrap();
        let b = decomposer.decompose(&series).unwrap();

        assert_eq!(a.singular_values(), b.singular_values());
        assert_eq!(a.basis(), b.basis());
        assert_eq!(
            a.recurrence().unwrap().coefficients(),
            b.recurrence().unwrap().coefficients()
        );
    }

    #[rstest]
    #[case(RankSelection::Fixed(0))]
    #[case(RankSelection::Energy { threshold: 0.0, max_rank: None })]
    #[case(RankSelection::Energy { threshold: 1.5, max_rank: None })]
    #[case(RankSelection::Energy { threshold: 0.9, max_rank: Some(0) })]
    fn test_invalid_selection(#[case] selection: RankSelection) {
        assert!(matches!(
            SsaDecomposer::new(4, selection),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_series_has_no_energy() {
        let d = SsaDecomposer::new(3, RankSelection::default())
            .unwrap()
            .decompose(&[0.0; 10]);
        assert!(matches!(d, Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_short_series() {
        let err = SsaDecomposer::new(6, RankSelection::default())
            .unwrap()
            .decompose(&[1.0, 2.0, 3.0])
            .unwrap_err();
        assert_eq!(
            err,
            MathError::InsufficientData {
                available: 3,
                required: 6
            }
        );
    }
}
