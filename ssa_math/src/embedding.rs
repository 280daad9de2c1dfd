//! Trajectory (Hankel) embedding of a series

use crate::{MathError, Result};
use nalgebra::DMatrix;

/// Build the `window × (n - window + 1)` trajectory matrix of `series`.
///
/// Column `j` holds the lagged copy `series[j..j + window]`, so every
/// anti-diagonal of the result carries a single observation.
pub fn trajectory_matrix(series: &[f64], window: usize) -> Result<DMatrix<f64>> {
    if window < 2 {
        return Err(MathError::InvalidInput(format!(
            "Window size must be at least 2, got {}",
            window
        )));
    }

    if series.len() < window {
        return Err(MathError::InsufficientData {
            available: series.len(),
            required: window,
        });
    }

    if series.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Series contains non-finite values".to_string(),
        ));
    }

    let columns = series.len() - window + 1;
    Ok(DMatrix::from_fn(window, columns, |i, j| series[i + j]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hankel_layout() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let m = trajectory_matrix(&series, 3).unwrap();

        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], series[i + j]);
            }
        }
    }

    #[test]
    fn test_window_equal_to_length() {
        let m = trajectory_matrix(&[1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(m.ncols(), 1);
    }

    #[test]
    fn test_rejects_short_series() {
        let err = trajectory_matrix(&[1.0, 2.0], 3).unwrap_err();
        assert_eq!(
            err,
            MathError::InsufficientData {
                available: 2,
                required: 3
            }
        );
    }

    #[test]
    fn test_rejects_tiny_window() {
        assert!(matches!(
            trajectory_matrix(&[1.0, 2.0, 3.0], 1),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_nan() {
        assert!(trajectory_matrix(&[1.0, f64::NAN, 3.0], 2).is_err());
    }
}
