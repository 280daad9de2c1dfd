//! Diagonal averaging (Hankelization)

use nalgebra::DMatrix;

/// Average each anti-diagonal of `matrix` back into a series of length
/// `nrows + ncols - 1`.
pub fn diagonal_average(matrix: &DMatrix<f64>) -> Vec<f64> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let length = rows + cols - 1;
    let mut sums = vec![0.0; length];
    let mut counts = vec![0usize; length];

    for j in 0..cols {
        for i in 0..rows {
            sums[i + j] += matrix[(i, j)];
            counts[i + j] += 1;
        }
    }

    sums.iter()
        .zip(counts.iter())
        .map(|(&s, &c)| s / c as f64)
        .collect()
}

/// Project `trajectory` onto the column space of `basis` and Hankelize the
/// result.
///
/// `basis` must have orthonormal columns of the same height as `trajectory`.
pub fn reconstruct(trajectory: &DMatrix<f64>, basis: &DMatrix<f64>) -> Vec<f64> {
    let projected = basis * (basis.transpose() * trajectory);
    diagonal_average(&projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::trajectory_matrix;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hankel_round_trip() {
        let series = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        let m = trajectory_matrix(&series, 3).unwrap();
        let back = diagonal_average(&m);

        assert_eq!(back.len(), series.len());
        for (a, b) in back.iter().zip(series.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_averages_unequal_diagonal() {
        // anti-diagonal 1 holds 2.0 and 4.0
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 4.0, 3.0]);
        assert_eq!(diagonal_average(&m), vec![1.0, 3.0, 3.0]);
    }

    #[test]
    fn test_full_basis_reproduces_series() {
        let series = vec![1.0, 2.0, 0.5, 3.0, 2.5, 4.0];
        let m = trajectory_matrix(&series, 2).unwrap();
        let basis = DMatrix::<f64>::identity(2, 2);
        let back = reconstruct(&m, &basis);

        for (a, b) in back.iter().zip(series.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_matrix() {
        let m = DMatrix::<f64>::zeros(0, 0);
        assert!(diagonal_average(&m).is_empty());
    }
}
