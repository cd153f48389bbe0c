//! Exact thin SVD using nalgebra

use nalgebra::{DMatrix, DVector, RealField};

use crate::error::{Result, SvdError};

/// Result of SVD decomposition
#[derive(Debug, Clone)]
pub struct SVDResult<T> {
    /// Left singular vectors (m × rank)
    pub u: DMatrix<T>,
    /// Singular values (rank), descending
    pub s: DVector<T>,
    /// Right singular vectors, transposed (rank × n)
    pub v_t: DMatrix<T>,
    /// Number of retained components
    pub rank: usize,
}

impl<T: RealField + Copy> SVDResult<T> {
    /// Keep only the leading `k` components. `k` larger than the current
    /// rank leaves the result unchanged.
    pub fn truncate(self, k: usize) -> Self {
        if k >= self.rank {
            return self;
        }
        SVDResult {
            u: self.u.columns(0, k).into(),
            s: self.s.rows(0, k).into(),
            v_t: self.v_t.rows(0, k).into(),
            rank: k,
        }
    }
}

/// Thin SVD keeping all `min(m, n)` components
///
/// `max_iterations` bounds the total number of implicit QR sweeps; `0` means
/// no limit. Singular values come back sorted in descending order.
pub fn thin_svd<T>(matrix: &DMatrix<T>, max_iterations: usize) -> Result<SVDResult<T>>
where
    T: RealField + Copy,
{
    let (m, n) = matrix.shape();
    if m == 0 || n == 0 {
        return Err(SvdError::EmptyMatrix);
    }

    let svd = matrix
        .clone()
        .try_svd(true, true, T::default_epsilon(), max_iterations)
        .ok_or(SvdError::ConvergenceFailed { iterations: max_iterations })?;

    let rank = svd.singular_values.len();
    match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => Ok(SVDResult {
            u,
            s: svd.singular_values,
            v_t,
            rank,
        }),
        _ => Err(SvdError::ConvergenceFailed { iterations: max_iterations }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_svd_identity_matrix() {
        let matrix: DMatrix<f64> = DMatrix::identity(3, 3);

        let result = thin_svd(&matrix, 0).unwrap();

        assert_eq!(result.rank, 3);
        assert_eq!(result.u.shape(), (3, 3));
        assert_eq!(result.s.len(), 3);
        assert_eq!(result.v_t.shape(), (3, 3));
        for &s in result.s.iter() {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_svd_rank_one() {
        let matrix: DMatrix<f64> = DMatrix::from_element(3, 3, 1.0);

        let result = thin_svd(&matrix, 0).unwrap();

        assert_eq!(result.rank, 3);
        assert_abs_diff_eq!(result.s[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.s[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.s[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_svd_rectangular() {
        let matrix = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let result = thin_svd(&matrix, 0).unwrap();

        assert_eq!(result.rank, 2);
        assert_eq!(result.u.shape(), (4, 2));
        assert_eq!(result.v_t.shape(), (2, 2));
        assert!(result.s[0] >= result.s[1]);

        let rebuilt = &result.u * DMatrix::from_diagonal(&result.s) * &result.v_t;
        assert_abs_diff_eq!(rebuilt, matrix, epsilon = 1e-12);
    }

    #[test]
    fn test_svd_zero_matrix() {
        let matrix: DMatrix<f64> = DMatrix::zeros(3, 2);
        let result = thin_svd(&matrix, 0).unwrap();
        assert_eq!(result.rank, 2);
        assert_eq!(result.u.shape(), (3, 2));
        assert_eq!(result.v_t.shape(), (2, 2));
        assert!(result.s.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_svd_empty_matrix() {
        let empty: DMatrix<f64> = DMatrix::zeros(0, 0);
        assert_eq!(thin_svd(&empty, 0).unwrap_err(), SvdError::EmptyMatrix);
    }

    #[test]
    fn test_truncate_keeps_leading_components() {
        let matrix = DMatrix::from_row_slice(3, 3, &[3.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0]);
        let result = thin_svd(&matrix, 0).unwrap().truncate(2);

        assert_eq!(result.rank, 2);
        assert_abs_diff_eq!(result.s[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.s[1], 2.0, epsilon = 1e-12);
        assert_eq!(result.u.shape(), (3, 2));
        assert_eq!(result.v_t.shape(), (2, 3));
    }
}
