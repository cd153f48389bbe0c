//! Reconstruction checks for factorizations
//!
//! The main check rebuilds `B = U * D * V^T` and counts the entries where
//! `|A - B| < eps`. A reconstruction passes only when every entry does.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, SvdError};
use crate::tsvd::Factorization;

/// Element-wise tolerance for reconstruction checks
pub const ERROR_EPS: f64 = 1e-8;

/// Outcome of comparing a matrix against its reconstruction
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionReport {
    /// Entries with `|A - B| < epsilon`
    pub passing: usize,
    /// `rows * cols`
    pub total: usize,
    pub max_abs_error: f64,
    /// `||A - B||_F / ||A||_F`, or the absolute norm when `A` is zero
    pub relative_frobenius_error: f64,
    pub epsilon: f64,
}

impl ReconstructionReport {
    /// True when every entry is within tolerance
    pub fn is_exact(&self) -> bool {
        self.passing == self.total
    }

    pub fn mismatches(&self) -> usize {
        self.total - self.passing
    }
}

impl fmt::Display for ReconstructionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} entries within {:.1e} (max abs error {:.3e}, relative Frobenius error {:.3e})",
            self.passing, self.total, self.epsilon, self.max_abs_error, self.relative_frobenius_error
        )
    }
}

/// Compute `U * D * V^T`
pub fn reconstruct(u: &DMatrix<f64>, d: &DMatrix<f64>, vt: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if u.ncols() != d.nrows() {
        return Err(SvdError::ShapeMismatch {
            expected: (u.ncols(), d.ncols()),
            found: d.shape(),
        });
    }
    if d.ncols() != vt.nrows() {
        return Err(SvdError::ShapeMismatch {
            expected: (d.ncols(), vt.ncols()),
            found: vt.shape(),
        });
    }
    Ok(u * d * vt)
}

/// Compare `original` against `U * D * V^T` entry by entry
pub fn validate_reconstruction(
    original: &DMatrix<f64>,
    u: &DMatrix<f64>,
    d: &DMatrix<f64>,
    vt: &DMatrix<f64>,
    epsilon: f64,
) -> Result<ReconstructionReport> {
    let rebuilt = reconstruct(u, d, vt)?;
    compare_matrices(original, &rebuilt, epsilon)
}

/// Same as [`validate_reconstruction`] for a [`Factorization`]
pub fn validate_factorization(
    original: &DMatrix<f64>,
    factors: &Factorization,
    epsilon: f64,
) -> Result<ReconstructionReport> {
    validate_reconstruction(original, &factors.u, &factors.d, &factors.vt, epsilon)
}

/// Count entries of `b` that agree with `a` within `epsilon`
pub fn compare_matrices(a: &DMatrix<f64>, b: &DMatrix<f64>, epsilon: f64) -> Result<ReconstructionReport> {
    if !(epsilon > 0.0) {
        return Err(SvdError::InvalidTolerance(format!(
            "Tolerance must be positive, got {epsilon}"
        )));
    }
    if a.shape() != b.shape() {
        return Err(SvdError::ShapeMismatch {
            expected: a.shape(),
            found: b.shape(),
        });
    }

    let diff = a - b;
    let passing = diff.iter().filter(|x| x.abs() < epsilon).count();
    let max_abs_error = diff.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));

    let diff_norm = diff.norm();
    let orig_norm = a.norm();
    let relative_frobenius_error = if orig_norm == 0.0 {
        diff_norm
    } else {
        diff_norm / orig_norm
    };

    Ok(ReconstructionReport {
        passing,
        total: a.len(),
        max_abs_error,
        relative_frobenius_error,
        epsilon,
    })
}

/// Check that the columns of `matrix` are orthonormal (`M^T * M = I`)
pub fn has_orthonormal_columns(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    let k = matrix.ncols();
    let gram = matrix.transpose() * matrix;
    (gram - DMatrix::<f64>::identity(k, k))
        .iter()
        .all(|x| x.abs() <= tolerance)
}

/// Check that singular values are non-negative and sorted in descending order
pub fn singular_values_valid(s: &DVector<f64>, tolerance: f64) -> bool {
    if s.iter().any(|&val| val < -tolerance) {
        return false;
    }
    s.as_slice().windows(2).all(|w| w[0] >= w[1] - tolerance)
}
