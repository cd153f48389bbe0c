//! Truncated SVD with a signed rank parameter
//!
//! Resolves `k`, runs the randomized SVD and expands the singular values into
//! a diagonal matrix so the factors multiply back directly as `U * D * V^T`.

use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::error::Result;
use crate::randomized::{randomized_svd, RandomizedSvdConfig};
use crate::rank::resolve_rank;

/// Configuration for truncated decomposition
#[derive(Debug, Clone, Default)]
pub struct TruncationConfig {
    /// Requested rank: `None` for full rank, negative to drop trailing
    /// components
    pub rank: Option<isize>,
    pub randomized: RandomizedSvdConfig,
}

impl TruncationConfig {
    pub fn new(rank: Option<isize>) -> Self {
        Self {
            rank,
            randomized: RandomizedSvdConfig::default(),
        }
    }

    pub fn with_randomized(mut self, randomized: RandomizedSvdConfig) -> Self {
        self.randomized = randomized;
        self
    }
}

/// Factor triple of a truncated decomposition
#[derive(Debug, Clone)]
pub struct Factorization {
    /// Left singular vectors (m × k)
    pub u: DMatrix<f64>,
    /// Singular values on the diagonal (k × k)
    pub d: DMatrix<f64>,
    /// Right singular vectors, transposed (k × n)
    pub vt: DMatrix<f64>,
    /// Singular values (k), descending
    pub singular_values: DVector<f64>,
}

impl Factorization {
    /// Number of retained components
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    /// `U * D * V^T`
    pub fn reconstruct(&self) -> DMatrix<f64> {
        &self.u * &self.d * &self.vt
    }

    /// Shapes of `(U, D, V^T)`
    pub fn shapes(&self) -> [(usize, usize); 3] {
        [self.u.shape(), self.d.shape(), self.vt.shape()]
    }
}

/// Truncated decomposition of `matrix` keeping `k` components
///
/// See [`resolve_rank`] for how `k` is interpreted.
pub fn truncated_decompose<R: Rng + ?Sized>(
    matrix: &DMatrix<f64>,
    k: Option<isize>,
    rng: &mut R,
) -> Result<Factorization> {
    truncated_decompose_with(matrix, &TruncationConfig::new(k), rng)
}

/// Truncated decomposition with explicit randomized SVD settings
pub fn truncated_decompose_with<R: Rng + ?Sized>(
    matrix: &DMatrix<f64>,
    config: &TruncationConfig,
    rng: &mut R,
) -> Result<Factorization> {
    let (m, n) = matrix.shape();
    let k = resolve_rank(config.rank, m, n)?;

    let result = randomized_svd(matrix, k, &config.randomized, rng)?;

    Ok(Factorization {
        u: result.u,
        d: DMatrix::from_diagonal(&result.s),
        vt: result.v_t,
        singular_values: result.s,
    })
}
