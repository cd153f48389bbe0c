//! Randomized truncated SVD
//!
//! A random Gaussian sketch of the column space is refined by a few power
//! iterations, orthonormalized, and the small projected matrix `Q^T * A` is
//! factored exactly. With `n_components + n_oversamples >= min(m, n)` the
//! sketch spans the whole column space and the result matches the exact
//! truncated SVD up to rounding.

use log::debug;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{Result, SvdError};
use crate::svd::{thin_svd, SVDResult};

/// Number of power iterations used by the range finder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NIter {
    /// 7 when fewer than 10% of the components are requested, 4 otherwise
    Auto,
    Fixed(usize),
}

/// Re-orthogonalization applied between power iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerIterationNormalizer {
    /// `Off` for at most two iterations, `Lu` otherwise
    Auto,
    Off,
    Lu,
    Qr,
}

/// Whether to run the algorithm on `A^T`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    /// Transpose wide matrices (`m < n`)
    Auto,
    Always,
    Never,
}

/// Configuration for randomized SVD computation
#[derive(Debug, Clone)]
pub struct RandomizedSvdConfig {
    /// Extra random directions sampled beyond `n_components`
    pub n_oversamples: usize,
    /// Power iterations
    pub n_iter: NIter,
    pub normalizer: PowerIterationNormalizer,
    pub transpose: Transpose,
    /// Make the factorization sign-deterministic
    pub flip_sign: bool,
    /// Iteration cap for the dense SVD of the projected matrix, `0` for none
    pub max_iterations: usize,
}

impl Default for RandomizedSvdConfig {
    fn default() -> Self {
        Self {
            n_oversamples: 10,
            n_iter: NIter::Auto,
            normalizer: PowerIterationNormalizer::Auto,
            transpose: Transpose::Auto,
            flip_sign: true,
            max_iterations: 0,
        }
    }
}

impl RandomizedSvdConfig {
    pub fn new(n_oversamples: usize, n_iter: NIter) -> Self {
        Self {
            n_oversamples,
            n_iter,
            ..Self::default()
        }
    }

    pub fn with_normalizer(mut self, normalizer: PowerIterationNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_transpose(mut self, transpose: Transpose) -> Self {
        self.transpose = transpose;
        self
    }

    pub fn with_flip_sign(mut self, flip_sign: bool) -> Self {
        self.flip_sign = flip_sign;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn resolve_n_iter(&self, n_components: usize, min_dim: usize) -> usize {
        match self.n_iter {
            NIter::Fixed(n) => n,
            NIter::Auto if (n_components as f64) < 0.1 * min_dim as f64 => 7,
            NIter::Auto => 4,
        }
    }

    fn resolve_normalizer(&self, n_iter: usize) -> PowerIterationNormalizer {
        match self.normalizer {
            PowerIterationNormalizer::Auto if n_iter <= 2 => PowerIterationNormalizer::Off,
            PowerIterationNormalizer::Auto => PowerIterationNormalizer::Lu,
            other => other,
        }
    }
}

/// Compute an orthonormal matrix whose range approximates the range of `a`
///
/// # Arguments
/// * `a` - Input matrix (m × n)
/// * `size` - Number of columns of the returned basis, at most `min(m, n)`
/// * `n_iter` - Power iterations
/// * `normalizer` - Re-orthogonalization between iterations (`Auto` is
///   treated as `Lu`)
pub fn randomized_range_finder<R: Rng + ?Sized>(
    a: &DMatrix<f64>,
    size: usize,
    n_iter: usize,
    normalizer: PowerIterationNormalizer,
    rng: &mut R,
) -> DMatrix<f64> {
    let mut q = DMatrix::from_fn(a.ncols(), size, |_, _| rng.sample::<f64, _>(StandardNormal));
    let a_t = a.transpose();

    for _ in 0..n_iter {
        q = match normalizer {
            PowerIterationNormalizer::Off => &a_t * (a * &q),
            PowerIterationNormalizer::Qr => (&a_t * (a * &q).qr().q()).qr().q(),
            PowerIterationNormalizer::Lu | PowerIterationNormalizer::Auto => {
                permuted_l(&a_t * permuted_l(a * &q))
            }
        };
    }

    (a * q).qr().q()
}

/// Lower factor of `y = P^-1 * L * U` with the row permutation folded in
fn permuted_l(y: DMatrix<f64>) -> DMatrix<f64> {
    let lu = y.lu();
    let mut l = lu.l();
    lu.p().inv_permute_rows(&mut l);
    l
}

/// Make each component's dominant entry positive
///
/// With `u_based` the largest-magnitude entry of every column of `u` decides
/// the sign, otherwise the largest-magnitude entry of every row of `v_t`.
pub fn svd_flip(u: &mut DMatrix<f64>, v_t: &mut DMatrix<f64>, u_based: bool) {
    let k = u.ncols().min(v_t.nrows());
    for j in 0..k {
        let pivot = if u_based {
            u.column(j).iter().copied().fold(0.0_f64, dominant)
        } else {
            v_t.row(j).iter().copied().fold(0.0_f64, dominant)
        };
        if pivot < 0.0 {
            u.column_mut(j).neg_mut();
            v_t.row_mut(j).neg_mut();
        }
    }
}

fn dominant(best: f64, x: f64) -> f64 {
    if x.abs() > best.abs() {
        x
    } else {
        best
    }
}

/// Randomized truncated SVD of `matrix`
///
/// Returns `n_components` singular triplets, `u` (m × k), `s` (k) and
/// `v_t` (k × n), with singular values in descending order.
pub fn randomized_svd<R: Rng + ?Sized>(
    matrix: &DMatrix<f64>,
    n_components: usize,
    config: &RandomizedSvdConfig,
    rng: &mut R,
) -> Result<SVDResult<f64>> {
    let (m, n) = matrix.shape();
    if m == 0 || n == 0 {
        return Err(SvdError::EmptyMatrix);
    }

    let min_dim = m.min(n);
    if n_components == 0 || n_components > min_dim {
        return Err(SvdError::InvalidRank {
            requested: Some(n_components as isize),
            resolved: n_components as isize,
            max: min_dim,
        });
    }

    let n_random = n_components.saturating_add(config.n_oversamples).min(min_dim);
    let n_iter = config.resolve_n_iter(n_components, min_dim);
    let normalizer = config.resolve_normalizer(n_iter);
    let transpose = match config.transpose {
        Transpose::Auto => m < n,
        Transpose::Always => true,
        Transpose::Never => false,
    };

    debug!(
        "randomized_svd: shape=({m}, {n}) k={n_components} n_random={n_random} \
         n_iter={n_iter} normalizer={normalizer:?} transpose={transpose}"
    );

    let transposed;
    let a = if transpose {
        transposed = matrix.transpose();
        &transposed
    } else {
        matrix
    };

    let q = randomized_range_finder(a, n_random, n_iter, normalizer, rng);

    // Project onto the sketch and factor the small matrix exactly
    let b = q.transpose() * a;
    let small = thin_svd(&b, config.max_iterations)?;

    let mut u = q * small.u;
    let mut v_t = small.v_t;
    if config.flip_sign {
        svd_flip(&mut u, &mut v_t, !transpose);
    }

    let result = SVDResult {
        u,
        s: small.s,
        v_t,
        rank: small.rank,
    }
    .truncate(n_components);

    if transpose {
        // A^T = U S V^T  =>  A = V S U^T
        Ok(SVDResult {
            u: result.v_t.transpose(),
            s: result.s,
            v_t: result.u.transpose(),
            rank: result.rank,
        })
    } else {
        Ok(result)
    }
}
