//! Truncated SVD as a dimensionality-reduction estimator
//!
//! Fitting keeps the top `n_components` right singular vectors. Data is
//! projected onto them with [`FittedTruncatedSvd::transform`] and mapped back
//! with [`FittedTruncatedSvd::inverse_transform`]. The data is not centered.

use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::error::{Result, SvdError};
use crate::randomized::{randomized_svd, svd_flip, NIter, RandomizedSvdConfig};

/// Unfitted estimator
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    n_components: usize,
    config: RandomizedSvdConfig,
}

impl TruncatedSvd {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            config: RandomizedSvdConfig::new(10, NIter::Fixed(5)),
        }
    }

    pub fn with_config(mut self, config: RandomizedSvdConfig) -> Self {
        self.config = config;
        self
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn fit<R: Rng + ?Sized>(&self, x: &DMatrix<f64>, rng: &mut R) -> Result<FittedTruncatedSvd> {
        self.fit_transform(x, rng).map(|(fitted, _)| fitted)
    }

    /// Fit on `x` and return the reduced data `U * Sigma` (m × k)
    pub fn fit_transform<R: Rng + ?Sized>(
        &self,
        x: &DMatrix<f64>,
        rng: &mut R,
    ) -> Result<(FittedTruncatedSvd, DMatrix<f64>)> {
        let mut svd = randomized_svd(x, self.n_components, &self.config, rng)?;
        // Component signs are fixed by the rows of V^T, independent of the sample count
        svd_flip(&mut svd.u, &mut svd.v_t, false);
        let reduced = &svd.u * DMatrix::from_diagonal(&svd.s);

        let explained_variance = column_variances(&reduced);
        let total_variance: f64 = column_variances(x).sum();
        let explained_variance_ratio = if total_variance > 0.0 {
            &explained_variance / total_variance
        } else {
            DVector::zeros(explained_variance.len())
        };

        let fitted = FittedTruncatedSvd {
            components: svd.v_t,
            singular_values: svd.s,
            explained_variance,
            explained_variance_ratio,
        };
        Ok((fitted, reduced))
    }
}

/// Estimator state after fitting
#[derive(Debug, Clone)]
pub struct FittedTruncatedSvd {
    components: DMatrix<f64>,
    singular_values: DVector<f64>,
    explained_variance: DVector<f64>,
    explained_variance_ratio: DVector<f64>,
}

impl FittedTruncatedSvd {
    /// Right singular vectors, one per row (k × n_features)
    pub fn components(&self) -> &DMatrix<f64> {
        &self.components
    }

    pub fn singular_values(&self) -> &DVector<f64> {
        &self.singular_values
    }

    /// Variance of each projected column
    pub fn explained_variance(&self) -> &DVector<f64> {
        &self.explained_variance
    }

    /// Explained variance divided by the total per-feature variance of the
    /// training data
    pub fn explained_variance_ratio(&self) -> &DVector<f64> {
        &self.explained_variance_ratio
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.components.ncols()
    }

    /// Project `x` (m × n_features) onto the components
    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if x.ncols() != self.n_features() {
            return Err(SvdError::ShapeMismatch {
                expected: (x.nrows(), self.n_features()),
                found: x.shape(),
            });
        }
        Ok(x * self.components.transpose())
    }

    /// Map reduced data (m × k) back to feature space
    pub fn inverse_transform(&self, reduced: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if reduced.ncols() != self.n_components() {
            return Err(SvdError::ShapeMismatch {
                expected: (reduced.nrows(), self.n_components()),
                found: reduced.shape(),
            });
        }
        Ok(reduced * &self.components)
    }
}

/// Population variance of every column
fn column_variances(x: &DMatrix<f64>) -> DVector<f64> {
    let m = x.nrows() as f64;
    DVector::from_iterator(
        x.ncols(),
        x.column_iter().map(|col| {
            let mean = col.sum() / m;
            col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / m
        }),
    )
}
