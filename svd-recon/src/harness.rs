//! End-to-end reconstruction check: generate, decompose, rebuild, compare

use std::fmt::Write as _;

use log::{info, warn};
use nalgebra::DMatrix;
use rand::Rng;

use crate::error::Result;
use crate::random::{generate_random_matrix, rng_from_env, seed_from_env, seeded_rng};
use crate::randomized::RandomizedSvdConfig;
use crate::tsvd::{truncated_decompose_with, Factorization, TruncationConfig};
use crate::validation::{
    has_orthonormal_columns, singular_values_valid, validate_factorization, ReconstructionReport,
    ERROR_EPS,
};

/// Parameters of a single reconstruction run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub rows: usize,
    pub cols: usize,
    /// Sampling interval `[low, high]`
    pub low: f64,
    pub high: f64,
    /// Target rank, see [`crate::rank::resolve_rank`]
    pub rank: Option<isize>,
    pub epsilon: f64,
    /// `None` draws the seed from OS entropy
    pub seed: Option<u64>,
    pub randomized: RandomizedSvdConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            rows: 400,
            cols: 100,
            low: 0.0,
            high: 10.0,
            rank: Some(-1),
            epsilon: ERROR_EPS,
            seed: None,
            randomized: RandomizedSvdConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn new(rows: usize, cols: usize, rank: Option<isize>) -> Self {
        Self {
            rows,
            cols,
            rank,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Take the seed from the `SEED` environment variable when it is set
    pub fn with_seed_from_env(mut self) -> Self {
        if let Some(seed) = seed_from_env() {
            self.seed = Some(seed);
        }
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Everything produced by a run
#[derive(Debug, Clone)]
pub struct HarnessOutcome {
    pub matrix: DMatrix<f64>,
    pub factors: Factorization,
    pub reconstructed: DMatrix<f64>,
    pub report: ReconstructionReport,
}

impl HarnessOutcome {
    pub fn passed(&self) -> bool {
        self.report.is_exact()
    }
}

/// Run the pipeline with a generator built from the configuration
pub fn run(config: &HarnessConfig) -> Result<HarnessOutcome> {
    match config.seed {
        Some(seed) => run_with_rng(config, &mut seeded_rng(seed)),
        None => run_with_rng(config, &mut rng_from_env()),
    }
}

/// Run the pipeline drawing every random number from `rng`
pub fn run_with_rng<R: Rng + ?Sized>(config: &HarnessConfig, rng: &mut R) -> Result<HarnessOutcome> {
    let matrix = generate_random_matrix(config.rows, config.cols, config.low, config.high, rng)?;
    info!(
        "generated {}x{} matrix on [{}, {}]",
        config.rows, config.cols, config.low, config.high
    );

    let truncation = TruncationConfig::new(config.rank).with_randomized(config.randomized.clone());
    let factors = truncated_decompose_with(&matrix, &truncation, rng)?;
    let [u_shape, d_shape, vt_shape] = factors.shapes();
    info!("factor shapes: U={u_shape:?} D={d_shape:?} V^T={vt_shape:?}");

    if !singular_values_valid(&factors.singular_values, config.epsilon) {
        warn!("singular values are not non-negative and descending");
    }
    if !has_orthonormal_columns(&factors.u, 1e-6) || !has_orthonormal_columns(&factors.vt.transpose(), 1e-6) {
        warn!("singular vectors are not orthonormal");
    }

    let reconstructed = factors.reconstruct();
    let report = validate_factorization(&matrix, &factors, config.epsilon)?;
    info!("reconstruction: {report}");

    Ok(HarnessOutcome {
        matrix,
        factors,
        reconstructed,
        report,
    })
}

/// Render the top-left `n x n` block of `matrix`
pub fn preview(matrix: &DMatrix<f64>, n: usize) -> String {
    let rows = n.min(matrix.nrows());
    let cols = n.min(matrix.ncols());
    let mut out = String::new();
    for i in 0..rows {
        let line: Vec<String> = (0..cols).map(|j| format!("{:>12.8}", matrix[(i, j)])).collect();
        let _ = writeln!(out, "[{}]", line.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SvdError;

    #[test]
    fn test_full_rank_run_passes() {
        let config = HarnessConfig::new(40, 10, None).with_seed(17);

        let outcome = run(&config).unwrap();

        assert!(outcome.passed(), "{}", outcome.report);
        assert_eq!(outcome.report.total, 400);
        assert_eq!(outcome.reconstructed.shape(), (40, 10));
    }

    #[test]
    fn test_dropping_a_component_fails_tight_tolerance() {
        let config = HarnessConfig::new(40, 10, Some(-1)).with_seed(17);

        let outcome = run(&config).unwrap();

        assert_eq!(outcome.factors.rank(), 9);
        assert!(!outcome.passed());
        assert!(outcome.report.passing < outcome.report.total);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = HarnessConfig::new(15, 6, Some(3)).with_seed(5);

        let a = run(&config).unwrap();
        let b = run(&config).unwrap();

        assert_eq!(a.matrix, b.matrix);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_errors_propagate() {
        let bad_rank = HarnessConfig::new(5, 5, Some(9)).with_seed(0);
        assert!(matches!(run(&bad_rank), Err(SvdError::InvalidRank { .. })));

        let bad_range = HarnessConfig::new(5, 5, None).with_range(1.0, 0.0).with_seed(0);
        assert!(matches!(run(&bad_range), Err(SvdError::InvalidRange { .. })));
    }

    #[test]
    fn test_preview_block() {
        let m = DMatrix::from_fn(6, 6, |i, j| (i * 6 + j) as f64);
        let text = preview(&m, 2);
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("[  0.00000000   1.00000000]"));
    }
}
