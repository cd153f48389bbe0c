//! Reconstruction checks for randomized truncated SVD
//!
//! Generates random matrices, factors them with a randomized truncated SVD
//! built on nalgebra, rebuilds the matrix from `U * D * V^T` and counts the
//! entries that agree with the original within a fixed tolerance.

pub mod error;
pub mod estimator;
pub mod harness;
pub mod random;
pub mod randomized;
pub mod rank;
pub mod svd;
pub mod tsvd;
pub mod validation;

// Re-export main types
pub use nalgebra::{DMatrix, DVector};

pub use error::{Result, SvdError};
pub use estimator::{FittedTruncatedSvd, TruncatedSvd};
pub use harness::{HarnessConfig, HarnessOutcome};
pub use random::{generate_random_matrix, rng_from_env, seeded_rng};
pub use randomized::{randomized_svd, NIter, PowerIterationNormalizer, RandomizedSvdConfig, Transpose};
pub use rank::resolve_rank;
pub use svd::{thin_svd, SVDResult};
pub use tsvd::{truncated_decompose, truncated_decompose_with, Factorization, TruncationConfig};
pub use validation::{reconstruct, validate_reconstruction, ReconstructionReport, ERROR_EPS};
