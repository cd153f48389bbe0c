//! Error type shared by every stage of the reconstruction pipeline

/// Error types for decomposition and validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SvdError {
    #[error("Matrix is empty")]
    EmptyMatrix,

    #[error("Invalid sampling interval [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    #[error("Invalid rank: requested {requested:?}, resolved to {resolved}, must be in [1, {max}]")]
    InvalidRank {
        requested: Option<isize>,
        resolved: isize,
        max: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("SVD failed to converge after {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),
}

pub type Result<T> = std::result::Result<T, SvdError>;
