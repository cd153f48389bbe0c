//! Resolution of the target rank `k`
//!
//! `None` keeps every component, a positive value is taken as-is and a
//! negative value drops that many trailing components from the full rank.

use crate::error::{Result, SvdError};

/// Resolve the requested number of components for a `rows x cols` matrix.
///
/// The result is guaranteed to lie in `[1, min(rows, cols)]`.
pub fn resolve_rank(k: Option<isize>, rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(SvdError::EmptyMatrix);
    }

    let full = rows.min(cols);
    let resolved = match k {
        None => full as isize,
        Some(k) if k < 0 => full as isize + k,
        Some(k) => k,
    };

    if resolved < 1 || resolved as usize > full {
        return Err(SvdError::InvalidRank {
            requested: k,
            resolved,
            max: full,
        });
    }

    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full_rank() {
        assert_eq!(resolve_rank(None, 400, 100).unwrap(), 100);
        assert_eq!(resolve_rank(None, 3, 8).unwrap(), 3);
    }

    #[test]
    fn test_negative_drops_trailing_components() {
        assert_eq!(resolve_rank(Some(-1), 10, 10).unwrap(), 9);
        assert_eq!(resolve_rank(Some(-1), 400, 100).unwrap(), 99);
        assert_eq!(resolve_rank(Some(-4), 5, 10).unwrap(), 1);
    }

    #[test]
    fn test_positive_taken_as_is() {
        assert_eq!(resolve_rank(Some(2), 10, 5).unwrap(), 2);
        assert_eq!(resolve_rank(Some(5), 10, 5).unwrap(), 5);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            resolve_rank(Some(6), 10, 5),
            Err(SvdError::InvalidRank { requested: Some(6), resolved: 6, max: 5 })
        );
        assert!(matches!(resolve_rank(Some(0), 10, 5), Err(SvdError::InvalidRank { .. })));
        assert!(matches!(resolve_rank(Some(-5), 10, 5), Err(SvdError::InvalidRank { resolved: 0, .. })));
        assert_eq!(resolve_rank(None, 0, 5), Err(SvdError::EmptyMatrix));
    }
}
