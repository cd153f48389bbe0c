//! Seeded random sources and uniform random matrices

use log::warn;
use nalgebra::DMatrix;
use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SvdError};

/// Environment variable that fixes the seed of [`rng_from_env`].
pub const SEED_ENV: &str = "SEED";

/// Deterministic generator for a given seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Create a generator seeded from the `SEED` environment variable.
///
/// Falls back to OS entropy when the variable is unset or not a valid `u64`,
/// which reproduces the unseeded behavior of a process-wide generator.
pub fn rng_from_env() -> ChaCha8Rng {
    match seed_from_env() {
        Some(seed) => seeded_rng(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

pub(crate) fn seed_from_env() -> Option<u64> {
    let raw = std::env::var(SEED_ENV).ok()?;
    parse_seed(&raw)
}

fn parse_seed(raw: &str) -> Option<u64> {
    match raw.trim().parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            warn!("ignoring {SEED_ENV}={raw:?}: not a valid u64, seeding from entropy");
            None
        }
    }
}

/// Generate a `rows x cols` matrix with entries drawn independently and
/// uniformly from the closed interval `[low, high]`.
pub fn generate_random_matrix<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<DMatrix<f64>> {
    if rows == 0 || cols == 0 {
        return Err(SvdError::EmptyMatrix);
    }
    // new_inclusive panics unless the width scaled by 1 / (1 - eps) stays finite
    let scaled_width = (high - low) / (1.0 - f64::EPSILON);
    if !low.is_finite() || !high.is_finite() || low > high || !scaled_width.is_finite() {
        return Err(SvdError::InvalidRange { low, high });
    }

    let dist = Uniform::new_inclusive(low, high);
    Ok(DMatrix::from_fn(rows, cols, |_, _| dist.sample(rng)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_bounds() {
        let mut rng = seeded_rng(7);
        let a = generate_random_matrix(400, 100, 0.0, 10.0, &mut rng).unwrap();

        assert_eq!(a.shape(), (400, 100));
        assert!(a.iter().all(|&x| (0.0..=10.0).contains(&x)));
    }

    #[test]
    fn test_degenerate_interval_is_constant() {
        let mut rng = seeded_rng(1);
        let a = generate_random_matrix(3, 4, 2.5, 2.5, &mut rng).unwrap();
        assert!(a.iter().all(|&x| x == 2.5));
    }

    #[test]
    fn test_same_seed_same_matrix() {
        let a = generate_random_matrix(5, 6, -1.0, 1.0, &mut seeded_rng(42)).unwrap();
        let b = generate_random_matrix(5, 6, -1.0, 1.0, &mut seeded_rng(42)).unwrap();
        let c = generate_random_matrix(5, 6, -1.0, 1.0, &mut seeded_rng(43)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = seeded_rng(0);

        assert_eq!(
            generate_random_matrix(0, 3, 0.0, 1.0, &mut rng),
            Err(SvdError::EmptyMatrix)
        );
        assert!(matches!(
            generate_random_matrix(3, 3, 1.0, 0.0, &mut rng),
            Err(SvdError::InvalidRange { .. })
        ));
        assert!(matches!(
            generate_random_matrix(3, 3, 0.0, f64::INFINITY, &mut rng),
            Err(SvdError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_overflowing_width_is_rejected() {
        let mut rng = seeded_rng(0);
        assert_eq!(
            generate_random_matrix(2, 2, -f64::MAX, f64::MAX, &mut rng),
            Err(SvdError::InvalidRange { low: -f64::MAX, high: f64::MAX })
        );

        let half = f64::MAX / 2.0;
        assert!(matches!(
            generate_random_matrix(2, 2, -half, half, &mut rng),
            Err(SvdError::InvalidRange { .. })
        ));

        let quarter = f64::MAX / 4.0;
        let a = generate_random_matrix(2, 2, -quarter, quarter, &mut rng).unwrap();
        assert!(a.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42"), Some(42));
        assert_eq!(parse_seed(" 7\n"), Some(7));
        assert_eq!(parse_seed("notanumber"), None);
        assert_eq!(parse_seed("-1"), None);
    }
}
